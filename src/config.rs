// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use config::{Environment, File};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::gmail::MAX_LIST_RESULTS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on inbound request bodies.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmailConfig {
    pub base_url: String,
    pub default_max_results: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub log: LogConfig,
    pub rest: RestConfig,
    pub gemini: GeminiConfig,
    pub gmail: GmailConfig,
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load or parse configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, SettingsError> {
        let mut config_builder = config::Config::builder()
            // Log defaults
            .set_default("log.level", "info")?
            // REST defaults
            .set_default("rest.host", "127.0.0.1")?
            .set_default("rest.port", 3000)?
            .set_default("rest.max_body_bytes", 1024 * 1024)?
            // Gemini defaults
            .set_default("gemini.base_url", "https://generativelanguage.googleapis.com/v1beta")?
            .set_default("gemini.model", "gemini-2.5-flash")?
            .set_default("gemini.timeout_secs", 30)?
            // Gmail defaults
            .set_default("gmail.base_url", "https://gmail.googleapis.com/gmail/v1")?
            .set_default("gmail.default_max_results", 15)?
            .set_default("gmail.timeout_secs", 30)?;

        if let Some(path) = config_path {
            config_builder = config_builder.add_source(File::with_name(path));
        }

        // e.g. `MAILTRIAGE_REST__PORT=8080` would override `rest.port`
        config_builder = config_builder.add_source(
            Environment::with_prefix("MAILTRIAGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .ignore_empty(true),
        );

        // Direct environment variables for the most common settings
        let env_vars = [
            ("REST_HOST", "rest.host"),
            ("REST_PORT", "rest.port"),
            ("GEMINI_BASE_URL", "gemini.base_url"),
            ("GEMINI_MODEL", "gemini.model"),
            ("GMAIL_BASE_URL", "gmail.base_url"),
        ];

        for (env_var, config_key) in &env_vars {
            if let Ok(value) = env::var(env_var) {
                if value.is_empty() {
                    continue;
                }
                if *env_var == "REST_PORT" {
                    match value.parse::<u16>() {
                        Ok(port) => config_builder = config_builder.set_override(*config_key, port)?,
                        Err(_) => warn!("Invalid port value in {}: {}", env_var, value),
                    }
                } else {
                    config_builder = config_builder.set_override(*config_key, value)?;
                }
            }
        }

        let settings: Settings = config_builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_LIST_RESULTS).contains(&self.gmail.default_max_results) {
            return Err(SettingsError::InvalidValue {
                key: "gmail.default_max_results",
                reason: format!("must be between 1 and {}", MAX_LIST_RESULTS),
            });
        }
        if self.gemini.timeout_secs == 0 || self.gmail.timeout_secs == 0 {
            return Err(SettingsError::InvalidValue {
                key: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.gemini.model.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                key: "gemini.model",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.rest.host, self.rest.port)
    }
}
