// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hosted-model providers that can produce schema-constrained output.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::credential::Credential;

pub mod gemini;
pub mod fixed;

pub use fixed::StaticProvider;
pub use gemini::GeminiProvider;

/// A single structured-output generation call.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredRequest {
    /// Full natural-language instruction, data payload included.
    pub instruction: String,
    pub temperature: f32,
    /// Schema the provider must constrain its output to.
    pub response_schema: Value,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Trait defining the interface for a structured-output model provider.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Human-readable provider label used in caller-visible error messages.
    fn name(&self) -> &'static str;

    /// Sends `request` authenticated with `credential` and returns the raw
    /// text the model produced. Parsing it is left to the caller.
    async fn generate_structured(
        &self,
        request: &StructuredRequest,
        credential: &Credential,
    ) -> Result<String, ProviderError>;
}
