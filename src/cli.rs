// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Gmail fetch and email classification service", long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Override the bind host.
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Classify emails from a JSON file and print one line per email.
    Classify {
        /// File holding `[...]` or `{ "emails": [...] }`.
        #[arg(short, long)]
        file: PathBuf,

        /// Model API key.
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve { host: None, port: None })
    }
}
