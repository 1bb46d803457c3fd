// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Failures of a single `classify` call. All of them are terminal for the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Missing or invalid API key. Please log out and save your key.")]
    MissingCredential,

    #[error("Invalid emails list: {0}")]
    InvalidRequest(String),

    #[error("{provider} API Error: {message}")]
    ProviderError { provider: String, message: String },

    #[error("Model output violated the classification schema: {0}")]
    SchemaViolation(String),
}

impl ClassifyError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ClassifyError::InvalidRequest(message.into())
    }

    pub fn schema_violation(message: impl Into<String>) -> Self {
        ClassifyError::SchemaViolation(message.into())
    }
}
