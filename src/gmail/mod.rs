// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gmail API integration
//!
//! This module provides:
//! - Typed Gmail API records
//! - An HTTP client that lists messages and fetches their details in parallel
//! - Normalization of full messages into [`EmailSummary`] values

mod client;
mod normalize;

use async_trait::async_trait;
use thiserror::Error;

use crate::classify::EmailSummary;
use crate::credential::Credential;

pub use client::{GmailClient, MAX_LIST_RESULTS};
pub use normalize::normalize_message;

#[derive(Debug, Error)]
pub enum GmailError {
    #[error("Gmail request failed: {0}")]
    Request(String),

    #[error("Gmail returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Gmail response: {0}")]
    Decode(String),

    #[error("Invalid Gmail URL: {0}")]
    Url(String),
}

impl From<reqwest::Error> for GmailError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GmailError::Decode(err.to_string())
        } else {
            GmailError::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for GmailError {
    fn from(err: url::ParseError) -> Self {
        GmailError::Url(err.to_string())
    }
}

/// Source of recent email summaries for a delegated mail account.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Returns up to `max_results` recent messages, in mailbox order.
    ///
    /// Fails as a whole if any single message cannot be fetched.
    async fn fetch_summaries(
        &self,
        access_token: &Credential,
        max_results: u32,
    ) -> Result<Vec<EmailSummary>, GmailError>;
}

/// Gmail API response types
pub mod api {
    use serde::Deserialize;

    /// Response from listing messages
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        #[serde(default)]
        pub messages: Vec<MessageRef>,
        pub next_page_token: Option<String>,
        pub result_size_estimate: Option<u32>,
    }

    /// Reference to a message (just ID and thread ID)
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageRef {
        pub id: String,
        pub thread_id: Option<String>,
    }

    /// Full message from Gmail API
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub id: String,
        #[serde(default)]
        pub snippet: String,
        pub payload: Option<MessagePart>,
    }

    /// Message part; the top-level payload has the same shape.
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePart {
        pub mime_type: Option<String>,
        #[serde(default)]
        pub headers: Vec<Header>,
        pub body: Option<MessageBody>,
        #[serde(default)]
        pub parts: Vec<MessagePart>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Deserialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    /// Message body (base64url encoded)
    #[derive(Debug, Deserialize)]
    pub struct MessageBody {
        pub size: Option<u32>,
        pub data: Option<String>,
    }
}
