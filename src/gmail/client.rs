// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gmail API HTTP client

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, error, info};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::api::{GmailMessage, ListMessagesResponse};
use super::{normalize_message, GmailError, MailSource};
use crate::classify::EmailSummary;
use crate::config::GmailConfig;
use crate::credential::Credential;

/// Largest page Gmail accepts for `users.messages.list`.
pub const MAX_LIST_RESULTS: u32 = 500;

/// Gmail API client authenticated per call with a delegated access token.
#[derive(Clone)]
pub struct GmailClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
}

impl GmailClient {
    pub fn new(config: &GmailConfig, http_client: Client) -> Result<Self, GmailError> {
        Ok(Self {
            http_client,
            base_url: Url::parse(&config.base_url)?,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GmailError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GmailError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["users", "me", "messages"])
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        access_token: &Credential,
    ) -> Result<T, GmailError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token.expose())
            .timeout(self.timeout)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// List message IDs from the user's mailbox
    ///
    /// # Arguments
    /// * `max_results` - Maximum number of messages to return (1-500)
    /// * `query` - Optional Gmail search query, e.g. `is:unread`
    pub async fn list_messages(
        &self,
        access_token: &Credential,
        max_results: u32,
        query: Option<&str>,
    ) -> Result<ListMessagesResponse, GmailError> {
        let mut url = self.endpoint(&[])?;
        url.query_pairs_mut()
            .append_pair("maxResults", &max_results.clamp(1, MAX_LIST_RESULTS).to_string());
        if let Some(q) = query {
            url.query_pairs_mut().append_pair("q", q);
        }
        self.get_json(url, access_token).await
    }

    /// Get full message details by ID
    pub async fn get_message(
        &self,
        access_token: &Credential,
        id: &str,
    ) -> Result<GmailMessage, GmailError> {
        let mut url = self.endpoint(&[id])?;
        url.query_pairs_mut().append_pair("format", "full");
        self.get_json(url, access_token).await
    }
}

async fn check_status(response: Response) -> Result<Response, GmailError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    error!("Gmail API request failed with status {}: {}", status, body);
    Err(GmailError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl MailSource for GmailClient {
    async fn fetch_summaries(
        &self,
        access_token: &Credential,
        max_results: u32,
    ) -> Result<Vec<EmailSummary>, GmailError> {
        let listed = self.list_messages(access_token, max_results, None).await?;
        if listed.messages.is_empty() {
            debug!("Mailbox listing returned no messages");
            return Ok(Vec::new());
        }

        // One request per message; any failure fails the whole fetch.
        let messages = try_join_all(
            listed
                .messages
                .iter()
                .map(|message_ref| self.get_message(access_token, &message_ref.id)),
        )
        .await?;

        info!("Fetched {} messages from Gmail", messages.len());
        Ok(messages.into_iter().map(normalize_message).collect())
    }
}
