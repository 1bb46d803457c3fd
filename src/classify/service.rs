// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use log::{debug, error, info};
use serde_json::Value;

use super::error::ClassifyError;
use super::prompt;
use super::types::{ClassificationBatchRequest, ClassificationBatchResponse};
use super::validate;
use crate::credential::Credential;
use crate::provider::{ModelProvider, StructuredRequest};

/// Lowest sampling temperature; keeps labels as reproducible as the provider allows.
pub const CLASSIFICATION_TEMPERATURE: f32 = 0.0;

/// Maps a batch of email summaries to one validated category per email.
///
/// Stateless: the credential travels with each request and the service keeps
/// nothing between calls. No retries are attempted.
#[derive(Clone)]
pub struct Classifier {
    provider: Arc<dyn ModelProvider>,
}

impl Classifier {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    /// Label of the backing provider, as it appears in provider error messages.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Classifies a validated batch. An empty batch yields an empty response
    /// without contacting the provider.
    pub async fn classify(
        &self,
        request: ClassificationBatchRequest,
    ) -> Result<ClassificationBatchResponse, ClassifyError> {
        if request.is_empty() {
            debug!("Empty batch, skipping model call");
            return Ok(ClassificationBatchResponse::default());
        }

        let instruction = prompt::build_instruction(request.emails())
            .map_err(|e| ClassifyError::invalid_request(format!("failed to serialize batch: {}", e)))?;
        let structured = StructuredRequest {
            instruction,
            temperature: CLASSIFICATION_TEMPERATURE,
            response_schema: prompt::response_schema(),
        };

        info!(
            "Classifying {} emails with {} provider",
            request.len(),
            self.provider.name()
        );

        let output = self
            .provider
            .generate_structured(&structured, request.credential())
            .await
            .map_err(|e| {
                error!("Classification error: {}", e);
                ClassifyError::ProviderError {
                    provider: self.provider.name().to_string(),
                    message: e.to_string(),
                }
            })?;

        let results = validate::parse_classifications(&output, request.emails()).map_err(|e| {
            error!("Rejected model output: {}", e);
            e
        })?;

        debug!("Classified {} emails", results.len());
        Ok(ClassificationBatchResponse::new(results))
    }

    /// Entry point for inbound `{ "emails": [...] }` payloads.
    ///
    /// The credential is checked before the payload shape.
    pub async fn classify_payload(
        &self,
        payload: &Value,
        credential: Option<&str>,
    ) -> Result<ClassificationBatchResponse, ClassifyError> {
        let credential = credential
            .and_then(Credential::new)
            .ok_or(ClassifyError::MissingCredential)?;
        let request = ClassificationBatchRequest::from_payload(payload, credential)?;
        self.classify(request).await
    }
}
