// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// src/provider/gemini.rs
// Google Gemini generateContent with a response schema

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ModelProvider, ProviderError, StructuredRequest};
use crate::config::GeminiConfig;
use crate::credential::Credential;

// --- Gemini Specific Request/Response Structs ---
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig<'a>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    temperature: f32,
    response_mime_type: &'static str,
    response_schema: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
    max_output_tokens: Option<u32>,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_output_tokens: config.max_output_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_payload<'a>(&self, request: &'a StructuredRequest) -> GeminiGenerateRequest<'a> {
        GeminiGenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: &request.instruction }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

/// Pulls the human-readable message out of a Google error body when present.
fn error_message(body: &str) -> String {
    serde_json::from_str::<GoogleErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Concatenates the text parts of the first candidate.
///
/// The text is returned unparsed: a candidate cut off at the token limit is
/// still a well-formed provider answer, just not a valid classification.
fn extract_output_text(response: GeminiGenerateResponse) -> Result<String, ProviderError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        warn!("Gemini API response did not contain any candidates or parts.");
        return Err(ProviderError::MalformedResponse(
            "Gemini response was empty or missing candidates".to_string(),
        ));
    }

    Ok(text)
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Google"
    }

    async fn generate_structured(
        &self,
        request: &StructuredRequest,
        credential: &Credential,
    ) -> Result<String, ProviderError> {
        let url = self.generate_url();
        let payload = self.build_payload(request);

        debug!(
            "Sending request to Gemini API: model={}, instruction_chars={}",
            self.model,
            request.instruction.len()
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", credential.expose())
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            let message = error_message(&error_body);
            error!("Gemini API request failed with status {}: {}", status, message);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let response_body = response.json::<GeminiGenerateResponse>().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to deserialize Gemini response: {}", e))
        })?;

        debug!("Received response from Gemini API.");
        extract_output_text(response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> GeminiProvider {
        let config = GeminiConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            timeout_secs: 5,
            max_output_tokens: None,
        };
        GeminiProvider::new(&config, Client::new())
    }

    #[test]
    fn test_generate_url_trims_trailing_slash() {
        assert_eq!(
            provider().generate_url(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_payload_carries_schema_and_temperature() {
        let request = StructuredRequest {
            instruction: "classify".to_string(),
            temperature: 0.0,
            response_schema: json!({ "type": "OBJECT" }),
        };
        let provider = provider();
        let payload = serde_json::to_value(provider.build_payload(&request)).unwrap();
        assert_eq!(
            payload,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "classify" }] }],
                "generationConfig": {
                    "temperature": 0.0,
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })
        );
    }

    #[test]
    fn test_extract_joins_text_parts() {
        let response: GeminiGenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "{\"classifications\": " },
                { "text": "[]}" }
            ]}}]
        }))
        .unwrap();
        assert_eq!(
            extract_output_text(response).unwrap(),
            "{\"classifications\": []}"
        );
    }

    #[test]
    fn test_extract_rejects_empty_candidates() {
        let empty: GeminiGenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            extract_output_text(empty),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_keeps_truncated_output_verbatim() {
        let truncated: GeminiGenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"classifications\": [{\"id\":\"1\",\"categ" }] },
                "finishReason": "MAX_TOKENS"
            }]
        }))
        .unwrap();
        assert_eq!(
            extract_output_text(truncated).unwrap(),
            "{\"classifications\": [{\"id\":\"1\",\"categ"
        );
    }

    #[test]
    fn test_error_message_prefers_google_envelope() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
        assert_eq!(error_message("upstream exploded"), "upstream exploded");
    }
}
