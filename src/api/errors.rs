// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error handling for the REST API
//!
//! Every failure is returned as `{ "error": <message>, "code": <CODE>, "status": <u16> }`
//! with a matching HTTP status:
//! - credential problems → 401
//! - malformed input → 400
//! - provider, schema and mail-fetch failures → 500

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::ClassifyError;
use crate::gmail::GmailError;

/// Standardized error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    pub status: u16,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Classification(#[from] ClassifyError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Failed to fetch emails")]
    MailFetch(#[source] GmailError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Classification(ClassifyError::MissingCredential) => "MISSING_CREDENTIAL",
            ApiError::Classification(ClassifyError::InvalidRequest(_)) => "INVALID_REQUEST",
            ApiError::Classification(ClassifyError::ProviderError { .. }) => "PROVIDER_ERROR",
            ApiError::Classification(ClassifyError::SchemaViolation(_)) => "SCHEMA_VIOLATION",
            ApiError::NotAuthenticated => "NOT_AUTHENTICATED",
            ApiError::MailFetch(_) => "MAIL_FETCH_FAILED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl From<GmailError> for ApiError {
    fn from(err: GmailError) -> Self {
        ApiError::MailFetch(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Classification(ClassifyError::MissingCredential) | ApiError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Classification(ClassifyError::InvalidRequest(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Classification(ClassifyError::ProviderError { .. })
            | ApiError::Classification(ClassifyError::SchemaViolation(_))
            | ApiError::MailFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::MailFetch(source) => log::error!("Error fetching emails: {}", source),
            _ if status.is_server_error() => log::error!("Server error: {} ({})", self, status),
            _ => log::warn!("Client error: {} ({})", self, status),
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(ClassifyError::MissingCredential).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(ClassifyError::invalid_request("x")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ClassifyError::schema_violation("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ClassifyError::ProviderError {
                provider: "Google".to_string(),
                message: "boom".to_string()
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::NotAuthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(GmailError::Request("timeout".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::from(ClassifyError::MissingCredential).code(), "MISSING_CREDENTIAL");
        assert_eq!(ApiError::from(ClassifyError::schema_violation("x")).code(), "SCHEMA_VIOLATION");
        assert_eq!(ApiError::BadRequest("x".to_string()).code(), "BAD_REQUEST");
    }

    #[actix_web::test]
    async fn test_mail_fetch_hides_upstream_detail() {
        let err = ApiError::from(GmailError::Status {
            status: 403,
            body: "insufficient scopes".to_string(),
        });
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Failed to fetch emails");
        assert_eq!(parsed.code, "MAIL_FETCH_FAILED");
        assert_eq!(parsed.status, 500);
    }
}
