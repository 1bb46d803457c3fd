// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Request and response records of the classification contract.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use super::error::ClassifyError;
use crate::credential::Credential;

/// One mail item as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmailSummary {
    #[validate(length(min = 1, message = "email id must not be empty"))]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub snippet: String,
    /// Decoded plain-text body. Never sent to the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Explicit `null` reads as an empty string. Other non-string values are errors.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl EmailSummary {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            subject: subject.into(),
            snippet: snippet.into(),
            body: None,
        }
    }
}

/// Closed set of labels the classifier may assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Important,
    Promotions,
    Social,
    Marketing,
    Spam,
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Important,
        Category::Promotions,
        Category::Social,
        Category::Marketing,
        Category::Spam,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Important => "Important",
            Category::Promotions => "Promotions",
            Category::Social => "Social",
            Category::Marketing => "Marketing",
            Category::Spam => "Spam",
            Category::General => "General",
        }
    }

    /// One-line disambiguation rule used in the model instruction.
    pub fn rule(&self) -> &'static str {
        match self {
            Category::Important => "Personal or work-related, urgent, requires action.",
            Category::Promotions => "Sales, discounts, marketing campaigns.",
            Category::Social => "Notifications from social media, friends, family.",
            Category::Marketing => "Newsletters, product updates, non-urgent announcements.",
            Category::Spam => "Unwanted, unsolicited, phishing.",
            Category::General => "If none of the above fit.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching is exact: the model must emit one of the six names verbatim.
impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("'{}' is not a known category", s))
    }
}

/// One output record, keyed by the id of an input email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub id: String,
    pub category: Category,
    pub reason: String,
}

/// A validated batch plus the credential that pays for the model call.
///
/// Only constructible through [`ClassificationBatchRequest::new`], so ids are
/// always non-empty and unique.
#[derive(Debug, Clone)]
pub struct ClassificationBatchRequest {
    emails: Vec<EmailSummary>,
    credential: Credential,
}

impl ClassificationBatchRequest {
    /// Validates ids (non-empty, unique within the batch) and builds the request.
    pub fn new(emails: Vec<EmailSummary>, credential: Credential) -> Result<Self, ClassifyError> {
        let mut seen = HashSet::with_capacity(emails.len());
        for (index, email) in emails.iter().enumerate() {
            email.validate().map_err(|e| {
                ClassifyError::invalid_request(format!("email at index {}: {}", index, e))
            })?;
            if !seen.insert(email.id.as_str()) {
                return Err(ClassifyError::invalid_request(format!(
                    "duplicate email id '{}'",
                    email.id
                )));
            }
        }
        Ok(Self { emails, credential })
    }

    /// Builds a request from an inbound `{ "emails": [...] }` payload.
    pub fn from_payload(payload: &Value, credential: Credential) -> Result<Self, ClassifyError> {
        let emails = payload
            .get("emails")
            .and_then(Value::as_array)
            .ok_or_else(|| ClassifyError::invalid_request("`emails` must be an array"))?;

        let emails = emails
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                EmailSummary::deserialize(raw).map_err(|e| {
                    ClassifyError::invalid_request(format!("email at index {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(emails, credential)
    }

    pub fn emails(&self) -> &[EmailSummary] {
        &self.emails
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// One result per input email. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationBatchResponse(Vec<ClassificationResult>);

impl ClassificationBatchResponse {
    pub fn new(results: Vec<ClassificationResult>) -> Self {
        Self(results)
    }

    pub fn results(&self) -> &[ClassificationResult] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ClassificationResult> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
