// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Model instruction and response schema for batch classification.

use serde::Serialize;
use serde_json::{json, Value};

use super::types::{Category, EmailSummary};

/// Fields of an email that are sent to the model. The body is left out to
/// bound token cost.
#[derive(Debug, Serialize)]
struct PromptEmail<'a> {
    id: &'a str,
    from: &'a str,
    subject: &'a str,
    snippet: &'a str,
}

impl<'a> From<&'a EmailSummary> for PromptEmail<'a> {
    fn from(email: &'a EmailSummary) -> Self {
        Self {
            id: &email.id,
            from: &email.from,
            subject: &email.subject,
            snippet: &email.snippet,
        }
    }
}

/// Serializes the projected batch as the JSON data payload of the prompt.
pub fn email_payload(emails: &[EmailSummary]) -> Result<String, serde_json::Error> {
    let projected: Vec<PromptEmail<'_>> = emails.iter().map(PromptEmail::from).collect();
    serde_json::to_string(&projected)
}

/// Builds the single instruction sent to the model for a batch.
pub fn build_instruction(emails: &[EmailSummary]) -> Result<String, serde_json::Error> {
    let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    let rules: String = Category::ALL
        .iter()
        .map(|c| format!("- {}: {}\n", c.as_str(), c.rule()))
        .collect();

    Ok(format!(
        "You are an expert email classifier. Classify the following list of emails \
(provided as a JSON array) into one of the following categories: {names}.\n\
\n\
Rules:\n\
{rules}\
\n\
Respond *only* with a JSON object that matches the requested schema.\n\
\n\
Emails to classify:\n\
{payload}\n",
        names = names.join(", "),
        rules = rules,
        payload = email_payload(emails)?,
    ))
}

/// Schema the model output must conform to:
/// `{ classifications: [{ id, category, reason }] }` with `category`
/// restricted to the six known names.
pub fn response_schema() -> Value {
    let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "classifications": {
                "type": "ARRAY",
                "description": "The array of classification results for all emails.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {
                            "type": "STRING",
                            "description": "The unique ID of the email"
                        },
                        "category": {
                            "type": "STRING",
                            "enum": names,
                            "description": "The *single* most appropriate category for the email"
                        },
                        "reason": {
                            "type": "STRING",
                            "description": "A brief (1-sentence) reason for the classification."
                        }
                    },
                    "required": ["id", "category", "reason"]
                }
            }
        },
        "required": ["classifications"]
    })
}
