// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structural validation of model output against the batch it answers.
//!
//! Nothing here repairs the output. Text that is not JSON (prose, or a
//! candidate cut off mid-object), an unknown category, an empty reason and
//! any foreign, duplicated or missing id are all schema violations.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::error::ClassifyError;
use super::types::{Category, ClassificationResult, EmailSummary};

#[derive(Debug, Deserialize)]
struct RawBatch {
    classifications: Vec<RawClassification>,
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    id: String,
    category: String,
    reason: String,
}

/// Parses `{ "classifications": [...] }` and checks it covers `batch` exactly.
pub fn parse_classifications(
    output: &str,
    batch: &[EmailSummary],
) -> Result<Vec<ClassificationResult>, ClassifyError> {
    let value: Value = serde_json::from_str(output.trim())
        .map_err(|e| ClassifyError::schema_violation(format!("output is not valid JSON: {}", e)))?;
    let raw: RawBatch = serde_json::from_value(value)
        .map_err(|e| ClassifyError::schema_violation(format!("unexpected output shape: {}", e)))?;

    let expected: HashSet<&str> = batch.iter().map(|e| e.id.as_str()).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.classifications.len());
    let mut results = Vec::with_capacity(raw.classifications.len());

    for item in raw.classifications {
        let category: Category = item.category.parse().map_err(|e| {
            ClassifyError::schema_violation(format!("email '{}': {}", item.id, e))
        })?;

        if item.reason.trim().is_empty() {
            return Err(ClassifyError::schema_violation(format!(
                "email '{}': reason is empty",
                item.id
            )));
        }
        if !expected.contains(item.id.as_str()) {
            return Err(ClassifyError::schema_violation(format!(
                "id '{}' does not belong to the batch",
                item.id
            )));
        }
        if !seen.insert(item.id.clone()) {
            return Err(ClassifyError::schema_violation(format!(
                "id '{}' was classified more than once",
                item.id
            )));
        }

        results.push(ClassificationResult {
            id: item.id,
            category,
            reason: item.reason,
        });
    }

    if results.len() != batch.len() {
        let mut missing: Vec<&str> = batch
            .iter()
            .map(|e| e.id.as_str())
            .filter(|id| !seen.contains(*id))
            .collect();
        missing.sort_unstable();
        return Err(ClassifyError::schema_violation(format!(
            "expected {} classifications, got {} (missing ids: {})",
            batch.len(),
            results.len(),
            missing.join(", ")
        )));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(output: Value, batch: &[EmailSummary]) -> Result<Vec<ClassificationResult>, ClassifyError> {
        parse_classifications(&output.to_string(), batch)
    }

    fn batch(ids: &[&str]) -> Vec<EmailSummary> {
        ids.iter()
            .map(|id| EmailSummary::new(*id, "a@x.com", "subject", "snippet"))
            .collect()
    }

    fn assert_violation(result: Result<Vec<ClassificationResult>, ClassifyError>, needle: &str) {
        match result {
            Err(ClassifyError::SchemaViolation(message)) => {
                assert!(message.contains(needle), "'{}' does not mention '{}'", message, needle)
            }
            other => panic!("Expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_output_is_accepted() {
        let output = json!({ "classifications": [
            { "id": "2", "category": "Social", "reason": "Friend request" },
            { "id": "1", "category": "Promotions", "reason": "Discount offer" }
        ]});
        let results = parse(output, &batch(&["1", "2"])).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "2");
        assert_eq!(results[1].category, Category::Promotions);
    }

    #[test]
    fn test_unknown_category_is_not_coerced() {
        let output = json!({ "classifications": [
            { "id": "1", "category": "Urgent", "reason": "Looks urgent" }
        ]});
        assert_violation(parse(output, &batch(&["1"])), "Urgent");
    }

    #[test]
    fn test_missing_ids_are_reported() {
        let output = json!({ "classifications": [
            { "id": "1", "category": "General", "reason": "Nothing special" },
            { "id": "2", "category": "General", "reason": "Nothing special" }
        ]});
        assert_violation(
            parse(output, &batch(&["1", "2", "3"])),
            "expected 3 classifications, got 2 (missing ids: 3)",
        );
    }

    #[test]
    fn test_foreign_and_duplicate_ids_are_rejected() {
        let foreign = json!({ "classifications": [
            { "id": "9", "category": "Spam", "reason": "Phishing" }
        ]});
        assert_violation(parse(foreign, &batch(&["1"])), "does not belong");

        let duplicate = json!({ "classifications": [
            { "id": "1", "category": "Spam", "reason": "Phishing" },
            { "id": "1", "category": "Spam", "reason": "Phishing" }
        ]});
        assert_violation(parse(duplicate, &batch(&["1", "2"])), "more than once");
    }

    #[test]
    fn test_empty_reason_and_bad_shape() {
        let empty_reason = json!({ "classifications": [
            { "id": "1", "category": "Spam", "reason": "  " }
        ]});
        assert_violation(parse(empty_reason, &batch(&["1"])), "reason is empty");

        let bare_array = json!([{ "id": "1", "category": "Spam", "reason": "Phishing" }]);
        assert_violation(parse(bare_array, &batch(&["1"])), "unexpected output shape");
    }

    #[test]
    fn test_truncated_or_prose_output_is_a_violation() {
        let emails = batch(&["1"]);
        assert_violation(
            parse_classifications(r#"{"classifications": [{"id":"1","categ"#, &emails),
            "not valid JSON",
        );
        assert_violation(
            parse_classifications("Sure! Here are your classifications.", &emails),
            "not valid JSON",
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let output = "\n {\"classifications\": [{\"id\":\"1\",\"category\":\"Spam\",\"reason\":\"Phishing\"}]}\n";
        let results = parse_classifications(output, &batch(&["1"])).unwrap();
        assert_eq!(results[0].category, Category::Spam);
    }
}
