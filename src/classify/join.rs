// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use serde::Serialize;

use super::types::{Category, ClassificationResult, EmailSummary};

/// An email together with its assignment, if one was returned for its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedEmail {
    #[serde(flatten)]
    pub email: EmailSummary,
    pub category: Option<Category>,
    pub reason: Option<String>,
}

impl ClassifiedEmail {
    pub fn is_classified(&self) -> bool {
        self.category.is_some()
    }
}

/// Keyed lookup of results onto a locally held email list.
///
/// Emails whose id has no result stay unclassified; results for unknown ids
/// are ignored. Email order is preserved.
pub fn join_classifications(
    emails: Vec<EmailSummary>,
    results: &[ClassificationResult],
) -> Vec<ClassifiedEmail> {
    let by_id: HashMap<&str, &ClassificationResult> =
        results.iter().map(|r| (r.id.as_str(), r)).collect();

    emails
        .into_iter()
        .map(|email| {
            let hit = by_id.get(email.id.as_str()).copied();
            ClassifiedEmail {
                category: hit.map(|r| r.category),
                reason: hit.map(|r| r.reason.clone()),
                email,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_marks_missing_ids_unclassified() {
        let emails = vec![
            EmailSummary::new("a", "x@y.com", "Hi", ""),
            EmailSummary::new("b", "z@y.com", "Deal", ""),
        ];
        let results = vec![
            ClassificationResult {
                id: "b".to_string(),
                category: Category::Promotions,
                reason: "Sale".to_string(),
            },
            ClassificationResult {
                id: "zzz".to_string(),
                category: Category::Spam,
                reason: "Unknown".to_string(),
            },
        ];

        let joined = join_classifications(emails, &results);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].email.id, "a");
        assert!(!joined[0].is_classified());
        assert_eq!(joined[1].category, Some(Category::Promotions));
        assert_eq!(joined[1].reason.as_deref(), Some("Sale"));
    }
}
