// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ModelProvider, ProviderError, StructuredRequest};
use crate::credential::Credential;

/// Provider that answers every call with the same canned outcome.
///
/// Records the last instruction it saw so callers can inspect the prompt.
#[derive(Debug)]
pub struct StaticProvider {
    outcome: Result<String, String>,
    calls: AtomicUsize,
    last_instruction: Mutex<Option<String>>,
}

impl StaticProvider {
    pub fn returning(output: Value) -> Self {
        Self::with_outcome(Ok(output.to_string()))
    }

    /// Answers with `text` verbatim, whether or not it is valid JSON.
    pub fn returning_text(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Err(message.into()))
    }

    fn with_outcome(outcome: Result<String, String>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_instruction: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_instruction(&self) -> Option<String> {
        self.last_instruction.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ModelProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "Static"
    }

    async fn generate_structured(
        &self,
        request: &StructuredRequest,
        _credential: &Credential,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_instruction.lock() {
            *guard = Some(request.instruction.clone());
        }
        self.outcome.clone().map_err(ProviderError::Other)
    }
}
