// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Request-scoped secrets.
//!
//! A [`Credential`] is handed to the core on every call and dropped with the
//! request. It is never read from ambient storage and never persisted.

use std::fmt;

/// Values a browser client produces when it serializes an absent key.
const PLACEHOLDER_VALUES: [&str; 2] = ["null", "undefined"];

/// Opaque bearer secret (model API key or delegated Gmail access token).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Accepts a raw secret, rejecting empty strings and serialized placeholders.
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || PLACEHOLDER_VALUES.contains(&raw) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Parses an `Authorization` header value of the form `<scheme> <secret>`.
    pub fn from_authorization(header: Option<&str>) -> Option<Self> {
        header.and_then(bearer_token).and_then(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Returns the second space-separated token of an `Authorization` header.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.split(' ').nth(1)
}
