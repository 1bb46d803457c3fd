// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gmail API response normalization

use std::collections::HashMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use log::debug;

use super::api::{GmailMessage, Header, MessagePart};
use crate::classify::EmailSummary;

/// Normalize a Gmail API message to an [`EmailSummary`].
///
/// Missing headers become empty strings; a missing or undecodable body
/// becomes `None`.
pub fn normalize_message(message: GmailMessage) -> EmailSummary {
    let payload = message.payload.unwrap_or_default();
    let headers = header_map(&payload.headers);

    let from = headers.get("from").cloned().unwrap_or_default();
    let subject = headers.get("subject").cloned().unwrap_or_default();
    let body = extract_body(&payload);

    EmailSummary {
        id: message.id,
        from,
        subject,
        snippet: message.snippet,
        body,
    }
}

/// Case-insensitive header lookup table. The first occurrence of a name wins.
fn header_map(headers: &[Header]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(headers.len());
    for header in headers {
        map.entry(header.name.to_ascii_lowercase())
            .or_insert_with(|| header.value.clone());
    }
    map
}

fn is_plain_text(part: &MessagePart) -> bool {
    part.mime_type
        .as_deref()
        .is_some_and(|m| m.eq_ignore_ascii_case("text/plain"))
}

/// Depth-first search for the first `text/plain` part with data.
fn find_plain_text(parts: &[MessagePart]) -> Option<String> {
    parts.iter().find_map(|part| {
        if is_plain_text(part) {
            if let Some(text) = part_data(part).and_then(decode_base64url) {
                return Some(text);
            }
        }
        find_plain_text(&part.parts)
    })
}

fn part_data(part: &MessagePart) -> Option<&str> {
    part.body.as_ref()?.data.as_deref()
}

/// Body text: a `text/plain` part for multipart messages, otherwise the
/// top-level body data.
fn extract_body(payload: &MessagePart) -> Option<String> {
    if !payload.parts.is_empty() {
        return find_plain_text(&payload.parts);
    }
    part_data(payload).and_then(decode_base64url)
}

/// Decodes base64url data with or without `=` padding.
fn decode_base64url(data: &str) -> Option<String> {
    match URL_SAFE_NO_PAD.decode(data.trim_end_matches('=')) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!("Skipping undecodable body data: {}", e);
            None
        }
    }
}
