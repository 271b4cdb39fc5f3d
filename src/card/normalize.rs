//! Tolerant recovery of card JSON from a decoded text payload
//!
//! Payloads in the wild are malformed in recurring ways: log noise around
//! the object, UTF-8 written into a Latin-1 field, double-encoded mojibake,
//! base64-wrapped JSON. Each gets its own recovery step; the chain stops at
//! the first step that yields a JSON object.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

use crate::card::CardDocument;
use crate::png::text::TextPayload;
use crate::utils::string_to_latin1;
use crate::{CardError, CardResult};

/// Recover a [`CardDocument`] from one text payload.
///
/// Attempted in order, stopping at first success:
/// 1. strict JSON parse of the decoded text
/// 2. loose parse of the first-`{`-to-last-`}` slice
/// 3. steps 1–2 on the raw bytes re-decoded as UTF-8
/// 4. steps 1–2 after mojibake repair
/// 5. steps 1–2 on the base64-decoded text
///
/// A payload that exhausts the chain, or that parses to JSON with no
/// recognized card field, fails with [`CardError::Unparseable`].
pub fn normalize(payload: &TextPayload) -> CardResult<CardDocument> {
    let unparseable = || CardError::Unparseable { keyword: payload.keyword.clone() };

    let value = recover_json(payload).ok_or_else(unparseable)?;
    CardDocument::from_value(&value).ok_or_else(unparseable)
}

fn recover_json(payload: &TextPayload) -> Option<Value> {
    if let Some(value) = parse_object(&payload.text) {
        return Some(value);
    }

    // The text may be a bad Latin-1 decode of UTF-8 bytes; retry on the
    // bytes that existed before that decode.
    if let Ok(utf8) = std::str::from_utf8(&payload.raw_bytes) {
        if utf8 != payload.text {
            if let Some(value) = parse_object(utf8) {
                return Some(value);
            }
        }
    }

    if let Some(repaired) = repair_mojibake(&payload.text) {
        if let Some(value) = parse_object(&repaired) {
            return Some(value);
        }
    }

    if let Some(decoded) = try_base64(&payload.text) {
        if let Some(value) = parse_object(&decoded) {
            return Some(value);
        }
    }

    None
}

/// Strict parse, then loose: slice from the first `{` to the last `}` to
/// shed the leading/trailing noise some producers embed around the object.
fn parse_object(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .filter(Value::is_object)
}

/// Undo a Latin-1 mis-decode of UTF-8.
///
/// The signature: non-ASCII text whose every char still fits in one byte,
/// with no native-script characters above U+00FF. Re-encode one byte per
/// char and adopt the result only if those bytes are valid UTF-8.
fn repair_mojibake(text: &str) -> Option<String> {
    if text.is_ascii() {
        return None;
    }
    let bytes = string_to_latin1(text)?;
    String::from_utf8(bytes).ok()
}

/// Decode text that is plausibly base64-wrapped JSON.
///
/// Charset-restricted, longer than 64 bytes, length divisible by four; the
/// size floor keeps short ordinary words from being misread as base64.
fn try_base64(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() <= 64 || trimmed.len() % 4 != 0 {
        return None;
    }
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
    {
        return None;
    }

    let decoded = BASE64.decode(trimmed).ok()?;
    Some(String::from_utf8_lossy(&decoded).into_owned())
}
