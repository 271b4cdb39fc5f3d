//! Card extraction: candidate selection over decoded text payloads
//!
//! Every `tEXt`/`zTXt`/`iTXt` chunk is decoded; per-chunk failures are
//! silent and never stop the scan. Payloads whose keyword is on the
//! known-card allowlist are prioritized; among those the last one in chunk
//! order wins, on the convention that later chunks are the more recent
//! edit. Without any prioritized payload, every text payload is tried,
//! most recent first.

use crate::card::{normalize, CardDocument};
use crate::png::text::{decode_text_chunk, TextPayload};
use crate::png::ChunkWalker;
use crate::{CardError, CardResult, PRIORITY_KEYWORDS};

/// Extract a character card from PNG bytes.
///
/// Fails with `NotPng` on a bad signature, `Truncated` on a chunk running
/// past the buffer, and `NoCardFound` when no candidate payload survives
/// the recovery chain. Partial data is never returned.
pub fn extract_card(data: &[u8]) -> CardResult<CardDocument> {
    let payloads = collect_text_payloads(data)?;

    for payload in select_candidates(payloads) {
        if let Ok(card) = normalize(&payload) {
            return Ok(card);
        }
    }

    Err(CardError::NoCardFound)
}

/// Decode every text chunk in the file, in chunk order, skipping decode
/// failures silently.
fn collect_text_payloads(data: &[u8]) -> CardResult<Vec<TextPayload>> {
    let mut payloads = Vec::new();
    for chunk in ChunkWalker::new(data)? {
        let chunk = chunk?;
        if let Some(payload) = decode_text_chunk(&chunk) {
            payloads.push(payload);
        }
    }
    Ok(payloads)
}

/// Apply the selection policy: sole last-prioritized candidate if any
/// keyword matched the allowlist, otherwise all payloads most-recent-first.
fn select_candidates(payloads: Vec<TextPayload>) -> Vec<TextPayload> {
    let (mut prioritized, mut others): (Vec<_>, Vec<_>) = payloads
        .into_iter()
        .partition(|p| PRIORITY_KEYWORDS.contains(&p.keyword.to_ascii_lowercase().as_str()));

    if let Some(last) = prioritized.pop() {
        vec![last]
    } else {
        others.reverse();
        others
    }
}

/// One text chunk's metadata, for the inspection surface.
#[derive(Debug, Clone)]
pub struct TextChunkInfo {
    pub keyword: String,
    pub chunk_type: String,
    pub text_len: usize,
    pub is_json: bool,
    pub crc_ok: bool,
}

/// List every decodable text chunk in the file: keyword, chunk type, text
/// size, whether the text parses as JSON, and whether the stored CRC holds.
///
/// Indexers and editors share this view instead of re-implementing their
/// own chunk scans.
pub fn inspect_text_chunks(data: &[u8]) -> CardResult<Vec<TextChunkInfo>> {
    let mut infos = Vec::new();
    for chunk in ChunkWalker::new(data)? {
        let chunk = chunk?;
        if let Some(payload) = decode_text_chunk(&chunk) {
            infos.push(TextChunkInfo {
                keyword: payload.keyword,
                chunk_type: chunk.type_string(),
                text_len: payload.text.len(),
                is_json: serde_json::from_str::<serde_json::Value>(&payload.text).is_ok(),
                crc_ok: chunk.crc_matches(),
            });
        }
    }
    Ok(infos)
}
