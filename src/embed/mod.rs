//! Card embedding: rewrite a PNG with exactly one canonical card chunk
//!
//! The input buffer is never mutated; chunks are re-emitted to a fresh
//! buffer in their original order, minus any stale text chunk under the
//! canonical keyword, plus one new uncompressed `iTXt` immediately before
//! `IEND`. Repeated embeds therefore never accumulate duplicates.

use crate::png::text::chunk_keyword;
use crate::png::{begin_png, write_chunk, write_chunk_verbatim, ChunkWalker};
use crate::{CardResult, CANONICAL_KEYWORD};

/// Embed card JSON into PNG bytes, returning a new buffer.
///
/// The text is written verbatim as the UTF-8 body of an `iTXt` chunk under
/// [`CANONICAL_KEYWORD`]; callers canonicalize the JSON first.
pub fn embed_card(data: &[u8], card_json: &str) -> CardResult<Vec<u8>> {
    rebuild(data, Some(card_json))
}

/// Strip every canonical-keyword text chunk without writing a replacement.
pub fn remove_card(data: &[u8]) -> CardResult<Vec<u8>> {
    rebuild(data, None)
}

fn rebuild(data: &[u8], card_json: Option<&str>) -> CardResult<Vec<u8>> {
    let extra = card_json.map_or(0, str::len) + 32;
    let mut out = begin_png(data.len() + extra);
    let mut wrote_card = false;

    for chunk in ChunkWalker::new(data)? {
        let chunk = chunk?;

        // Drop stale card chunks so edits never accumulate
        if chunk.is_text() && is_canonical_keyword(chunk_keyword(&chunk).as_deref()) {
            continue;
        }

        if &chunk.chunk_type == b"IEND" {
            if let Some(json) = card_json {
                write_chunk(&mut out, b"iTXt", &build_card_itxt(json));
                wrote_card = true;
            }
        }

        // Foreign chunks are copied with their stored CRC untouched
        write_chunk_verbatim(&mut out, &chunk);
    }

    // Damaged file with no IEND: still terminate with the card chunk
    if !wrote_card {
        if let Some(json) = card_json {
            write_chunk(&mut out, b"iTXt", &build_card_itxt(json));
        }
    }

    Ok(out)
}

fn is_canonical_keyword(keyword: Option<&str>) -> bool {
    keyword.is_some_and(|k| k.eq_ignore_ascii_case(CANONICAL_KEYWORD))
}

/// iTXt body: canonical keyword, compression flag 0, compression method 0,
/// empty language tag, empty translated keyword, UTF-8 text.
///
/// Never compressed on write: a few hundred bytes of size buys guaranteed
/// compatibility with readers that do not implement inflate.
fn build_card_itxt(card_json: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(CANONICAL_KEYWORD.len() + 5 + card_json.len());
    body.extend_from_slice(CANONICAL_KEYWORD.as_bytes());
    body.push(0);
    body.push(0); // compression flag
    body.push(0); // compression method
    body.push(0); // empty language tag
    body.push(0); // empty translated keyword
    body.extend_from_slice(card_json.as_bytes());
    body
}
