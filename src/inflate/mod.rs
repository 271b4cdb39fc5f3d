//! DEFLATE adapter for compressed text chunks
//!
//! `zTXt` payloads are always zlib-compressed and `iTXt` payloads may be.
//! Garbage input yields a recoverable [`CardError::NotDeflate`] so one
//! corrupt chunk never stops the scan of the remaining chunks.
//!
//! The embedder never compresses on write, so this module is read-side only.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::{CardError, CardResult};

/// Cap on decompressed output. Text-chunk card payloads are tens of
/// kilobytes in practice; anything expanding past this is not ours.
const MAX_INFLATED: usize = 16 * 1024 * 1024;

/// Decompress a zlib/DEFLATE stream
pub fn inflate(bytes: &[u8]) -> CardResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    decoder
        .by_ref()
        .take(MAX_INFLATED as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| CardError::NotDeflate(e.to_string()))?;

    if out.len() > MAX_INFLATED {
        return Err(CardError::NotDeflate("decompressed output too large".to_string()));
    }

    Ok(out)
}
