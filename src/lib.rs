//! # PNG character-card codec
//!
//! This library embeds a JSON character descriptor ("card") inside a PNG's
//! text chunks and recovers it back out of arbitrary PNG files, including
//! files written by other tools with inconsistent keywords, encodings, and
//! card schemas.
//!
//! The write side produces a single uncompressed `iTXt` chunk under the
//! canonical `chara` keyword. The read side walks every `tEXt`/`zTXt`/`iTXt`
//! chunk and runs the best candidate through a tolerant recovery chain
//! (loose JSON, byte reinterpretation, mojibake repair, base64 fallback).

// Public API exports
pub mod card;
pub mod embed;
pub mod extract;
pub mod inflate;
pub mod png;
pub mod utils;

#[cfg(test)]
pub(crate) mod testutil;

pub use card::{normalize, CardDocument, CardLink, SchemaVariant};
pub use embed::{embed_card, remove_card};
pub use extract::{extract_card, inspect_text_chunks, TextChunkInfo};
pub use png::{ChunkWalker, PngChunk};

/// Keyword written by [`embed_card`]; matched case-insensitively on read.
///
/// This is the wire-level convention shared with other card tools. Changing
/// it breaks extraction for every previously embedded file.
pub const CANONICAL_KEYWORD: &str = "chara";

/// Lower-cased keywords recognized as card chunks written by this tool or by
/// compatible tools.
pub const PRIORITY_KEYWORDS: &[&str] = &["chara", "ccv3", "ccv2", "card", "character"];

/// Result type alias for codec operations
pub type CardResult<T> = Result<T, CardError>;

/// Error type for the card codec
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// The buffer does not start with the 8-byte PNG signature.
    #[error("not a PNG: signature mismatch")]
    NotPng,

    /// A chunk declares more bytes than remain in the buffer.
    #[error("truncated PNG: needed {needed} bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },

    /// A compressed text payload is not a valid zlib/DEFLATE stream.
    #[error("not a DEFLATE stream: {0}")]
    NotDeflate(String),

    /// Every recovery step failed for one candidate payload.
    #[error("payload under keyword {keyword:?} is not recoverable card JSON")]
    Unparseable { keyword: String },

    /// No text chunk in the whole file produced a card.
    #[error("no character card found in any text chunk")]
    NoCardFound,

    /// Input file error (CLI layer only; the codec itself does no I/O).
    #[error("input file error: {0}")]
    Io(#[from] std::io::Error),
}
