//! Low-level PNG chunk walking and serialization using manual byte slicing

pub mod text;

use crate::utils::{chunk_crc32, is_png_signature, read_u32_be, PNG_SIGNATURE};
use crate::{CardError, CardResult};

/// PNG chunk structure
#[derive(Debug, Clone)]
pub struct PngChunk {
    pub length: u32,
    pub chunk_type: [u8; 4],
    pub data: Vec<u8>,
    pub crc: u32,
}

impl PngChunk {
    /// Chunk type tag as a lossy string, for display and matching.
    pub fn type_string(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).to_string()
    }

    /// True for the three PNG text chunk types.
    pub fn is_text(&self) -> bool {
        matches!(&self.chunk_type, b"tEXt" | b"zTXt" | b"iTXt")
    }

    /// True when the stored CRC matches a recomputation over `type ++ data`.
    ///
    /// The walker does not enforce this: foreign tools write broken CRCs and
    /// the extractor's posture is recovery-first. The embedder always
    /// recomputes on write.
    pub fn crc_matches(&self) -> bool {
        self.crc == chunk_crc32(&self.chunk_type, &self.data)
    }
}

/// Lazy walker over the chunks of a PNG byte buffer.
///
/// Validates the signature up front, then yields one [`PngChunk`] per call
/// until `IEND` (bytes after `IEND` are never read). A chunk whose declared
/// length runs past the buffer yields [`CardError::Truncated`] and ends the
/// walk; chunks yielded before that point remain valid.
pub struct ChunkWalker<'a> {
    data: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> ChunkWalker<'a> {
    /// Start a walk, failing with [`CardError::NotPng`] on a bad signature.
    pub fn new(data: &'a [u8]) -> CardResult<Self> {
        if !is_png_signature(data) {
            return Err(CardError::NotPng);
        }
        Ok(Self { data, offset: 8, done: false })
    }

    /// Walk the whole buffer and collect every chunk.
    pub fn collect_chunks(data: &'a [u8]) -> CardResult<Vec<PngChunk>> {
        Self::new(data)?.collect()
    }
}

impl Iterator for ChunkWalker<'_> {
    type Item = CardResult<PngChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let remaining = self.data.len() - self.offset;
        if remaining == 0 {
            // Buffer ended without IEND; tolerated as a clean stop.
            self.done = true;
            return None;
        }
        if remaining < 12 {
            self.done = true;
            return Some(Err(CardError::Truncated { needed: 12, remaining }));
        }

        let length = read_u32_be(self.data, self.offset) as usize;
        let needed = 12 + length;
        if needed > remaining {
            self.done = true;
            return Some(Err(CardError::Truncated { needed, remaining }));
        }

        let type_start = self.offset + 4;
        let chunk_type: [u8; 4] = self.data[type_start..type_start + 4]
            .try_into()
            .expect("slice of length 4");

        let data_start = type_start + 4;
        let data_end = data_start + length;
        let chunk_data = self.data[data_start..data_end].to_vec();
        let crc = read_u32_be(self.data, data_end);

        self.offset = data_end + 4;

        // IEND marks the logical end of the file
        if &chunk_type == b"IEND" {
            self.done = true;
        }

        Some(Ok(PngChunk {
            length: length as u32,
            chunk_type,
            data: chunk_data,
            crc,
        }))
    }
}

/// Append one serialized chunk (length, type, data, recomputed CRC) to `out`.
pub fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    out.extend_from_slice(&chunk_crc32(chunk_type, data).to_be_bytes());
}

/// Append a chunk exactly as it was read, preserving its stored CRC.
pub fn write_chunk_verbatim(out: &mut Vec<u8>, chunk: &PngChunk) {
    out.extend_from_slice(&chunk.length.to_be_bytes());
    out.extend_from_slice(&chunk.chunk_type);
    out.extend_from_slice(&chunk.data);
    out.extend_from_slice(&chunk.crc.to_be_bytes());
}

/// Start a fresh PNG buffer with the fixed signature.
pub fn begin_png(capacity: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(capacity);
    out.extend_from_slice(&PNG_SIGNATURE);
    out
}
