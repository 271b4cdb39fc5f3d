//! Decoding of PNG text chunks (`tEXt`, `zTXt`, `iTXt`) into keyword/text pairs

use crate::inflate::inflate;
use crate::png::PngChunk;
use crate::utils::latin1_to_string;

/// PNG limits text-chunk keywords to 1..=79 bytes.
const MAX_KEYWORD_LEN: usize = 79;

/// One decoded text payload.
///
/// `raw_bytes` holds the bytes of the text *before* the final character
/// decoding step (after inflation, where applicable), because downstream
/// recovery must operate on bytes that an incorrect Latin-1 decode may have
/// already obscured in `text`.
#[derive(Debug, Clone)]
pub struct TextPayload {
    pub keyword: String,
    pub text: String,
    pub raw_bytes: Vec<u8>,
}

/// Decode a text chunk into a [`TextPayload`].
///
/// Returns `None` for non-text chunk types and for any malformed sub-field
/// (missing NUL separators, bad keyword length, failed inflate). A `None`
/// skips this chunk only; it never aborts the surrounding walk.
pub fn decode_text_chunk(chunk: &PngChunk) -> Option<TextPayload> {
    match &chunk.chunk_type {
        b"tEXt" => decode_text(&chunk.data),
        b"zTXt" => decode_ztxt(&chunk.data),
        b"iTXt" => decode_itxt(&chunk.data),
        _ => None,
    }
}

/// Read just the keyword of a text chunk, without inflating or decoding the
/// body. All three text types start with `keyword NUL`.
pub fn chunk_keyword(chunk: &PngChunk) -> Option<String> {
    if !chunk.is_text() {
        return None;
    }
    let null_pos = chunk.data.iter().position(|&b| b == 0)?;
    keyword_from(&chunk.data[..null_pos])
}

fn keyword_from(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() || bytes.len() > MAX_KEYWORD_LEN {
        return None;
    }
    // Keywords are Latin-1 per the PNG spec
    Some(latin1_to_string(bytes))
}

/// `tEXt`: `keyword NUL text`, both nominally Latin-1.
///
/// Real-world producers put UTF-8 bytes in the text field; the raw bytes are
/// preserved so the normalization layer can retry the decode.
fn decode_text(data: &[u8]) -> Option<TextPayload> {
    let null_pos = data.iter().position(|&b| b == 0)?;
    let keyword = keyword_from(&data[..null_pos])?;
    let raw = &data[null_pos + 1..];

    Some(TextPayload {
        keyword,
        text: latin1_to_string(raw),
        raw_bytes: raw.to_vec(),
    })
}

/// `zTXt`: `keyword NUL method compressed-text`; the text is always
/// zlib-compressed Latin-1. An inflate failure skips the chunk.
fn decode_ztxt(data: &[u8]) -> Option<TextPayload> {
    let null_pos = data.iter().position(|&b| b == 0)?;
    let keyword = keyword_from(&data[..null_pos])?;

    // One compression-method byte, then the compressed stream
    let compressed = data.get(null_pos + 2..)?;
    let raw = inflate(compressed).ok()?;

    Some(TextPayload {
        keyword,
        text: latin1_to_string(&raw),
        raw_bytes: raw,
    })
}

/// `iTXt`: `keyword NUL flag method language-tag NUL translated-keyword NUL
/// text`, text UTF-8 and compressed iff the flag byte is 1.
fn decode_itxt(data: &[u8]) -> Option<TextPayload> {
    let null_pos = data.iter().position(|&b| b == 0)?;
    let keyword = keyword_from(&data[..null_pos])?;

    let rest = data.get(null_pos + 1..)?;
    let (&compression_flag, rest) = rest.split_first()?;
    let (_method, rest) = rest.split_first()?;

    let lang_null = rest.iter().position(|&b| b == 0)?;
    let rest = &rest[lang_null + 1..];

    let trans_null = rest.iter().position(|&b| b == 0)?;
    let text_bytes = &rest[trans_null + 1..];

    let raw = if compression_flag == 1 {
        inflate(text_bytes).ok()?
    } else {
        text_bytes.to_vec()
    };

    let text = String::from_utf8_lossy(&raw).into_owned();
    Some(TextPayload { keyword, text, raw_bytes: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{deflate, itxt_chunk_data, text_chunk_data};

    fn chunk(chunk_type: &[u8; 4], data: Vec<u8>) -> PngChunk {
        PngChunk {
            length: data.len() as u32,
            chunk_type: *chunk_type,
            crc: crate::utils::chunk_crc32(chunk_type, &data),
            data,
        }
    }

    #[test]
    fn test_decode_text_chunk() {
        let c = chunk(b"tEXt", text_chunk_data("chara", b"{\"name\":\"Orb\"}"));
        let payload = decode_text_chunk(&c).unwrap();
        assert_eq!(payload.keyword, "chara");
        assert_eq!(payload.text, "{\"name\":\"Orb\"}");
        assert_eq!(payload.raw_bytes, b"{\"name\":\"Orb\"}");
    }

    #[test]
    fn test_text_preserves_raw_utf8_bytes() {
        // UTF-8 bytes in a nominally Latin-1 field: text is mojibake but
        // raw_bytes keep the original encoding.
        let json = "{\"name\":\"café\"}";
        let c = chunk(b"tEXt", text_chunk_data("chara", json.as_bytes()));
        let payload = decode_text_chunk(&c).unwrap();
        assert_ne!(payload.text, json);
        assert_eq!(payload.raw_bytes, json.as_bytes());
    }

    #[test]
    fn test_decode_ztxt_chunk() {
        let mut data = b"chara\0\0".to_vec();
        data.extend_from_slice(&deflate(b"{\"id\":\"x\"}"));
        let payload = decode_text_chunk(&chunk(b"zTXt", data)).unwrap();
        assert_eq!(payload.keyword, "chara");
        assert_eq!(payload.text, "{\"id\":\"x\"}");
    }

    #[test]
    fn test_ztxt_bad_stream_skipped() {
        let data = b"chara\0\0not compressed".to_vec();
        assert!(decode_text_chunk(&chunk(b"zTXt", data)).is_none());
    }

    #[test]
    fn test_decode_itxt_uncompressed() {
        let data = itxt_chunk_data("chara", "{\"name\":\"日本\"}".as_bytes(), false);
        let payload = decode_text_chunk(&chunk(b"iTXt", data)).unwrap();
        assert_eq!(payload.keyword, "chara");
        assert_eq!(payload.text, "{\"name\":\"日本\"}");
    }

    #[test]
    fn test_decode_itxt_compressed() {
        let data = itxt_chunk_data("chara", b"{\"name\":\"Z\"}", true);
        let payload = decode_text_chunk(&chunk(b"iTXt", data)).unwrap();
        assert_eq!(payload.text, "{\"name\":\"Z\"}");
    }

    #[test]
    fn test_itxt_missing_nul_skipped() {
        // keyword + flag/method but no language/translated-keyword separators
        let data = b"chara\0\0\0no separators here".to_vec();
        assert!(decode_text_chunk(&chunk(b"iTXt", data)).is_none());
    }

    #[test]
    fn test_non_text_chunk_ignored() {
        let c = chunk(b"IDAT", vec![1, 2, 3]);
        assert!(decode_text_chunk(&c).is_none());
        assert!(chunk_keyword(&c).is_none());
    }

    #[test]
    fn test_keyword_length_limits() {
        let empty = chunk(b"tEXt", b"\0text".to_vec());
        assert!(decode_text_chunk(&empty).is_none());

        let long = chunk(b"tEXt", [vec![b'k'; 80], b"\0text".to_vec()].concat());
        assert!(decode_text_chunk(&long).is_none());
    }

    #[test]
    fn test_chunk_keyword_fast_path() {
        let c = chunk(b"zTXt", b"Chara\0\0junk".to_vec());
        assert_eq!(chunk_keyword(&c).unwrap(), "Chara");
    }
}
