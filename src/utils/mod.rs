//! Byte-level helpers shared by the chunk walker and embedder

use crc32fast::Hasher;

/// The fixed 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// CRC32 over a chunk's type tag followed by its data, without concatenating.
///
/// PNG stores this for every chunk. Must match the zlib polynomial
/// bit-for-bit or other viewers will reject written files.
pub fn chunk_crc32(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}

/// Read a big-endian u32 from byte slice
pub fn read_u32_be(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(bytes[offset..offset + 4].try_into().expect("slice too short"))
}

/// Validate PNG signature
pub fn is_png_signature(data: &[u8]) -> bool {
    data.len() >= 8 && data[0..8] == PNG_SIGNATURE
}

/// Decode bytes as Latin-1, mapping each byte to the code point of the same
/// value. Never fails; information-preserving for any input.
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Re-encode a string to Latin-1 bytes, one byte per char.
///
/// Returns `None` if any char is above U+00FF, i.e. the string could not
/// have come from a Latin-1 decode in the first place.
pub fn string_to_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(c as u32).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        // Standard CRC-32 check value for "123456789", split at the
        // type/data boundary
        assert_eq!(chunk_crc32(b"1234", b"56789"), 0xCBF43926);
    }

    #[test]
    fn test_chunk_crc32_matches_one_shot() {
        let data = b"keyword\0payload";
        let concat = [b"tEXt".as_slice(), data].concat();
        assert_eq!(chunk_crc32(b"tEXt", data), crc32fast::hash(&concat));
    }

    #[test]
    fn test_u32_be_roundtrip() {
        let buf = 0xDEADBEEFu32.to_be_bytes();
        assert_eq!(read_u32_be(&buf, 0), 0xDEADBEEF);
    }

    #[test]
    fn test_png_signature_validation() {
        assert!(is_png_signature(&PNG_SIGNATURE));

        let invalid_sig = [0x00, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(!is_png_signature(&invalid_sig));
        assert!(!is_png_signature(b"short"));
    }

    #[test]
    fn test_latin1_roundtrip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = latin1_to_string(&bytes);
        assert_eq!(string_to_latin1(&text).unwrap(), bytes);
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        assert_eq!(string_to_latin1("日本語"), None);
    }
}
