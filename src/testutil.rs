//! Shared chunk and file builders for in-crate tests

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

use crate::png::write_chunk;
use crate::utils::PNG_SIGNATURE;

const TEST_IHDR: [u8; 13] = [
    0x00, 0x00, 0x00, 0x01, // width = 1
    0x00, 0x00, 0x00, 0x01, // height = 1
    0x08, // bit depth = 8
    0x00, // color type = grayscale
    0x00, // compression = deflate
    0x00, // filter = adaptive
    0x00, // interlace = none
];

// Minimal zlib stream for a 1x1 grayscale image
const TEST_IDAT: [u8; 10] = [0x08, 0xD7, 0x63, 0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01];

/// zlib-compress data, for building zTXt/iTXt test chunks.
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Minimal valid 1x1 PNG: IHDR, IDAT, IEND.
pub fn minimal_png() -> Vec<u8> {
    png_with_chunks(&[])
}

/// Minimal valid PNG with the given extra chunks inserted between IDAT and
/// IEND, in order.
pub fn png_with_chunks(extra: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut png = PNG_SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &TEST_IHDR);
    write_chunk(&mut png, b"IDAT", &TEST_IDAT);
    for (chunk_type, data) in extra {
        write_chunk(&mut png, chunk_type, data);
    }
    write_chunk(&mut png, b"IEND", &[]);
    png
}

/// Flip the stored CRC of the first chunk with the given type, leaving the
/// rest of the buffer intact.
pub fn corrupt_crc(png: &mut [u8], chunk_type: &[u8; 4]) {
    let mut offset = 8;
    while offset + 12 <= png.len() {
        let length =
            u32::from_be_bytes(png[offset..offset + 4].try_into().unwrap()) as usize;
        if &png[offset + 4..offset + 8] == chunk_type {
            png[offset + 8 + length] ^= 0xFF;
            return;
        }
        offset += 12 + length;
    }
    panic!("no {:?} chunk in test fixture", chunk_type);
}

/// tEXt chunk body: `keyword NUL text`.
pub fn text_chunk_data(keyword: &str, text: &[u8]) -> Vec<u8> {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.extend_from_slice(text);
    data
}

/// zTXt chunk body: `keyword NUL method compressed-text`.
pub fn ztxt_chunk_data(keyword: &str, text: &[u8]) -> Vec<u8> {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.push(0); // compression method
    data.extend_from_slice(&deflate(text));
    data
}

/// iTXt chunk body with empty language tag and translated keyword.
pub fn itxt_chunk_data(keyword: &str, text: &[u8], compressed: bool) -> Vec<u8> {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.push(u8::from(compressed)); // compression flag
    data.push(0); // compression method
    data.push(0); // empty language tag
    data.push(0); // empty translated keyword
    if compressed {
        data.extend_from_slice(&deflate(text));
    } else {
        data.extend_from_slice(text);
    }
    data
}
