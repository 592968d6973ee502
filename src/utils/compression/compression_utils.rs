use std::io::Read;
use flate2::read::{GzDecoder, ZlibDecoder};

use crate::m3u_generator_error::str_to_io_error;

pub const ENCODING_GZIP: &str = "gzip";
pub const ENCODING_DEFLATE: &str = "deflate";

pub const fn is_gzip(bytes: &[u8]) -> bool {
    // Gzip files start with the bytes 0x1F 0x8B
    bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B
}

pub const fn is_deflate(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x78 && (bytes[1] == 0x01 || bytes[1] == 0x9C || bytes[1] == 0xDA)
}

/// Sniffs the payload before trusting the `Content-Encoding` header, some CDNs
/// serve gzipped json without announcing it.
pub fn detect_encoding(header_value: Option<&str>, bytes: &[u8]) -> Option<String> {
    if is_gzip(bytes) {
        Some(ENCODING_GZIP.to_string())
    } else if is_deflate(bytes) {
        Some(ENCODING_DEFLATE.to_string())
    } else {
        header_value.map(|value| value.trim().to_lowercase())
    }
}

pub fn decode_content(encoding: Option<&str>, bytes: &[u8]) -> std::io::Result<String> {
    let mut decode_buffer = String::new();
    match encoding {
        Some(ENCODING_GZIP) => {
            let mut decoder = GzDecoder::new(bytes);
            if let Err(err) = decoder.read_to_string(&mut decode_buffer) {
                return Err(str_to_io_error(&format!("failed to decode gzip content {err}")));
            }
        }
        Some(ENCODING_DEFLATE) => {
            let mut decoder = ZlibDecoder::new(bytes);
            if let Err(err) = decoder.read_to_string(&mut decode_buffer) {
                return Err(str_to_io_error(&format!("failed to decode zlib content {err}")));
            }
        }
        _ => {
            decode_buffer = match String::from_utf8(bytes.to_vec()) {
                Ok(text) => text,
                Err(err) => return Err(str_to_io_error(&format!("content is not valid utf-8 {err}"))),
            };
        }
    }
    Ok(decode_buffer)
}
