//! Digest oracle: SHA1, MD5, and CRC32 over query text.
//!
//! Output matches the knowledge API's two-line answer: the digest as a
//! decimal integer and as hex grouped in 4-character chunks.

use md5::Digest as _;

use crate::{OracleError, OracleResult};

/// Sentinel answer for an unsupported method. This is a soft failure by
/// contract — callers get the string back, not an error.
pub const UNDEFINED_METHOD: &str = "Hash method undefined";

/// Compute the digest for a `"METHOD text"` specification.
///
/// Supported methods: `SHA1` (160-bit), `MD5` (128-bit), `CRC32`
/// (32-bit checksum). Anything else answers [`UNDEFINED_METHOD`].
/// A supported method with no text to digest is malformed.
pub fn hash_digest(spec: &str) -> OracleResult<String> {
    let (method, text) = match spec.split_once(' ') {
        Some((method, text)) => (method, Some(text)),
        None => (spec, None),
    };

    let digest: Vec<u8> = match method {
        "SHA1" => {
            let text = require_text(spec, text)?;
            sha1::Sha1::digest(text.as_bytes()).to_vec()
        }
        "MD5" => {
            let text = require_text(spec, text)?;
            md5::Md5::digest(text.as_bytes()).to_vec()
        }
        "CRC32" => {
            let text = require_text(spec, text)?;
            crc32fast::hash(text.as_bytes()).to_be_bytes().to_vec()
        }
        _ => return Ok(UNDEFINED_METHOD.to_string()),
    };

    Ok(format!(
        "integer form | {}\nhexadecimal form | {}",
        decimal_form(&digest),
        hex_form(&digest)
    ))
}

fn require_text<'a>(spec: &str, text: Option<&'a str>) -> OracleResult<&'a str> {
    text.ok_or_else(|| OracleError::MalformedCommand(spec.to_string()))
}

/// Digest bytes as one big decimal integer (big-endian).
fn decimal_form(bytes: &[u8]) -> String {
    let mut num: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    if num.is_empty() {
        return "0".to_string();
    }

    // Repeated division of the base-256 number by 10
    let mut digits: Vec<char> = Vec::new();
    while !num.is_empty() {
        let mut rem: u32 = 0;
        let mut quotient: Vec<u8> = Vec::with_capacity(num.len());
        for &b in &num {
            let cur = rem * 256 + b as u32;
            let q = (cur / 10) as u8;
            rem = cur % 10;
            if !(quotient.is_empty() && q == 0) {
                quotient.push(q);
            }
        }
        digits.push((b'0' + rem as u8) as char);
        num = quotient;
    }
    digits.iter().rev().collect()
}

/// Lowercase hex, zero-padded to the digest width, grouped in 4-char
/// chunks separated by single spaces.
fn hex_form(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| chunk.iter().map(|&b| b as char).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
