//! Decoding of uploaded bytes from Shift_JIS
//!
//! Mailing-list exports are always produced in Windows-31J. encoding_rs
//! implements the WHATWG Shift_JIS decoder, which is that same code page.
//! There is no detection and no fallback encoding.

use crate::error::{Error, Result};
use encoding_rs::{DecoderResult, SHIFT_JIS};
use std::fs;
use std::path::Path;

/// Decode a byte buffer as Shift_JIS.
///
/// Unlike `Encoding::decode`, malformed sequences are not replaced with
/// U+FFFD: the first one aborts decoding with [`Error::Decode`].
pub fn decode(bytes: &[u8]) -> Result<String> {
    let mut decoder = SHIFT_JIS.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .ok_or(Error::Decode { offset: 0 })?;
    let mut text = String::with_capacity(capacity);

    let (result, read) = decoder.decode_to_string_without_replacement(bytes, &mut text, true);
    match result {
        DecoderResult::InputEmpty => Ok(text),
        DecoderResult::Malformed(bad, after) => {
            let offset = read - bad as usize - after as usize;
            tracing::warn!(offset, "input is not valid Shift_JIS");
            Err(Error::Decode { offset })
        }
        // capacity was sized for the worst case
        DecoderResult::OutputFull => Err(Error::Decode { offset: read }),
    }
}

/// Read a file and decode it as Shift_JIS
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = read_bytes(path)?;
    decode(&bytes)
}

/// Read the raw bytes of a file
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}
