//! Best-effort text reading.
//!
//! Files are decoded as UTF-8 with undecodable byte sequences dropped, so a
//! stray Latin-1 byte never costs the whole file.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::FilecollectError;
use crate::Result;

/// Read a file as text, dropping invalid UTF-8 sequences.
///
/// Only regular files (after following symlinks) are read; anything else is
/// reported as a [`FilecollectError::FileRead`].
pub fn read_text_lossy(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let read_err = |source: io::Error| FilecollectError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(read_err)?;
    if !metadata.is_file() {
        return Err(read_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let bytes = fs::read(path).map_err(read_err)?;
    Ok(decode_lossy(bytes))
}

/// Decode bytes as UTF-8, dropping every invalid sequence.
pub fn decode_lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| {
        let bytes = e.into_bytes();
        let mut text = String::with_capacity(bytes.len());
        for chunk in bytes.utf8_chunks() {
            text.push_str(chunk.valid());
        }
        text
    })
}
