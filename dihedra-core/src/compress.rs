//! Decompression of gzipped coordinate files with magic-byte detection.

use std::io::Read;

use crate::{DihedraError, Result};

/// Supported compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Gzip,
}

/// Decompress gzip data.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| DihedraError::Compression(e.to_string()))?;
    Ok(decompressed)
}

/// Detect the compression algorithm from the magic bytes of `data`.
///
/// Returns `None` if the data does not match a known format.
pub fn detect_algorithm(data: &[u8]) -> Option<Algorithm> {
    if data.len() >= 2 && data[..2] == [0x1F, 0x8B] {
        Some(Algorithm::Gzip)
    } else {
        None
    }
}

/// Return `data` decompressed if it carries a known compression header,
/// otherwise return it unchanged.
pub fn maybe_decompress(data: Vec<u8>) -> Result<Vec<u8>> {
    match detect_algorithm(&data) {
        Some(Algorithm::Gzip) => gzip_decompress(&data),
        None => Ok(data),
    }
}

/// Read a text file, transparently decompressing `.gz` content.
pub fn read_text(path: impl AsRef<std::path::Path>) -> Result<String> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| {
        DihedraError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let bytes = maybe_decompress(raw)?;
    String::from_utf8(bytes)
        .map_err(|e| DihedraError::Parse(format!("{}: not UTF-8: {}", path.display(), e)))
}
