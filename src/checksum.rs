//! File checksums
//!
//! CRC32 of a file's bytes as fixed-width lowercase hex.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{HistoryError, Result};

/// Read buffer size for hashing
const BUFFER_SIZE: usize = 10 * 1024;

/// Default hex width of a CRC32
pub const CRC32_HEX_WIDTH: usize = 8;

/// CRC32 of the file at `path` as 8 lowercase hex digits
pub fn crc32_hex(path: &Path) -> Result<String> {
    crc32_hex_width(path, CRC32_HEX_WIDTH)
}

/// CRC32 of the file at `path`, zero padded to at least `width` digits
pub fn crc32_hex_width(path: &Path, width: usize) -> Result<String> {
    let crc = crc32(path).map_err(|source| HistoryError::Checksum {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(format!("{:0width$x}", crc, width = width))
}

fn crc32(path: &Path) -> std::io::Result<u32> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize())
}
