//! Checksums and size statistics for finished archives

use sha2::{Digest, Sha256};

/// Calculates the SHA256 checksum of a byte slice as lowercase hex
pub fn calculate_checksum(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    format!("{:x}", hash)
}

/// Size statistics of a finished archive
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveStats {
    /// Total size of all entries before compression
    pub original_size: u64,

    /// Size of the archive bytes
    pub compressed_size: u64,

    /// Compression ratio (compressed / original)
    pub compression_ratio: f64,

    /// SHA256 checksum of the archive bytes
    pub checksum: String,
}

impl ArchiveStats {
    /// Compute statistics for finished archive bytes
    pub fn new(original_size: u64, archive: &[u8]) -> Self {
        let compressed_size = archive.len() as u64;
        let compression_ratio = if original_size > 0 {
            compressed_size as f64 / original_size as f64
        } else {
            0.0
        };

        Self {
            original_size,
            compressed_size,
            compression_ratio,
            checksum: calculate_checksum(archive),
        }
    }

    /// Percentage saved by compression; zero when the archive grew
    pub fn compression_percentage(&self) -> u8 {
        ((1.0 - self.compression_ratio).max(0.0) * 100.0) as u8
    }
}
