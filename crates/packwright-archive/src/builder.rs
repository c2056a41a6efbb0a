//! Incremental ZIP archive construction.
//!
//! Entries are written in the order they are added. Every entry carries the
//! same modification time taken from [`ArchiveOptions`], so identical inputs
//! produce identical bytes.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default compression level (6 = balanced speed/ratio).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Destination for generated files.
///
/// Implemented by [`ArchiveBuilder`]; tests substitute recording sinks.
pub trait ArchiveSink {
    /// Append one entry
    fn add(&mut self, path: &str, content: &[u8]) -> Result<()>;

    /// Close the sink and return the archive bytes
    fn finish(&mut self) -> Result<Vec<u8>>;
}

/// Settings applied to every entry of an archive
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Deflate level (1-9)
    pub compression_level: u32,

    /// Modification time stamped on every entry
    pub modified_at: Option<DateTime<Utc>>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            modified_at: None,
        }
    }
}

impl ArchiveOptions {
    /// Sets the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    /// Sets the entry modification time.
    pub fn with_modified_at(mut self, modified_at: DateTime<Utc>) -> Self {
        self.modified_at = Some(modified_at);
        self
    }

    fn file_options(&self, path: &str) -> SimpleFileOptions {
        let permissions = if path.ends_with(".sh") { 0o755 } else { 0o644 };
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(self.compression_level)))
            .last_modified_time(self.zip_time())
            .unix_permissions(permissions)
    }

    /// ZIP timestamps cover 1980-2107; anything outside falls back to the epoch
    fn zip_time(&self) -> zip::DateTime {
        let Some(at) = self.modified_at else {
            return zip::DateTime::default();
        };
        let converted = u16::try_from(at.year()).ok().and_then(|year| {
            zip::DateTime::from_date_and_time(
                year,
                at.month() as u8,
                at.day() as u8,
                at.hour() as u8,
                at.minute() as u8,
                at.second() as u8,
            )
            .ok()
        });
        converted.unwrap_or_default()
    }
}

/// Single-use in-memory ZIP builder
pub struct ArchiveBuilder {
    writer: Option<ZipWriter<Cursor<Vec<u8>>>>,
    options: ArchiveOptions,
    seen: HashSet<String>,
    entries: Vec<String>,
    uncompressed_size: u64,
}

impl ArchiveBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::with_options(ArchiveOptions::default())
    }

    /// Creates a builder with the given options.
    pub fn with_options(options: ArchiveOptions) -> Self {
        Self {
            writer: Some(ZipWriter::new(Cursor::new(Vec::new()))),
            options,
            seen: HashSet::new(),
            entries: Vec::new(),
            uncompressed_size: 0,
        }
    }

    /// Paths added so far, in order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Total size of added content before compression
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Whether `finish` has been called
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSink for ArchiveBuilder {
    fn add(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::BuilderClosed)?;
        validate_entry_path(path)?;
        if self.seen.contains(path) {
            return Err(Error::duplicate_path(path));
        }

        writer.start_file(path, self.options.file_options(path))?;
        writer.write_all(content)?;

        tracing::debug!("Added archive entry: {} ({} bytes)", path, content.len());
        self.seen.insert(path.to_string());
        self.entries.push(path.to_string());
        self.uncompressed_size += content.len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let writer = self.writer.take().ok_or(Error::BuilderClosed)?;
        let bytes = writer.finish()?.into_inner();
        tracing::debug!(
            "Finished archive: {} entries, {} bytes",
            self.entries.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn validate_entry_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(Error::invalid_path(path, "path must be relative with forward slashes"));
    }
    if path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return Err(Error::invalid_path(path, "path contains an empty or '..' segment"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_add_and_finish() {
        let mut builder = ArchiveBuilder::new();
        builder.add("frontend/nginx.conf", b"worker_processes 1;").unwrap();
        builder.add("LICENSE.txt", b"Licensed To: Acme").unwrap();
        let bytes = builder.finish().unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert_eq!(read_entry(&bytes, "LICENSE.txt"), "Licensed To: Acme");
    }

    #[test]
    fn test_entry_order_preserved() {
        let mut builder = ArchiveBuilder::new();
        for path in ["b.txt", "a.txt", "c/d.txt"] {
            builder.add(path, path.as_bytes()).unwrap();
        }
        assert_eq!(builder.entries(), ["b.txt", "a.txt", "c/d.txt"]);

        let bytes = builder.finish().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let ordered: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(ordered, vec!["b.txt", "a.txt", "c/d.txt"]);
    }

    #[test]
    fn test_duplicate_path() {
        let mut builder = ArchiveBuilder::new();
        builder.add("docs/INSTALL.md", b"one").unwrap();
        let err = builder.add("docs/INSTALL.md", b"two").unwrap_err();
        assert!(matches!(err, Error::DuplicatePath { ref path } if path == "docs/INSTALL.md"));
    }

    #[test]
    fn test_closed_after_finish() {
        let mut builder = ArchiveBuilder::new();
        builder.add("a.txt", b"a").unwrap();
        builder.finish().unwrap();

        assert!(builder.is_closed());
        assert!(matches!(builder.add("b.txt", b"b"), Err(Error::BuilderClosed)));
        assert!(matches!(builder.finish(), Err(Error::BuilderClosed)));
    }

    #[test]
    fn test_invalid_paths() {
        let mut builder = ArchiveBuilder::new();
        for path in ["", "/abs", "a/../b", "a\\b", "a//b"] {
            assert!(
                matches!(builder.add(path, b"x"), Err(Error::InvalidPath { .. })),
                "{} should be rejected",
                path
            );
        }
        assert!(builder.entries().is_empty());
    }

    #[test]
    fn test_identical_input_identical_bytes() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 15, 30).unwrap();
        let build = || {
            let mut builder =
                ArchiveBuilder::with_options(ArchiveOptions::default().with_modified_at(at));
            builder.add("x/one.txt", b"one").unwrap();
            builder.add("x/two.txt", b"two").unwrap();
            builder.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_modified_time_stamped() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 15, 30).unwrap();
        let mut builder =
            ArchiveBuilder::with_options(ArchiveOptions::default().with_modified_at(at));
        builder.add("a.txt", b"a").unwrap();
        let bytes = builder.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_index(0).unwrap();
        let modified = entry.last_modified().unwrap();
        assert_eq!(modified.year(), 2026);
        assert_eq!(modified.month(), 10);
        assert_eq!(modified.hour(), 9);
    }

    #[test]
    fn test_pre_1980_time_falls_back() {
        let at = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        let options = ArchiveOptions::default().with_modified_at(at);
        assert_eq!(options.zip_time(), zip::DateTime::default());
    }

    #[test]
    fn test_compression_level_clamped() {
        assert_eq!(ArchiveOptions::default().with_compression_level(0).compression_level, 1);
        assert_eq!(ArchiveOptions::default().with_compression_level(42).compression_level, 9);
    }

    #[test]
    fn test_uncompressed_size_tracked() {
        let mut builder = ArchiveBuilder::new();
        builder.add("a.txt", &[b'a'; 100]).unwrap();
        builder.add("b.txt", &[b'b'; 50]).unwrap();
        assert_eq!(builder.uncompressed_size(), 150);
    }
}
