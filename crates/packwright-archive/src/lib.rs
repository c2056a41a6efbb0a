//! # packwright-archive
//!
//! In-memory ZIP construction for Packwright packages. The builder accepts
//! `(path, content)` pairs one at a time, rejects duplicate paths and is
//! closed once the archive bytes have been taken.

pub mod builder;
pub mod checksum;
pub mod error;

pub use builder::{ArchiveBuilder, ArchiveOptions, ArchiveSink, DEFAULT_COMPRESSION_LEVEL};
pub use checksum::{calculate_checksum, ArchiveStats};
pub use error::{Error, Result};
