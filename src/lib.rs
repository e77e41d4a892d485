//! # scanzip
//!
//! A ZIP extractor that locates entries by scanning for local file header
//! signatures instead of trusting the central directory.
//!
//! Each entry's header is parsed where it is found, its compressed payload
//! is exposed as a bounded range of the source, and content is decompressed
//! on demand through a [`Registry`] of method-keyed decompressors. Truncated
//! archives, archives with junk between entries and archives whose central
//! directory is missing can still be read up to the last intact entry.
//!
//! ## Features
//!
//! - Read archives from the local filesystem, memory or HTTP/HTTPS URLs
//!   (using Range requests)
//! - STORED and DEFLATE compression methods, with pooled inflate engines
//! - Pluggable decompressors for further method codes
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use scanzip::{Archive, LocalFileReader};
//!
//! fn main() -> scanzip::Result<()> {
//!     let reader = Arc::new(LocalFileReader::new(Path::new("archive.zip"))?);
//!     let mut archive = Archive::new(reader);
//!
//!     while let Some(entry) = archive.next_entry()? {
//!         if entry.is_file() {
//!             let mut content = Vec::new();
//!             entry.write_to(&mut content)?;
//!             println!("{}: {} bytes", entry.header.file_name, content.len());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod codec;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use codec::{Decompressor, DecompressorFactory, InflatePool, Registry};
pub use error::{Error, Result};
pub use io::{HttpRangeReader, LocalFileReader, ReadAt};
pub use zip::{Archive, Entry, LocalHeader};
