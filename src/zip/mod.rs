//! ZIP archive scanning and extraction.
//!
//! This module reads ZIP archives front to back by their local file
//! headers. The central directory, the end-of-central-directory record and
//! ZIP64 structures are never consulted, which makes it possible to pull
//! entries out of archives whose tail is missing or damaged.
//!
//! ## Architecture
//!
//! - [`structures`]: local file header layout and compression methods
//! - [`scanner`]: signature scan and header parsing ([`Archive`])
//! - [`entry`]: scanned entries and their bounded payload readers
//! - [`extractor`]: writing entries to the filesystem
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No ZIP64 sizes
//! - Entries written with a trailing data descriptor declare no size in
//!   their local header and are therefore reported as directories
//! - Only methods present in the [`Registry`](crate::codec::Registry);
//!   STORED and DEFLATE by default

pub mod entry;
pub mod extractor;
pub mod scanner;
pub mod structures;

pub use entry::{Entry, EntryReader};
pub use extractor::{ExtractOptions, Extracted, Extractor, Overwrite, SkipReason};
pub use scanner::{Archive, SCAN_CHUNK_SIZE};
pub use structures::*;
