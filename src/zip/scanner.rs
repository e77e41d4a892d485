//! Signature-scanning archive reader.
//!
//! Entries are found by searching the source for local file header
//! signatures instead of reading the central directory. Each call to
//! [`Archive::next_entry`] runs two phases:
//!
//! 1. locate: read fixed-size chunks from the cursor until `PK\x03\x04`
//!    turns up, skipping whatever bytes come before it;
//! 2. parse: decode the header at the cursor, frame the payload that
//!    follows it and move the cursor past that payload.
//!
//! Consecutive chunks overlap by three bytes, so a signature split across a
//! chunk boundary is still found. Because only declared sizes are used to
//! skip payloads, padding or garbage between entries is tolerated.

use std::sync::Arc;

use crate::codec::Registry;
use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::entry::{Entry, EntryReader};
use super::structures::*;

/// Bytes read per step while searching for the next signature.
pub const SCAN_CHUNK_SIZE: usize = 1024;

/// A sequential scanner over the local file headers of a ZIP archive.
///
/// The cursor is the only mutable state, so one archive serves one consumer;
/// scan the same source concurrently through separate instances.
pub struct Archive<R: ReadAt + ?Sized> {
    reader: Arc<R>,
    size: u64,
    offset: u64,
    registry: Arc<Registry>,
    fused: bool,
}

impl<R: ReadAt + ?Sized + 'static> Archive<R> {
    /// Scan the whole of `reader` using the shared registry.
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self::open(reader, size)
    }

    /// Scan the first `size` bytes of `reader` using the shared registry.
    pub fn open(reader: Arc<R>, size: u64) -> Self {
        Self::with_registry(reader, size, Registry::shared())
    }

    pub fn with_registry(reader: Arc<R>, size: u64, registry: Arc<Registry>) -> Self {
        Self {
            reader,
            size,
            offset: 0,
            registry,
            fused: false,
        }
    }

    /// Current cursor position.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Return the next entry, or `None` once no further signature exists.
    ///
    /// An entry whose compression method is not registered is still
    /// returned; reading its content fails with
    /// [`Error::UnsupportedMethod`]. After an error the cursor has moved
    /// beyond the offending header, so the scan may be resumed.
    pub fn next_entry(&mut self) -> Result<Option<Entry<R>>> {
        if !self.advance_to_next_signature()? {
            return Ok(None);
        }
        let header = self.read_header()?;

        let end = header.data_end();
        if end > self.size {
            self.offset = self.size;
            return Err(Error::PayloadOutOfBounds {
                name: header.file_name,
                end,
                size: self.size,
            });
        }
        self.offset = end;

        let payload = EntryReader::new(
            self.reader.clone(),
            header.data_offset,
            header.compressed_size as u64,
        );
        let decompressor = self.registry.resolve(header.compression_method).ok();
        Ok(Some(Entry::new(header, payload, decompressor)))
    }

    /// Move the cursor to the next signature at or after it.
    ///
    /// Returns `false` and leaves the cursor at the end of the source when
    /// there is none.
    fn advance_to_next_signature(&mut self) -> Result<bool> {
        let mut buf = [0u8; SCAN_CHUNK_SIZE];
        let mut offset = self.offset;

        while offset < self.size {
            let want = (self.size - offset).min(SCAN_CHUNK_SIZE as u64) as usize;
            let n = self.reader.read_at(offset, &mut buf[..want])?;
            if n == 0 {
                break;
            }

            if let Some(i) = find_signature(&buf[..n]) {
                self.offset = offset + i as u64;
                return Ok(true);
            }

            // Keep the last three bytes for the next chunk.
            let step = n.saturating_sub(LFH_SIGNATURE.len() - 1).max(1);
            if offset + n as u64 >= self.size {
                break;
            }
            offset += step as u64;
        }

        self.offset = self.size;
        Ok(false)
    }

    /// Parse the header at the cursor. Consumes the signature first, so a
    /// failure here never stalls the scan on the same offset.
    fn read_header(&mut self) -> Result<LocalHeader> {
        let offset = self.offset;

        let mut signature = [0u8; 4];
        self.reader.read_exact_at(offset, &mut signature)?;
        self.offset = offset + LFH_SIGNATURE.len() as u64;
        if &signature != LFH_SIGNATURE {
            return Err(Error::InvalidSignature { offset });
        }

        let mut fixed = [0u8; LFH_FIXED_SIZE];
        self.reader.read_exact_at(self.offset, &mut fixed)?;
        let fixed = FixedHeader::from_bytes(&fixed)?;

        let name_offset = offset + LFH_SIZE as u64;
        let mut file_name = vec![0u8; fixed.file_name_length as usize];
        self.reader.read_exact_at(name_offset, &mut file_name)?;

        let extra_offset = name_offset + file_name.len() as u64;
        let mut extra_field = vec![0u8; fixed.extra_field_length as usize];
        self.reader.read_exact_at(extra_offset, &mut extra_field)?;

        // Use lossy conversion to handle non-UTF8 filenames gracefully
        let file_name = String::from_utf8_lossy(&file_name).into_owned();

        Ok(LocalHeader::new(fixed, file_name, extra_field, offset))
    }
}

fn find_signature(chunk: &[u8]) -> Option<usize> {
    chunk
        .windows(LFH_SIGNATURE.len())
        .position(|window| window == LFH_SIGNATURE)
}

/// Yields entries until the end of the archive. Stops after an I/O error
/// from the source; other errors are yielded and the scan continues.
impl<R: ReadAt + ?Sized + 'static> Iterator for Archive<R> {
    type Item = Result<Entry<R>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        match self.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.fused = true;
                None
            }
            Err(e) => {
                if matches!(e, Error::Io(_)) {
                    self.fused = true;
                }
                Some(Err(e))
            }
        }
    }
}
