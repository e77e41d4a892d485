use std::io::{self, ErrorKind, Read, Write};
use std::sync::Arc;

use crate::codec::{Decompressor, DecompressorFactory};
use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::structures::LocalHeader;

/// Read-only view of `size` bytes of the source starting at `offset`.
///
/// Reads are clipped to what is left of the declared extent; a source that
/// ends before the extent is exhausted is reported as
/// [`ErrorKind::UnexpectedEof`].
pub struct EntryReader<R: ?Sized> {
    reader: Arc<R>,
    offset: u64,
    size: u64,
    position: u64,
}

impl<R: ReadAt + ?Sized> EntryReader<R> {
    pub fn new(reader: Arc<R>, offset: u64, size: u64) -> Self {
        Self {
            reader,
            offset,
            size,
            position: 0,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn remaining(&self) -> u64 {
        self.size - self.position
    }
}

impl<R: ?Sized> Clone for EntryReader<R> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            offset: self.offset,
            size: self.size,
            position: self.position,
        }
    }
}

impl<R: ReadAt + ?Sized> Read for EntryReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if buf.is_empty() || remaining == 0 {
            return Ok(0);
        }
        let len = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        let n = self
            .reader
            .read_at(self.offset + self.position, &mut buf[..len])?;
        if n == 0 {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "entry payload truncated: {} of {} bytes available",
                    self.position, self.size
                ),
            ));
        }
        self.position += n as u64;
        Ok(n)
    }
}

/// One local file header and the means to read its content.
pub struct Entry<R: ?Sized> {
    pub header: LocalHeader,
    payload: EntryReader<R>,
    decompressor: Option<DecompressorFactory>,
}

impl<R: ReadAt + ?Sized + 'static> Entry<R> {
    pub(crate) fn new(
        header: LocalHeader,
        payload: EntryReader<R>,
        decompressor: Option<DecompressorFactory>,
    ) -> Self {
        Self {
            header,
            payload,
            decompressor,
        }
    }

    /// Entries without payload are treated as directories.
    pub fn is_directory(&self) -> bool {
        self.header.compressed_size == 0
    }

    pub fn is_file(&self) -> bool {
        self.header.compressed_size > 0
    }

    pub fn name(&self) -> &str {
        &self.header.file_name
    }

    /// Whether a decompressor is registered for this entry's method.
    pub fn is_supported(&self) -> bool {
        self.decompressor.is_some()
    }

    /// The still-compressed payload.
    pub fn compressed_reader(&self) -> EntryReader<R> {
        let mut payload = self.payload.clone();
        payload.position = 0;
        payload
    }

    /// Open a decompressing reader over the payload.
    ///
    /// The caller should [`close`](Decompressor::close) it when done;
    /// dropping it has the same effect.
    pub fn open(&self) -> Result<Box<dyn Decompressor>> {
        let factory = self
            .decompressor
            .as_ref()
            .ok_or(Error::UnsupportedMethod(self.header.compression_method))?;
        Ok(factory(Box::new(self.compressed_reader())))
    }

    /// Decompress the whole entry into `sink`, returning the number of
    /// bytes written.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<u64> {
        let mut decompressor = self.open()?;
        let copied = io::copy(&mut decompressor, sink);
        let closed = decompressor.close();
        let written = copied.map_err(Error::from_io)?;
        closed?;
        Ok(written)
    }
}

impl<R: ?Sized> std::fmt::Debug for Entry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("header", &self.header)
            .field("supported", &self.decompressor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_reader_stops_at_declared_size() {
        let source = Arc::new(b"....payload....".to_vec());
        let mut reader = EntryReader::new(source, 4, 7);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.read(&mut [0u8; 4]).unwrap(), 0);
    }

    #[test]
    fn bounded_reader_advances_between_reads() {
        let source = Arc::new(b"abcdef".to_vec());
        let mut reader = EntryReader::new(source, 1, 4);
        let mut buf = [0u8; 3];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"bcd");
        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'e');
    }

    #[test]
    fn bounded_reader_reports_short_source() {
        let source = Arc::new(b"abc".to_vec());
        let mut reader = EntryReader::new(source, 1, 10);
        let err = reader.read_to_end(&mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
