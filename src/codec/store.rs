use std::io::{self, Read};

use super::Decompressor;
use crate::error::Result;

/// Method 0: the payload is the content.
pub struct Stored<S> {
    source: S,
}

impl<S: Read + Send> Stored<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Read + Send> Read for Stored<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.source.read(buf)
    }
}

impl<S: Read + Send> Decompressor for Stored<S> {
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
