use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::read::DeflateDecoder;
use parking_lot::Mutex;

use super::Decompressor;
use crate::error::{Error, Result};

type Source = Box<dyn Read + Send>;

/// A raw deflate decoder; its engine state and input buffer survive a reset.
type Inflater = DeflateDecoder<Source>;

/// Idle inflate decoders waiting to be reused.
///
/// Safe to share between threads; each acquired decoder is owned by exactly
/// one [`PooledInflate`] until it is closed.
pub struct InflatePool {
    idle: Mutex<Vec<Inflater>>,
    created: AtomicUsize,
}

impl InflatePool {
    pub fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            created: AtomicUsize::new(0),
        }
    }

    fn acquire(&self, source: Source) -> Inflater {
        let idle = self.idle.lock().pop();
        match idle {
            Some(mut inflater) => {
                inflater.reset(source);
                inflater
            }
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                DeflateDecoder::new(source)
            }
        }
    }

    fn release(&self, mut inflater: Inflater) {
        // Drop the entry's source now rather than on next acquire.
        inflater.reset(Box::new(io::empty()));
        self.idle.lock().push(inflater);
    }

    /// Number of decoders currently parked in the pool.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Number of decoders constructed over the pool's lifetime.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

impl Default for InflatePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Method 8: a deflate stream decoded by a decoder borrowed from a pool.
///
/// Reads and closes are serialized by an internal lock. Once closed, the
/// decoder is back in the pool and further reads fail with
/// [`Error::ReadAfterClose`]. Dropping the reader closes it.
pub struct PooledInflate {
    pool: Arc<InflatePool>,
    inflater: Mutex<Option<Inflater>>,
}

impl PooledInflate {
    pub fn new(pool: Arc<InflatePool>, source: Source) -> Self {
        let inflater = pool.acquire(source);
        Self {
            pool,
            inflater: Mutex::new(Some(inflater)),
        }
    }

    /// Read decompressed bytes through a shared reference.
    pub fn read_shared(&self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inflater.lock().as_mut() {
            Some(inflater) => inflater.read(buf),
            None => Err(Error::ReadAfterClose.into_io()),
        }
    }

    /// Return the decoder to the pool. Waits for an in-flight read.
    pub fn close_shared(&self) {
        let inflater = self.inflater.lock().take();
        if let Some(inflater) = inflater {
            self.pool.release(inflater);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inflater.lock().is_none()
    }
}

impl Read for PooledInflate {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_shared(buf)
    }
}

impl Decompressor for PooledInflate {
    fn close(&mut self) -> Result<()> {
        self.close_shared();
        Ok(())
    }
}

impl Drop for PooledInflate {
    fn drop(&mut self) {
        self.close_shared();
    }
}
