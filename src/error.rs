use std::io;

use thiserror::Error;

/// Errors produced while scanning an archive or decompressing an entry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid local file header signature at offset {offset}")]
    InvalidSignature { offset: u64 },

    #[error("unsupported compression method: {0}")]
    UnsupportedMethod(u16),

    #[error("read after close")]
    ReadAfterClose,

    #[error("payload of {name:?} ends at {end}, past the end of the archive ({size} bytes)")]
    PayloadOutOfBounds { name: String, end: u64, size: u64 },

    #[error("refusing to extract {0:?} outside the destination directory")]
    UnsafePath(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Recover a domain error that had to travel through [`std::io::Read`].
    ///
    /// Decompressors implement `Read`, so their failures arrive as
    /// `io::Error`. If such an error wraps one of ours, it is unwrapped,
    /// otherwise it is kept as [`Error::Io`].
    pub fn from_io(error: io::Error) -> Self {
        match error.downcast::<Error>() {
            Ok(inner) => inner,
            Err(error) => Error::Io(error),
        }
    }

    pub(crate) fn into_io(self) -> io::Error {
        match self {
            Error::Io(e) => e,
            other => io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
