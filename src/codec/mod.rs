//! Decompressors keyed by ZIP compression method.
//!
//! A [`Registry`] maps the method code found in a local file header to a
//! factory that wraps the entry's raw payload in a [`Decompressor`]. The
//! registry is built once and then only read, so it is shared between
//! archives behind an [`Arc`].

mod inflate;
mod store;

pub use inflate::{InflatePool, PooledInflate};
pub use store::Stored;

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};
use crate::zip::CompressionMethod;

/// A decompressing byte source that must be closed when the caller is done.
pub trait Decompressor: Read + Send {
    /// Release the resources held by the decompressor.
    ///
    /// Closing twice is not an error.
    fn close(&mut self) -> Result<()>;
}

/// Wraps a raw payload source in a decompressor.
pub type DecompressorFactory =
    Arc<dyn Fn(Box<dyn Read + Send>) -> Box<dyn Decompressor> + Send + Sync>;

/// Compression method code to decompressor factory.
pub struct Registry {
    factories: HashMap<u16, DecompressorFactory>,
    inflate_pool: Arc<InflatePool>,
}

impl Registry {
    /// A registry with no methods registered.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            inflate_pool: Arc::new(InflatePool::new()),
        }
    }

    /// The process-wide registry with the default methods.
    pub fn shared() -> Arc<Registry> {
        static SHARED: OnceLock<Arc<Registry>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Registry::default())).clone()
    }

    /// Register `factory` for `method`, replacing any previous one.
    pub fn register(&mut self, method: u16, factory: DecompressorFactory) -> &mut Self {
        self.factories.insert(method, factory);
        self
    }

    /// Look up the factory for `method`.
    ///
    /// Unknown methods are an error; they are never treated as stored.
    pub fn resolve(&self, method: u16) -> Result<DecompressorFactory> {
        self.factories
            .get(&method)
            .cloned()
            .ok_or(Error::UnsupportedMethod(method))
    }

    pub fn supports(&self, method: u16) -> bool {
        self.factories.contains_key(&method)
    }

    /// The pool backing the deflate factory of this registry.
    pub fn inflate_pool(&self) -> &Arc<InflatePool> {
        &self.inflate_pool
    }
}

fn store(source: Box<dyn Read + Send>) -> Box<dyn Decompressor> {
    Box::new(Stored::new(source))
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        let pool = registry.inflate_pool.clone();
        let deflate: DecompressorFactory =
            Arc::new(move |source: Box<dyn Read + Send>| -> Box<dyn Decompressor> {
                Box::new(PooledInflate::new(pool.clone(), source))
            });
        registry
            .register(CompressionMethod::Stored.as_u16(), Arc::new(store))
            .register(CompressionMethod::Deflate.as_u16(), deflate);
        registry
    }
}
