use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::config::{CacheBackend, CacheConfig};
use crate::response::Response;

pub mod file_cache;
pub mod memory_cache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("no cache entry")]
    NoCacheEntry,
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache entry {0:?} is corrupted: {1}")]
    Corrupted(PathBuf, String),
    #[error("cache lock poisoned")]
    Poisoned,
}

pub trait CacheStore<T: Clone> {
    fn get(&self, key: &str) -> Result<T, CacheError>;
    fn put(&mut self, key: String, object: T) -> Result<(), CacheError>;
    fn delete(&mut self, key: &str) -> bool;
    fn count(&self) -> usize;
}

pub type SharedCache = Arc<Mutex<dyn CacheStore<Response> + Send + Sync>>;

pub fn from_config(config: &CacheConfig) -> Result<SharedCache, CacheError> {
    let cache: SharedCache = match config.backend {
        CacheBackend::Memory => Arc::new(Mutex::new(memory_cache::MemoryCache::<Response>::new())),
        CacheBackend::File => Arc::new(Mutex::new(file_cache::FileCache::new(&config.directory)?)),
    };
    Ok(cache)
}

/// Reads `key`, treating every failure as a miss.
pub fn lookup(cache: &SharedCache, key: &str) -> Option<Response> {
    let result = match cache.lock() {
        Ok(cache) => cache.get(key),
        Err(_) => Err(CacheError::Poisoned),
    };
    match result {
        Ok(response) => Some(response),
        Err(CacheError::NoCacheEntry) => None,
        Err(e) => {
            log::warn!("Cache read for {} failed, treating as miss: {}", key, e);
            None
        }
    }
}

/// Writes `response` under `key`. A failed write is logged, never raised.
pub fn store(cache: &SharedCache, key: &str, response: &Response) {
    let result = match cache.lock() {
        Ok(mut cache) => cache.put(key.to_string(), response.clone()),
        Err(_) => Err(CacheError::Poisoned),
    };
    if let Err(e) = result {
        log::warn!("Cache write for {} failed: {}", key, e);
    }
}
