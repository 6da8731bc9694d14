use std::collections::HashMap;

use super::{CacheError, CacheStore};

pub struct MemoryCache<T: Clone> {
    objects: HashMap<String, T>
}

impl<T: Clone> MemoryCache<T> {
    pub fn new() -> MemoryCache<T> {
        MemoryCache {
            objects: HashMap::new()
        }
    }
}

impl<T: Clone> Default for MemoryCache<T> {
    fn default() -> Self {
        MemoryCache::new()
    }
}

impl<T: Clone> CacheStore<T> for MemoryCache<T> {
    fn get(&self, key: &str) -> Result<T, CacheError> {
        self.objects.get(key).cloned().ok_or(CacheError::NoCacheEntry)
    }

    fn put(&mut self, key: String, object: T) -> Result<(), CacheError> {
        self.objects.insert(key, object);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> bool {
        self.objects.remove(key).is_some()
    }

    fn count(&self) -> usize {
        self.objects.len()
    }
}
