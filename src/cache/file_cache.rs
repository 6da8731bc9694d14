use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::{CacheError, CacheStore};
use crate::response::Response;

/// One file per key inside `catalog`, holding the bincode encoded response.
pub struct FileCache {
    catalog: PathBuf,
}

impl FileCache {
    pub fn new(catalog: &Path) -> Result<FileCache, CacheError> {
        fs::create_dir_all(catalog)?;
        info!("Using cache directory {:#?}", catalog);
        Ok(FileCache {
            catalog: catalog.to_path_buf()
        })
    }

    pub fn generate_file_name(key: &str) -> String {
        format!("{:x}", md5::compute(key))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.catalog.join(FileCache::generate_file_name(key))
    }
}

impl CacheStore<Response> for FileCache {
    fn get(&self, key: &str) -> Result<Response, CacheError> {
        let path = self.entry_path(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(CacheError::NoCacheEntry),
            Err(e) => return Err(e.into()),
        };
        bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| CacheError::Corrupted(path, e.to_string()))
    }

    fn put(&mut self, key: String, object: Response) -> Result<(), CacheError> {
        let path = self.entry_path(&key);
        let mut writer = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(&mut writer, &object)
            .map_err(|e| CacheError::Corrupted(path, e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> bool {
        fs::remove_file(self.entry_path(key)).is_ok()
    }

    fn count(&self) -> usize {
        match fs::read_dir(&self.catalog) {
            Ok(dir) => dir.count(),
            Err(_) => 0,
        }
    }
}
