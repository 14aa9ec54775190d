//! In-memory storage, used by tests and benchmarks.

use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::{Storage, StorageError, StorageInput, StorageLock, StorageOutput};

#[derive(Debug, Clone)]
pub struct MemoryStorageConfig {
    pub initial_capacity: usize,
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        MemoryStorageConfig {
            initial_capacity: 8,
        }
    }
}

type Blobs = Arc<Mutex<HashMap<String, Arc<[u8]>>>>;

/// Keeps blobs in a shared map.
///
/// A temporary output becomes visible under its name only once finished,
/// like a synced file on disk. Readers get a snapshot, so a later rename
/// over the same name never changes bytes already being read.
#[derive(Debug)]
pub struct MemoryStorage {
    blobs: Blobs,
    temp: Mutex<HashSet<String>>,
    locks: Arc<Mutex<HashSet<String>>>,
    next_temp: AtomicU64,
}

impl MemoryStorage {
    pub fn new(config: MemoryStorageConfig) -> Self {
        MemoryStorage {
            blobs: Arc::new(Mutex::new(HashMap::with_capacity(config.initial_capacity))),
            temp: Mutex::new(HashSet::new()),
            locks: Arc::new(Mutex::new(HashSet::new())),
            next_temp: AtomicU64::new(0),
        }
    }

    /// Store a blob directly, bypassing the temp-then-rename protocol.
    pub fn put(&self, name: &str, data: &[u8]) {
        self.blobs.lock().insert(name.to_string(), Arc::from(data));
    }

    pub fn file_count(&self) -> usize {
        self.blobs.lock().len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(MemoryStorageConfig::default())
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let data = self
            .blobs
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.blobs.lock().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.blobs.lock().remove(name);
        self.temp.lock().remove(name);
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let blobs = self.blobs.lock();
        let temp = self.temp.lock();
        let mut names: Vec<String> = blobs
            .keys()
            .filter(|name| !temp.contains(*name))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }

    fn rename_file(&self, from: &str, to: &str) -> Result<()> {
        let mut blobs = self.blobs.lock();
        let data = blobs
            .remove(from)
            .ok_or_else(|| StorageError::NotFound(from.to_string()))?;
        blobs.insert(to.to_string(), data);
        self.temp.lock().remove(from);
        Ok(())
    }

    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)> {
        let n = self.next_temp.fetch_add(1, Ordering::Relaxed);
        let name = format!(".{prefix}.{n}.tmp");
        self.temp.lock().insert(name.clone());

        let output = MemoryOutput {
            name: name.clone(),
            buffer: Vec::new(),
            blobs: Arc::clone(&self.blobs),
            finished: false,
        };
        Ok((name, Box::new(output)))
    }

    fn acquire_lock(&self, name: &str) -> Result<Box<dyn StorageLock>> {
        if !self.locks.lock().insert(name.to_string()) {
            return Err(StorageError::Locked {
                name: name.to_string(),
            }
            .into());
        }

        Ok(Box::new(MemoryLock {
            name: name.to_string(),
            locks: Some(Arc::clone(&self.locks)),
        }))
    }
}

#[derive(Debug)]
struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    blobs: Blobs,
    finished: bool,
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn finish(&mut self) -> Result<()> {
        if !self.finished {
            let data: Arc<[u8]> = Arc::from(std::mem::take(&mut self.buffer));
            self.blobs.lock().insert(self.name.clone(), data);
            self.finished = true;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct MemoryLock {
    name: String,
    locks: Option<Arc<Mutex<HashSet<String>>>>,
}

impl StorageLock for MemoryLock {
    fn name(&self) -> &str {
        &self.name
    }

    fn release(&mut self) -> Result<()> {
        if let Some(locks) = self.locks.take() {
            locks.lock().remove(&self.name);
        }
        Ok(())
    }
}

impl Drop for MemoryLock {
    fn drop(&mut self) {
        // releasing an in-memory lock cannot fail
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_temp_output_publishes_on_finish() {
        let storage = MemoryStorage::default();

        let (temp, mut output) = storage.create_temp_output("emotion").unwrap();
        output.write_all(b"{}").unwrap();
        assert!(!storage.file_exists(&temp));

        output.finish().unwrap();
        assert!(storage.file_exists(&temp));
        assert!(storage.list_files().unwrap().is_empty());

        storage.rename_file(&temp, "emotion.model.json").unwrap();
        assert_eq!(storage.list_files().unwrap(), ["emotion.model.json".to_string()]);
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let storage = MemoryStorage::default();
        storage.put("slot", b"first");

        let mut input = storage.open_input("slot").unwrap();
        storage.put("slot", b"second");

        let mut content = String::new();
        input.read_to_string(&mut content).unwrap();
        assert_eq!(content, "first");
    }

    #[test]
    fn test_rename_and_delete() {
        let storage = MemoryStorage::default();
        storage.put("x.tmp", b"data");

        storage.rename_file("x.tmp", "x").unwrap();
        storage.delete_file("x").unwrap();
        assert_eq!(storage.file_count(), 0);
        assert!(storage.rename_file("x", "y").is_err());
    }

    #[test]
    fn test_lock_exclusive() {
        let storage = MemoryStorage::default();
        let mut lock = storage.acquire_lock("emotion.train").unwrap();
        assert!(storage.acquire_lock("emotion.train").is_err());

        lock.release().unwrap();
        assert!(storage.acquire_lock("emotion.train").is_ok());
    }
}
