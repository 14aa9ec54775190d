//! Directory-backed storage.
//!
//! Temporary blobs are hidden files (`.{prefix}.{pid}.{n}.tmp`) created with
//! `create_new`, so concurrent writers never share one. A lock is a
//! `{name}.lock` file holding the owner's process id. A lock whose owner
//! is gone, or one older than [`FileStorageConfig::stale_lock_after`], is
//! removed and taken over.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::Result;
use crate::storage::{Storage, StorageError, StorageInput, StorageLock, StorageOutput};

const TEMP_SUFFIX: &str = ".tmp";
const LOCK_SUFFIX: &str = ".lock";

/// Configuration for [`FileStorage`].
#[derive(Debug, Clone)]
pub struct FileStorageConfig {
    /// Directory holding the blobs. Created when missing.
    pub path: PathBuf,

    /// Capacity of the read and write buffers.
    pub buffer_size: usize,

    /// Age after which a lock counts as abandoned even if its owner cannot
    /// be shown to be dead. `None` relies on the owner check alone.
    pub stale_lock_after: Option<Duration>,
}

impl FileStorageConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStorageConfig {
            path: path.as_ref().to_path_buf(),
            buffer_size: 64 * 1024,
            stale_lock_after: None,
        }
    }

    pub fn with_stale_lock_after(mut self, age: Duration) -> Self {
        self.stale_lock_after = Some(age);
        self
    }
}

/// Stores each blob as a file in one directory.
#[derive(Debug)]
pub struct FileStorage {
    config: FileStorageConfig,
    next_temp: AtomicU64,
}

impl FileStorage {
    pub fn new(config: FileStorageConfig) -> Result<Self> {
        let root = config.path.display().to_string();
        fs::create_dir_all(&config.path).map_err(StorageError::io("create directory", &root))?;
        if !config.path.is_dir() {
            return Err(StorageError::io("use directory", root)(io::Error::other(
                "not a directory",
            ))
            .into());
        }

        Ok(FileStorage {
            config,
            next_temp: AtomicU64::new(0),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.config.path
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.config.path.join(name)
    }

    /// Remove the lock at `path` if its owner is dead or it has expired.
    /// Returns whether the lock is gone.
    fn clear_stale_lock(&self, name: &str, path: &Path) -> bool {
        let owner = fs::read_to_string(path)
            .ok()
            .and_then(|content| content.trim().parse::<u32>().ok());
        let age = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok());

        let owner_dead = owner.is_some_and(|pid| !process_alive(pid));
        let expired = matches!(
            (self.config.stale_lock_after, age),
            (Some(limit), Some(age)) if age > limit
        );
        if !owner_dead && !expired {
            log::debug!("Lock {name} held by process {owner:?}");
            return false;
        }

        match owner {
            Some(pid) if owner_dead => {
                log::warn!("Removing lock {name} left by exited process {pid}")
            }
            _ => log::warn!("Removing lock {name} older than {age:?}"),
        }
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                log::warn!("Could not remove stale lock {name}: {e}");
                false
            }
        }
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let file = File::open(self.path_of(name)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
            _ => StorageError::io("open", name)(e),
        })?;
        Ok(Box::new(BufReader::with_capacity(self.config.buffer_size, file)))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path_of(name)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(StorageError::io("delete", name)(e).into())
            }
            _ => Ok(()),
        }
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let root = self.config.path.display().to_string();
        let entries = fs::read_dir(&self.config.path).map_err(StorageError::io("list", &root))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StorageError::io("list", &root))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && !name.ends_with(TEMP_SUFFIX)
                && !name.ends_with(LOCK_SUFFIX)
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn rename_file(&self, from: &str, to: &str) -> Result<()> {
        // atomic on a single filesystem, which a storage root always is
        fs::rename(self.path_of(from), self.path_of(to)).map_err(StorageError::io("rename", from))?;
        Ok(())
    }

    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)> {
        let pid = std::process::id();
        loop {
            let n = self.next_temp.fetch_add(1, Ordering::Relaxed);
            let name = format!(".{prefix}.{pid}.{n}{TEMP_SUFFIX}");

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.path_of(&name))
            {
                Ok(file) => {
                    let output = FileOutput {
                        writer: BufWriter::with_capacity(self.config.buffer_size, file),
                        finished: false,
                    };
                    return Ok((name, Box::new(output)));
                }
                // left behind by an earlier process with the same pid
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StorageError::io("create", name)(e).into()),
            }
        }
    }

    fn acquire_lock(&self, name: &str) -> Result<Box<dyn StorageLock>> {
        let path = self.path_of(&format!("{name}{LOCK_SUFFIX}"));
        let mut file = match create_lock_file(&path) {
            Ok(file) => file,
            Err(e)
                if e.kind() == io::ErrorKind::AlreadyExists
                    && self.clear_stale_lock(name, &path) =>
            {
                create_lock_file(&path).map_err(|e| lock_error(name, e))?
            }
            Err(e) => return Err(lock_error(name, e).into()),
        };

        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            log::debug!("Could not record owner of lock {name}: {e}");
        }

        Ok(Box::new(FileLock {
            name: name.to_string(),
            path: Some(path),
        }))
    }
}

fn create_lock_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

fn lock_error(name: &str, e: io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::AlreadyExists => StorageError::Locked {
            name: name.to_string(),
        },
        _ => StorageError::io("lock", name)(e),
    }
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

// liveness is unknown here, only `stale_lock_after` can expire a lock
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Buffered writer over a temporary file.
#[derive(Debug)]
struct FileOutput {
    writer: BufWriter<File>,
    finished: bool,
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn finish(&mut self) -> Result<()> {
        if !self.finished {
            self.writer.flush()?;
            self.writer.get_ref().sync_all()?;
            self.finished = true;
        }
        Ok(())
    }
}

/// Lock file, removed on release or drop.
#[derive(Debug)]
struct FileLock {
    name: String,
    path: Option<PathBuf>,
}

impl StorageLock for FileLock {
    fn name(&self) -> &str {
        &self.name
    }

    fn release(&mut self) -> Result<()> {
        if let Some(path) = self.path.take() {
            fs::remove_file(&path).map_err(StorageError::io("unlock", &self.name))?;
        }
        Ok(())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("{e}");
        }
    }
}
