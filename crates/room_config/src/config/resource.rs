//! Backing resource providers.
//!
//! The store only needs three things from its backing resource: an
//! existence check, a full read and a full overwrite. `FileResource` does
//! this on the local filesystem; `MemoryResource` keeps text in memory for
//! hosts without a writable disk and for tests.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Full-text access to a resource identified by path.
pub trait ResourceProvider {
    /// Whether the resource exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole resource as text.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Replace the whole resource with `text`.
    fn write(&mut self, path: &Path, text: &str) -> io::Result<()>;
}

/// Local filesystem provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResource;

impl ResourceProvider for FileResource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    fn read(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Writes to a uniquely named temp file in the same directory, then
    /// renames it over the target. The temp file is removed on failure.
    fn write(&mut self, path: &Path, text: &str) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut prefix = OsString::from(".");
        prefix.push(path.file_name().unwrap_or_default());
        prefix.push(".");

        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)?;
        temp.write_all(text.as_bytes())?;
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-memory provider.
///
/// Clones share the same contents, so a test can keep a handle after
/// moving one into a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryResource {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<PathBuf, String>,
    writes: usize,
}

impl MemoryResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a resource without counting it as a write.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.inner.lock().files.insert(path.into(), text.into());
    }

    /// Current text of a resource, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.inner.lock().files.get(path.as_ref()).cloned()
    }

    /// Number of `write` calls made through any handle.
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }
}

impl ResourceProvider for MemoryResource {
    fn exists(&self, path: &Path) -> bool {
        self.inner.lock().files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.inner.lock().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no resource at {}", path.display()),
            )
        })
    }

    fn write(&mut self, path: &Path, text: &str) -> io::Result<()> {
        let mut state = self.inner.lock();
        state.files.insert(path.to_path_buf(), text.to_string());
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("room.cfg");
        let mut provider = FileResource;

        assert!(!provider.exists(&path));
        provider.write(&path, "[a]\r\n1\r\n").unwrap();

        assert!(provider.exists(&path));
        assert_eq!(provider.read(&path).unwrap(), "[a]\r\n1\r\n");
    }

    #[test]
    fn file_write_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("room.cfg");
        let mut provider = FileResource;

        provider.write(&path, "a much longer first version").unwrap();
        provider.write(&path, "short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn file_write_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("room.cfg");
        let mut provider = FileResource;

        provider.write(&path, "x").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("room.cfg")]);
    }

    #[test]
    fn file_write_keeps_neighbouring_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("room.cfg");
        let neighbour = dir.path().join("room.cfg.tmp");
        fs::write(&neighbour, "user notes").unwrap();

        FileResource.write(&path, "[a]\r\n1\r\n").unwrap();

        assert_eq!(fs::read_to_string(&neighbour).unwrap(), "user notes");
        assert_eq!(fs::read_to_string(&path).unwrap(), "[a]\r\n1\r\n");
    }

    #[test]
    fn failed_write_removes_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("room.cfg");
        fs::create_dir(&path).unwrap();

        assert!(FileResource.write(&path, "x").is_err());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("room.cfg")]);
    }

    #[test]
    fn file_read_replaces_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("room.cfg");
        fs::write(&path, b"Caf\xe9 room\r\n").unwrap();

        assert_eq!(FileResource.read(&path).unwrap(), "Caf\u{fffd} room\r\n");
    }

    #[test]
    fn file_read_missing_is_error() {
        let dir = tempdir().unwrap();
        let err = FileResource.read(&dir.path().join("absent.cfg")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn memory_handles_share_state() {
        let seen = MemoryResource::new();
        let mut provider = seen.clone();

        provider.write(Path::new("cfg.txt"), "hello").unwrap();

        assert!(seen.exists(Path::new("cfg.txt")));
        assert_eq!(seen.contents("cfg.txt").as_deref(), Some("hello"));
        assert_eq!(seen.write_count(), 1);
    }

    #[test]
    fn memory_insert_is_not_a_write() {
        let provider = MemoryResource::new();
        provider.insert("cfg.txt", "seed");

        assert_eq!(provider.read(Path::new("cfg.txt")).unwrap(), "seed");
        assert_eq!(provider.write_count(), 0);
        assert!(provider.read(Path::new("other.txt")).is_err());
    }
}
