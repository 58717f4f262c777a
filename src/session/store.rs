//! Resume record persistence

use std::fs;
use std::path::PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Last played track and where it was left off
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub path: PathBuf,
    pub position_ms: u64,
    pub folder: Option<PathBuf>,
    pub saved_at: DateTime<Utc>,
}

impl ResumeRecord {
    pub fn new(path: PathBuf, position_ms: u64, folder: Option<PathBuf>) -> Self {
        Self {
            path,
            position_ms,
            folder,
            saved_at: Utc::now(),
        }
    }
}

/// Persistent key-value store holding at most one resume record
pub trait ResumeStore: Send {
    fn put(&mut self, record: &ResumeRecord) -> Result<()>;
    fn get(&self) -> Result<Option<ResumeRecord>>;
    fn clear(&mut self) -> Result<()>;
}

/// Resume record kept as a JSON file
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResumeStore for JsonFileStore {
    fn put(&mut self, record: &ResumeRecord) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn get(&self) -> Result<Option<ResumeRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_store_put_get_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join(".cache/resume.json"));
        assert_eq!(store.get().unwrap(), None);

        let record = ResumeRecord::new(
            PathBuf::from("/media/usb/b.mp4"),
            42_000,
            Some(PathBuf::from("/media/usb")),
        );
        store.put(&record).unwrap();
        assert_eq!(store.get().unwrap(), Some(record));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get(), Err(crate::error::Error::Store(_))));
    }
}
