use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::KeyValueStorage;
use crate::error::StorageError;

/// Directory-backed storage: one `<key>.json` file per slot.
///
/// Keys must be plain file names; anything with a path separator, `.`, `..`
/// or an empty key is rejected with [`StorageError::InvalidKey`]. Writes land
/// in a per-process temporary sibling file that is renamed over the target,
/// so a failed write never leaves a half-written slot behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on the first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.{}.tmp", key, std::process::id()))
    }
}

fn check_key(key: &str) -> Result<(), StorageError> {
    let plain = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(|c: char| c == '/' || c == '\\');
    if plain {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(key);
        let tmp = self.tmp_path_for(key);
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {}", value.len(), target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));
        assert!(storage.get("recipes").unwrap().is_none());
    }

    #[test]
    fn test_set_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested").join("data"));

        storage.set("recipes", "[]").unwrap();
        storage.set("recipes", r#"[{"id":1}]"#).unwrap();

        assert_eq!(
            storage.get("recipes").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert!(storage.path_for("recipes").exists());
        assert!(!storage.tmp_path_for("recipes").exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("recipes", "[]").unwrap();

        // A directory squatting on the temp path makes the write fail
        fs::create_dir(storage.tmp_path_for("recipes")).unwrap();
        assert!(storage.set("recipes", "[1]").is_err());

        assert_eq!(storage.get("recipes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_rejects_keys_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data"));

        for key in ["../x", "a/b", "a\\b", "..", ".", ""] {
            assert!(matches!(
                storage.set(key, "[]"),
                Err(StorageError::InvalidKey(_))
            ));
            assert!(matches!(storage.get(key), Err(StorageError::InvalidKey(_))));
        }
        assert!(!dir.path().join("x.json").exists());
        assert!(!dir.path().join("data").exists());
    }
}
