//! File-backed snapshot storage, standing in for browser localStorage across "reloads".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use swipecity_game::{GameStorage, SavedGame};

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FileStorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// A fresh directory under the system temp dir, unique per label and seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn scratch(label: &str, seed: u64) -> Result<Self, FileStorageError> {
        let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::new(std::env::temp_dir().join(format!(
            "swipecity-tester-{label}-{seed}-{}-{stamp}",
            std::process::id()
        )))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Remove the directory and everything in it.
    pub fn remove(self) {
        if let Err(err) = fs::remove_dir_all(&self.dir) {
            log::debug!("Could not remove {}: {err}", self.dir.display());
        }
    }
}

impl GameStorage for FileStorage {
    type Error = FileStorageError;

    fn save_game(&self, key: &str, snapshot: &SavedGame) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(self.path_for(key), json)?;
        Ok(())
    }

    fn load_game(&self, key: &str) -> Result<Option<SavedGame>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn delete_save(&self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipecity_game::{GamePhase, constants::STORAGE_KEY};

    #[test]
    fn snapshot_survives_a_new_handle() {
        let storage = FileStorage::scratch("unit", 7).unwrap();
        let snapshot = SavedGame {
            current_question_index: 2,
            answers: Vec::new(),
            game_phase: GamePhase::Questions,
            timestamp: 42,
        };
        storage.save_game(STORAGE_KEY, &snapshot).unwrap();

        let reopened = FileStorage::new(storage.dir()).unwrap();
        assert_eq!(reopened.load_game(STORAGE_KEY).unwrap(), Some(snapshot));
        reopened.delete_save(STORAGE_KEY).unwrap();
        reopened.delete_save(STORAGE_KEY).unwrap();
        assert_eq!(reopened.load_game(STORAGE_KEY).unwrap(), None);
        storage.remove();
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_panic() {
        let storage = FileStorage::scratch("corrupt", 7).unwrap();
        fs::write(storage.dir().join("slot.json"), "{not json").unwrap();
        assert!(matches!(
            storage.load_game("slot"),
            Err(FileStorageError::Serialization(_))
        ));
        storage.remove();
    }
}
