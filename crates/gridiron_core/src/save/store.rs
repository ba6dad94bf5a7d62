use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, GameRecord};
use crate::game::Game;
use chrono::Utc;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const EXTENSION: &str = "game";

/// Where games live between plays
pub trait GameStore {
    fn save(&self, game: &Game) -> Result<(), SaveError>;
    fn load(&self, id: Uuid) -> Result<Game, SaveError>;
    /// Move a finished game out of the active set
    fn archive(&self, id: Uuid) -> Result<(), SaveError>;
    /// Ids of all active games
    fn list(&self) -> Result<Vec<Uuid>, SaveError>;
}

/// One file per game under `root`, finished games under `root/archive`
#[derive(Debug, Clone)]
pub struct FileGameStore {
    root: PathBuf,
}

impl FileGameStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn game_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.{EXTENSION}"))
    }

    fn archive_dir(&self) -> PathBuf {
        self.root.join("archive")
    }

    fn write_atomic(path: &Path, data: &[u8]) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl GameStore for FileGameStore {
    fn save(&self, game: &Game) -> Result<(), SaveError> {
        let path = self.game_path(game.id);
        let data = serialize_and_compress(&GameRecord::new(game.clone(), Utc::now()))?;
        Self::write_atomic(&path, &data)?;
        log::debug!("Saved game {} ({} bytes) to {:?}", game.id, data.len(), path);
        Ok(())
    }

    fn load(&self, id: Uuid) -> Result<Game, SaveError> {
        let path = self.game_path(id);
        if !path.exists() {
            return Err(SaveError::GameNotFound { id: id.to_string() });
        }
        let data = fs::read(&path)?;
        let record = decompress_and_deserialize(&data)?;
        let mut game = record.game;
        game.dirty = false;
        log::debug!("Loaded game {} saved at {}", id, record.saved_at);
        Ok(game)
    }

    fn archive(&self, id: Uuid) -> Result<(), SaveError> {
        let path = self.game_path(id);
        if !path.exists() {
            return Err(SaveError::GameNotFound { id: id.to_string() });
        }
        let archive_dir = self.archive_dir();
        fs::create_dir_all(&archive_dir)?;
        fs::rename(&path, archive_dir.join(format!("{id}.{EXTENSION}")))?;
        log::info!("Archived game {}", id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Uuid>, SaveError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(Uuid::parse_str) {
                Some(Ok(id)) => ids.push(id),
                _ => log::warn!("Skipping unrecognized game file {:?}", path),
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::models::{DefenseScheme, OffenseScheme, Playbook, Team};
    use tempfile::TempDir;

    fn game() -> Game {
        let playbook = Playbook { offense: OffenseScheme::Pro, defense: DefenseScheme::ThreeFour };
        Game::new(
            Team::new("home", "Home U", playbook),
            Team::new("away", "Away State", playbook),
            RulesConfig::short_quarters(),
            Utc::now(),
        )
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileGameStore::new(temp_dir.path());
        let mut game = game();
        game.abandon();

        store.save(&game).unwrap();
        let loaded = store.load(game.id).unwrap();

        assert!(!loaded.dirty);
        game.dirty = false;
        assert_eq!(loaded, game);
        assert!(!temp_dir.path().join(format!("{}.tmp", game.id)).exists());
    }

    #[test]
    fn test_list_and_archive() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileGameStore::new(temp_dir.path());
        let first = game();
        let second = game();
        store.save(&first).unwrap();
        store.save(&second).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut expected = vec![first.id, second.id];
        expected.sort();
        assert_eq!(store.list().unwrap(), expected);

        store.archive(first.id).unwrap();
        assert_eq!(store.list().unwrap(), vec![second.id]);
        assert!(temp_dir.path().join("archive").join(format!("{}.game", first.id)).exists());
        assert!(matches!(store.load(first.id), Err(SaveError::GameNotFound { .. })));
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileGameStore::new(temp_dir.path().join("nowhere"));
        assert!(store.list().unwrap().is_empty());
    }
}
