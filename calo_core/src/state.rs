//! User state persistence with file locking.
//!
//! The state file holds the profile, the goal settings and the favorites.
//! Logged entries live in the journal instead.

use crate::engine::{self, EnergyPlan};
use crate::favorites::FavoriteBook;
use crate::{Error, GoalTarget, Result, UserProfile};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Everything the user has configured
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserState {
    #[serde(default)]
    pub profile: Option<UserProfile>,

    #[serde(default)]
    pub goal_target: Option<GoalTarget>,

    /// Daily calorie goal pinned by the user
    #[serde(default)]
    pub calorie_goal_override: Option<f64>,

    #[serde(default)]
    pub favorites: FavoriteBook,
}

impl UserState {
    /// The profile, or an error telling the user to create one
    pub fn require_profile(&self) -> Result<&UserProfile> {
        self.profile
            .as_ref()
            .ok_or_else(|| Error::State("No profile set; run `calo profile set` first".into()))
    }

    /// Energy plan for the stored profile and goal settings
    pub fn plan(&self, now: DateTime<Utc>) -> Result<EnergyPlan> {
        let profile = self.require_profile()?;
        Ok(engine::plan(
            profile,
            self.goal_target.as_ref(),
            self.calorie_goal_override,
            now,
        ))
    }

    /// Load user state from a file with shared locking
    ///
    /// Returns default state if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns default state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open state file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<UserState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded user state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save user state atomically
    ///
    /// Writes a temp file in the same directory, syncs it, then renames it
    /// over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("State path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved user state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back
    ///
    /// The whole cycle runs under an exclusive lock on a sidecar
    /// `<state>.lock` file, so concurrent updates are serialized instead of
    /// overwriting each other.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserState) -> Result<()>,
    {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("State path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(lock_path(path))?;
        lock_file.lock_exclusive()?;

        let result = Self::load(path).and_then(|mut state| {
            f(&mut state)?;
            state.save(path)?;
            Ok(state)
        });

        lock_file.unlock()?;
        result
    }
}

/// Sidecar file guarding read-modify-write cycles on the state file
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}
