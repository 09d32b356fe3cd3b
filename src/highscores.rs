//! Best score / best wave persistence
//!
//! The simulation only touches storage on game over, through the
//! `ScoreStore` trait. Reads never fail: a missing or unreadable store yields
//! the defaults (high score 0, best wave 1).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage failures (logged at the trait boundary, never surfaced to the simulation)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// Persistence collaborator for aggregate records
pub trait ScoreStore {
    fn load_high_score(&self) -> u64;
    fn save_high_score(&mut self, score: u64);
    fn load_best_wave(&self) -> u32;
    fn save_best_wave(&mut self, wave: u32);
}

/// The persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub high_score: u64,
    pub best_wave: u32,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self {
            high_score: 0,
            best_wave: 1,
        }
    }
}

/// Which records a finished run broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunRecord {
    pub new_high_score: bool,
    pub new_best_wave: bool,
}

/// Compare a finished run against the store and save whatever it beat
pub fn record_run(store: &mut dyn ScoreStore, score: u64, waves_survived: u32) -> RunRecord {
    let mut record = RunRecord::default();
    if score > store.load_high_score() {
        store.save_high_score(score);
        record.new_high_score = true;
    }
    if waves_survived > store.load_best_wave() {
        store.save_best_wave(waves_survived);
        record.new_best_wave = true;
    }
    record
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: ScoreRecord,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_high_score(&self) -> u64 {
        self.record.high_score
    }

    fn save_high_score(&mut self, score: u64) {
        self.record.high_score = score;
    }

    fn load_best_wave(&self) -> u32 {
        self.record.best_wave
    }

    fn save_best_wave(&mut self, wave: u32) {
        self.record.best_wave = wave;
    }
}

/// JSON file store. The record is cached and written through on every save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    record: ScoreRecord,
}

impl FileStore {
    /// Open the store at `path`, falling back to defaults if it can't be read
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match Self::read(&path) {
            Ok(record) => {
                log::info!(
                    "Loaded records from {}: high score {}, best wave {}",
                    path.display(),
                    record.high_score,
                    record.best_wave
                );
                record
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No records at {}, starting fresh", path.display());
                ScoreRecord::default()
            }
            Err(e) => {
                log::warn!("Ignoring records at {}: {}", path.display(), e);
                ScoreRecord::default()
            }
        };
        Self { path, record }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> ScoreRecord {
        self.record
    }

    fn read(path: &Path) -> Result<ScoreRecord, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.record)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn persist(&self) {
        match self.write() {
            Ok(()) => log::info!("Records saved to {}", self.path.display()),
            Err(e) => log::warn!("Failed to save records to {}: {}", self.path.display(), e),
        }
    }
}

impl ScoreStore for FileStore {
    fn load_high_score(&self) -> u64 {
        self.record.high_score
    }

    fn save_high_score(&mut self, score: u64) {
        self.record.high_score = score;
        self.persist();
    }

    fn load_best_wave(&self) -> u32 {
        self.record.best_wave
    }

    fn save_best_wave(&mut self, wave: u32) {
        self.record.best_wave = wave;
        self.persist();
    }
}

/// Browser LocalStorage store (one key per value)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const HIGH_SCORE_KEY: &'static str = "tb_high";
    const BEST_WAVE_KEY: &'static str = "tb_best";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    fn get(key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(key: &str, value: String) {
        let result = Self::storage()
            .and_then(|s| s.set_item(key, &value).map_err(|_| StoreError::Unavailable));
        if let Err(e) = result {
            log::warn!("Failed to save {}: {}", key, e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load_high_score(&self) -> u64 {
        Self::get(Self::HIGH_SCORE_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u64) {
        Self::set(Self::HIGH_SCORE_KEY, score.to_string());
    }

    fn load_best_wave(&self) -> u32 {
        Self::get(Self::BEST_WAVE_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1)
    }

    fn save_best_wave(&mut self, wave: u32) {
        Self::set(Self::BEST_WAVE_KEY, wave.to_string());
    }
}
