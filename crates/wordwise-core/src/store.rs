//! Persistence contracts and the stores that implement them.
//!
//! The queue only talks to [`StateStore`] and [`WordListProvider`]. A store
//! reports "nothing saved yet" as `Ok(None)`, corrupt data as
//! [`SrsError::MalformedState`] and disk failures as [`SrsError::Io`].

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{Result, SrsError};
use crate::goals::{GoalItem, GoalManager};
use crate::snapshot::QueueSnapshot;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Durable home of one learner's queue snapshot.
pub trait StateStore: Send + Sync {
    /// Read the saved snapshot, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<QueueSnapshot>>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &QueueSnapshot) -> Result<()>;

    /// Short description used in logs and error messages.
    fn describe(&self) -> String;
}

/// Ordered word list used to seed a learner with no saved state.
pub trait WordListProvider: Send + Sync {
    fn default_words(&self) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Stores the snapshot as a JSON file.
///
/// Saves go through a temporary file and a rename; the previous file is kept
/// next to it as `<path>.bak`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, ".bak")
    }

    /// Read the backup written by the previous save.
    pub fn load_backup(&self) -> Result<Option<QueueSnapshot>> {
        read_snapshot(&self.backup_path())
    }

    /// Replace the state file with its backup if the backup is readable.
    /// Returns `false` when there is no backup.
    pub fn recover_from_backup(&self) -> Result<bool> {
        let Some(snapshot) = self.load_backup()? else {
            return Ok(false);
        };
        write_atomic(&self.path, &snapshot)?;
        tracing::warn!(
            path = %self.path.display(),
            words = snapshot.len(),
            "state restored from backup"
        );
        Ok(true)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<QueueSnapshot>> {
        read_snapshot(&self.path)
    }

    fn save(&self, snapshot: &QueueSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        if self.path.exists() {
            let backup = self.backup_path();
            std::fs::copy(&self.path, &backup).map_err(|e| io_error(&backup, e))?;
        }
        write_atomic(&self.path, snapshot)?;
        tracing::debug!(path = %self.path.display(), words = snapshot.len(), "state saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// Goal file
// ---------------------------------------------------------------------------

/// Keeps a learner's goals as a JSON array of [`GoalItem`]s.
#[derive(Debug, Clone)]
pub struct JsonGoalFile {
    path: PathBuf,
}

impl JsonGoalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved goals. A missing file holds no goals.
    pub fn load(&self) -> Result<GoalManager> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(GoalManager::new()),
            Err(e) => return Err(io_error(&self.path, e)),
        };
        let goals: Vec<GoalItem> =
            serde_json::from_str(&content).map_err(|e| SrsError::MalformedState {
                origin: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(goals.into_iter().collect())
    }

    pub fn save(&self, goals: &GoalManager) -> Result<()> {
        let json = serde_json::to_string_pretty(goals.list_goals())
            .map_err(|e| serialization_error(&self.path.display().to_string(), e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        write_text_atomic(&self.path, &json)?;
        tracing::debug!(
            path = %self.path.display(),
            goals = goals.list_goals().len(),
            "goals saved"
        );
        Ok(())
    }
}

fn read_snapshot(path: &Path) -> Result<Option<QueueSnapshot>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };
    QueueSnapshot::from_json(&content, &path.display().to_string()).map(Some)
}

fn write_atomic(path: &Path, snapshot: &QueueSnapshot) -> Result<()> {
    let json = snapshot
        .to_json_pretty()
        .map_err(|e| serialization_error(&path.display().to_string(), e))?;
    write_text_atomic(path, &json)
}

fn write_text_atomic(path: &Path, json: &str) -> Result<()> {
    let tmp = with_suffix(path, ".tmp");
    std::fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_error(path, e))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn serialization_error(origin: &str, source: serde_json::Error) -> SrsError {
    SrsError::Serialization {
        origin: origin.to_string(),
        source,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SrsError {
    SrsError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps the serialized snapshot in memory. Useful for tests and for
/// servers that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with raw JSON, valid or not.
    pub fn with_json(json: &str) -> Self {
        Self {
            json: Mutex::new(Some(json.to_string())),
        }
    }

    /// The raw JSON last saved, if any.
    pub fn json(&self) -> Option<String> {
        self.json
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<QueueSnapshot>> {
        self.json()
            .map(|json| QueueSnapshot::from_json(&json, "memory"))
            .transpose()
    }

    fn save(&self, snapshot: &QueueSnapshot) -> Result<()> {
        let json = snapshot
            .to_json_pretty()
            .map_err(|e| serialization_error("memory", e))?;
        *self.json.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ---------------------------------------------------------------------------
// Static word list
// ---------------------------------------------------------------------------

/// A caller-supplied default word list.
#[derive(Debug, Clone, Default)]
pub struct StaticWordList {
    words: Vec<String>,
}

impl StaticWordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordListProvider for StaticWordList {
    fn default_words(&self) -> Vec<String> {
        self.words.clone()
    }
}
