//! Resumable "active task" slot.
//!
//! Only the task record is stored; the editing session is rebuilt from
//! `word` on restore, so a resumed session behaves exactly like a freshly
//! fetched one.  Unsaved diacritic edits are not kept.

use std::path::{Path, PathBuf};

use super::types::VoiceTask;
use super::TaskError;
use crate::config::AppPaths;

/// JSON file holding at most one [`VoiceTask`].
#[derive(Debug, Clone)]
pub struct TaskCache {
    path: PathBuf,
}

impl TaskCache {
    /// Cache at the platform default location.
    pub fn new() -> Self {
        Self::at(AppPaths::new().active_task_file)
    }

    /// Cache at an explicit path (useful for tests).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached task.
    ///
    /// A missing file yields `None`.  An unreadable or invalid entry is
    /// discarded (the slot is cleared) and also yields `None`.
    pub fn load(&self) -> Option<VoiceTask> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("task cache: cannot read {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str::<VoiceTask>(&data) {
            Ok(task) if task.id != 0 => Some(task),
            Ok(_) => {
                log::warn!("task cache: entry without task id, discarding");
                self.discard();
                None
            }
            Err(e) => {
                log::warn!("task cache: invalid entry ({e}), discarding");
                self.discard();
                None
            }
        }
    }

    /// Replace the cached task.
    pub fn save(&self, task: &VoiceTask) -> Result<(), TaskError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(task)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// Empty the slot.  Clearing an already-empty slot is not an error.
    pub fn clear(&self) -> Result<(), TaskError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn discard(&self) {
        if let Err(e) = self.clear() {
            log::warn!("task cache: cannot clear {}: {e}", self.path.display());
        }
    }
}

impl Default for TaskCache {
    fn default() -> Self {
        Self::new()
    }
}
