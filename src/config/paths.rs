//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\vtg-editor\
//!   macOS:   ~/Library/Application Support/vtg-editor/
//!   Linux:   ~/.config/vtg-editor/
//!
//! Cache dir (the active task slot):
//!   Windows: %LOCALAPPDATA%\vtg-editor\
//!   macOS:   ~/Library/Caches/vtg-editor/
//!   Linux:   ~/.cache/vtg-editor/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for cached task state.
    pub cache_dir: PathBuf,
    /// Full path to `active-task.json`, the resumable task slot.
    pub active_task_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "vtg-editor";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let active_task_file = cache_dir.join("active-task.json");

        Self {
            config_dir,
            settings_file,
            cache_dir,
            active_task_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
