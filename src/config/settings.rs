//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the worker
//! task.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::editor::TextDirection;
use crate::task::normalize_base_url;

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Connection settings for the task backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Id of the signed-in contributor.
    pub user_id: u64,
    /// Per-request timeout for task fetch and submission.
    pub timeout_secs: u64,
    /// Timeout for the startup reachability probe.
    pub health_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            user_id: 1,
            timeout_secs: 10,
            health_timeout_secs: 5,
        }
    }
}

impl ApiConfig {
    /// Replace the base URL with a normalised form of `raw`.
    pub fn set_base_url(&mut self, raw: &str) {
        self.base_url = normalize_base_url(raw);
    }
}

// ---------------------------------------------------------------------------
// EditorConfig
// ---------------------------------------------------------------------------

/// Settings for the diacritic editor surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Reading direction used to interpret arrow keys.
    pub text_direction: TextDirection,
    /// Point size of the editor glyphs.
    pub font_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            text_direction: TextDirection::Rtl,
            font_size: 48.0,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window and task-flow behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial window size `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Delay after a successful submit before the next task is requested.
    pub next_task_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (960.0, 640.0),
            next_task_delay_ms: 1_500,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use vtg_editor::config::AppConfig;
///
/// let mut config = AppConfig::load()?;
/// config.api.set_base_url("tasks.example.org:8000");
/// config.save()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Task backend settings.
    pub api: ApiConfig,
    /// Editor settings.
    pub editor: EditorConfig,
    /// Window / flow settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Read `settings.toml` from the user config dir.
    ///
    /// A missing file is not an error: first runs get the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Read from `path`; `base_url` is normalised on the way in.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.api.base_url = normalize_base_url(&config.api.base_url);
        Ok(config)
    }

    /// Write `settings.toml` into the user config dir.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Write to `path`, creating parent directories first.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
