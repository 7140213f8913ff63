//! src/config.rs
//! ============================================================================
//! # Config: Storefront Configuration Loader and Saver (directories only)
//!
//! Holds every tunable of the catalog browser: where the static site lives,
//! the fixed relative path of the catalog resource, and the delays behind the
//! debounce and the simulated-latency feedback timers. Loads and saves TOML
//! from the cross-platform config path resolved by
//! [`directories`](https://docs.rs/directories).
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;

/// Fixed delays used by the controllers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Quiet period before a typed search query is applied
    #[serde(with = "humantime_serde")]
    pub search_debounce: Duration,

    /// Lifetime of the load-failure banner
    #[serde(with = "humantime_serde")]
    pub banner_dismiss: Duration,

    /// Delay between un-hiding the menu and sliding its panel in
    #[serde(with = "humantime_serde")]
    pub menu_reveal: Duration,

    /// Must match the CSS slide-out transition
    #[serde(with = "humantime_serde")]
    pub menu_transition: Duration,

    #[serde(with = "humantime_serde")]
    pub contact_submit: Duration,

    #[serde(with = "humantime_serde")]
    pub newsletter_submit: Duration,

    #[serde(with = "humantime_serde")]
    pub newsletter_revert: Duration,

    #[serde(with = "humantime_serde")]
    pub download_prepare: Duration,

    #[serde(with = "humantime_serde")]
    pub download_revert: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(300),
            banner_dismiss: Duration::from_secs(5),
            menu_reveal: Duration::from_millis(10),
            menu_transition: Duration::from_millis(300),
            contact_submit: Duration::from_millis(1500),
            newsletter_submit: Duration::from_secs(1),
            newsletter_revert: Duration::from_secs(2),
            download_prepare: Duration::from_millis(1500),
            download_revert: Duration::from_secs(2),
        }
    }
}

/// Presentation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Scroll offset past which the back-to-top button shows
    pub back_to_top_threshold: u32,

    /// Characters of description kept on a card
    pub description_preview_chars: usize,

    /// Probability (0.0 to 1.0) that a simulated contact submission fails
    pub contact_failure_rate: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            back_to_top_threshold: 300,
            description_preview_chars: 160,
            contact_failure_rate: 0.1,
        }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "ebookstore".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the static storefront is served from
    pub site_root: PathBuf,

    /// Catalog location, relative to `site_root`
    pub catalog_path: String,

    /// Location opened at startup, e.g. `index.html?search=rust`
    pub start_page: String,

    /// Where downloaded books land; the user's download dir when unset
    pub downloads_dir: Option<PathBuf>,

    /// Backing file of the local-storage emulation; data dir when unset
    pub local_storage: Option<PathBuf>,

    pub timings: Timings,

    pub ui: UiConfig,

    pub logging: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_root: PathBuf::from("site"),
            catalog_path: "data/ebooks.json".to_string(),
            start_page: "index.html".to_string(),
            downloads_dir: None,
            local_storage: None,
            timings: Timings::default(),
            ui: UiConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the TOML file in the platform config dir, or
    /// writes and returns the defaults when none exists yet.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        if TokioFs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(&path).await?;

            Ok(default_config)
        }
    }

    /// Loads config from an explicit TOML file. Missing keys take defaults.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        info!("Loading config from {}", path.display());
        let text = TokioFs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_access(path, e))?;
        Ok(toml::from_str(&text)?)
    }

    /// Saves config to the TOML file in the platform config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_access(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str)
            .await
            .map_err(|e| AppError::file_access(path, e))?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Local-storage file: explicit setting, else `<data dir>/local_storage.json`.
    pub fn local_storage_path(&self) -> Result<PathBuf, AppError> {
        match &self.local_storage {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("local_storage.json")),
        }
    }

    /// Downloads directory: explicit setting, else the user's download dir,
    /// else `./downloads`.
    pub fn downloads_path(&self) -> PathBuf {
        if let Some(dir) = &self.downloads_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("downloads"))
    }

    fn project_dirs() -> Result<ProjectDirs, AppError> {
        ProjectDirs::from("org", "ebookstore", "eBookStore")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            "site_root = \"/srv/shop\"\n[timings]\nsearch_debounce = \"150ms\"\n",
        )
        .await
        .expect("write config");

        let cfg = Config::load_from(&path).await.expect("load");

        assert_eq!(cfg.site_root, PathBuf::from("/srv/shop"));
        assert_eq!(cfg.timings.search_debounce, Duration::from_millis(150));
        assert_eq!(cfg.timings.banner_dismiss, Duration::from_secs(5));
        assert_eq!(cfg.catalog_path, "data/ebooks.json");
    }

    #[tokio::test]
    async fn saved_file_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.ui.contact_failure_rate = 0.0;
        cfg.save_to(&path).await.expect("save");

        let loaded = Config::load_from(&path).await.expect("load");
        assert_eq!(loaded.ui.contact_failure_rate, 0.0);
        assert_eq!(loaded.timings.download_revert, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "site_root = [").await.expect("write");

        assert!(matches!(
            Config::load_from(&path).await,
            Err(AppError::Config(_))
        ));
    }
}
