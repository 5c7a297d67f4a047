//! Application configuration

use crate::AppError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub gallery: GalleryConfig,
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            gallery: GalleryConfig::default(),
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub language: String,
    pub theme: String,
    pub start_maximized: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: "vi".to_string(),
            theme: "dark".to_string(),
            start_maximized: false,
            window_width: 1280,
            window_height: 860,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Exhibition JSON; the bundled exhibition is used when unset
    pub catalog: Option<PathBuf>,
    /// Directory image references are resolved against
    pub asset_root: PathBuf,
    pub flip_delay_ms: u64,
    pub thumbnail_size: u32,
    pub preload_thumbnails: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            asset_root: PathBuf::from("./public"),
            flip_delay_ms: 300,
            thumbnail_size: 128,
            preload_thumbnails: true,
        }
    }
}

impl GalleryConfig {
    pub fn flip_delay(&self) -> Duration {
        Duration::from_millis(self.flip_delay_ms)
    }
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, falling back to defaults if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self, AppError> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), AppError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "VirtualGallery", "VirtualGallery")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}

fn default_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    // Navigation
    kb.insert("nav.next_item".into(), vec!["Right".into()]);
    kb.insert("nav.prev_item".into(), vec!["Left".into()]);
    kb.insert("nav.first_item".into(), vec!["Home".into()]);
    kb.insert("nav.last_item".into(), vec!["End".into()]);

    // View
    kb.insert("view.toggle_story".into(), vec!["i".into()]);
    kb.insert("view.toggle_original".into(), vec!["o".into()]);
    kb.insert("view.toggle_fullscreen".into(), vec!["F11".into()]);

    // App
    kb.insert("app.exit".into(), vec!["q".into()]);

    kb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.general.language, "vi");
        assert_eq!(config.gallery.flip_delay(), Duration::from_millis(300));
        assert_eq!(config.gallery.catalog, None);
        assert_eq!(config.keybindings["nav.next_item"], vec!["Right".to_string()]);
        assert_eq!(config.keybindings["nav.prev_item"], vec!["Left".to_string()]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[general]\nlanguage = \"en\"\n\n[gallery]\nflip_delay_ms = 120\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.general.language, "en");
        assert_eq!(config.general.theme, "dark");
        assert_eq!(config.gallery.flip_delay_ms, 120);
        assert_eq!(config.gallery.thumbnail_size, 128);
        assert!(config.keybindings.contains_key("app.exit"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.gallery.catalog = Some(PathBuf::from("/srv/exhibition.json"));
        config.keybindings.insert("nav.next_item".into(), vec!["Right".into(), "l".into()]);
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general\nlanguage = ").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(AppError::Config(_))));
    }
}
