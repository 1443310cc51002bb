use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

use crate::constants::constants;

/// User preferences read from `prefs.toml` in the platform config directory.
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
  /// Catalog file to load instead of the built-in one.
  pub catalog_path: Option<String>,
  /// `tracing` filter directive, e.g. `debug` or `vidshelf=trace`.
  pub log_filter: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", &constants().app_name) {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file)
        && let Some(config) = Self::parse(&content)
      {
        return config;
      }
    }
    Self::default()
  }

  /// Parse a prefs file, returning `None` when it is not valid TOML for this schema.
  pub fn parse(content: &str) -> Option<Self> {
    toml::from_str(content).ok()
  }

  pub fn catalog_path(&self) -> Option<PathBuf> {
    self.catalog_path.as_deref().filter(|p| !p.trim().is_empty()).map(PathBuf::from)
  }
}
