//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so there is no runtime file
//! I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// Shell strings and defaults that are not user-configurable.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Application name used for the platform config/data directories.
  pub app_name: String,

  // Interactive shell
  pub prompt: String,
  pub greeting: Vec<String>,
  pub farewell: String,

  // Moderation
  pub default_flag_reason: String,

  // Logging
  pub log_file_name: String,
  pub default_log_filter: String,
  pub log_env_var: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
