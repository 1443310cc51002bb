//! File logging via `tracing-appender`.
//!
//! stdout carries command output, so log records go to
//! `<data_local_dir>/vidshelf.log` instead.

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::constants::constants;

/// Pick the filter directive: environment first, then config, then the built-in default.
fn filter_directive(env: Option<String>, config: Option<&str>) -> String {
  env
    .filter(|d| !d.trim().is_empty())
    .or_else(|| config.map(str::to_string))
    .unwrap_or_else(|| constants().default_log_filter.clone())
}

/// Install the global subscriber. Returns `None` (logging disabled) when there
/// is no usable data directory. Keep the guard alive to flush on exit.
pub fn init(config_filter: Option<&str>) -> Option<WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", &constants().app_name)?;
  let log_dir = proj_dirs.data_local_dir();
  std::fs::create_dir_all(log_dir).ok()?;

  let appender = tracing_appender::rolling::never(log_dir, &constants().log_file_name);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let directive = filter_directive(std::env::var(&constants().log_env_var).ok(), config_filter);
  let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(&constants().default_log_filter));

  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).try_init().ok()?;
  tracing::info!(log_dir = %log_dir.display(), filter = %directive, "logging: initialised");
  Some(guard)
}
