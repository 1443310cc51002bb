//! User-facing command failures.
//!
//! Every failure renders as exactly one output line through `Display`. The
//! line text is part of the command contract, so the strings here are matched
//! verbatim by tests.

use std::fmt;

/// The command a failure belongs to, rendered as the `Cannot <action>:` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Play,
  Stop,
  Pause,
  Continue,
  Flag,
  Allow,
  AddTo(String),
  RemoveFrom(String),
  ShowPlaylist(String),
  ClearPlaylist(String),
  DeletePlaylist(String),
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Action::Play => f.write_str("play video"),
      Action::Stop => f.write_str("stop video"),
      Action::Pause => f.write_str("pause video"),
      Action::Continue => f.write_str("continue video"),
      Action::Flag => f.write_str("flag video"),
      Action::Allow => f.write_str("remove flag from video"),
      Action::AddTo(name) => write!(f, "add video to {}", name),
      Action::RemoveFrom(name) => write!(f, "remove video from {}", name),
      Action::ShowPlaylist(name) => write!(f, "show playlist {}", name),
      Action::ClearPlaylist(name) => write!(f, "clear playlist {}", name),
      Action::DeletePlaylist(name) => write!(f, "delete playlist {}", name),
    }
  }
}

/// Coarse failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  AlreadyExists,
  InvalidName,
  AlreadyInState,
  Flagged,
  Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
  #[error("Cannot {0}: Video does not exist")]
  VideoNotFound(Action),

  #[error("Cannot {0}: Playlist does not exist")]
  PlaylistNotFound(Action),

  #[error("Cannot {0}: Video is not in playlist")]
  NotInPlaylist(Action),

  #[error("Cannot {0}: No video is currently playing")]
  NothingPlaying(Action),

  #[error("Cannot create playlist: A playlist with the same name already exists")]
  PlaylistExists,

  #[error("You cannot have any whitespace in your playlist name")]
  InvalidName,

  #[error("Video already paused: {0}")]
  AlreadyPaused(String),

  #[error("Cannot continue video: Video is not paused")]
  NotPaused,

  #[error("Cannot {0}: Video already added")]
  AlreadyAdded(Action),

  #[error("Cannot flag video: Video is already flagged")]
  AlreadyFlagged,

  #[error("Cannot remove flag from video: Video is not flagged")]
  NotFlagged,

  #[error("Cannot {action}: Video is currently flagged {reason}")]
  Flagged { action: Action, reason: String },

  #[error("No videos available")]
  NoVideosAvailable,

  #[error("No search results for {0}")]
  NoSearchResults(String),
}

impl PlayerError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      PlayerError::VideoNotFound(_)
      | PlayerError::PlaylistNotFound(_)
      | PlayerError::NotInPlaylist(_)
      | PlayerError::NothingPlaying(_) => ErrorKind::NotFound,
      PlayerError::PlaylistExists => ErrorKind::AlreadyExists,
      PlayerError::InvalidName => ErrorKind::InvalidName,
      PlayerError::AlreadyPaused(_)
      | PlayerError::NotPaused
      | PlayerError::AlreadyAdded(_)
      | PlayerError::AlreadyFlagged
      | PlayerError::NotFlagged => ErrorKind::AlreadyInState,
      PlayerError::Flagged { .. } => ErrorKind::Flagged,
      PlayerError::NoVideosAvailable | PlayerError::NoSearchResults(_) => ErrorKind::Empty,
    }
  }
}

/// Result of a single player or playlist command.
pub type Result<T> = std::result::Result<T, PlayerError>;
