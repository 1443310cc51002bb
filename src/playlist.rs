use std::collections::HashMap;
use tracing::info;

use crate::catalog::{Video, VideoCatalog};
use crate::error::{Action, PlayerError, Result};
use crate::output::Sink;

/// Case-folded playlist name. Two names that differ only in case map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaylistKey(String);

impl PlaylistKey {
  pub fn new(name: &str) -> Self {
    Self(name.to_lowercase())
  }
}

/// A named, ordered list of catalog video ids without duplicates.
#[derive(Debug, Clone)]
pub struct Playlist {
  name: String,
  video_ids: Vec<String>,
}

impl Playlist {
  pub fn new(name: &str) -> Self {
    Self { name: name.to_string(), video_ids: Vec::new() }
  }

  /// Name with the casing it was created with.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn video_ids(&self) -> &[String] {
    &self.video_ids
  }

  pub fn contains(&self, video_id: &str) -> bool {
    self.video_ids.iter().any(|id| id == video_id)
  }

  /// `typed_name` is the name as the user wrote it; messages echo it back.
  pub fn add(&mut self, video: &Video, typed_name: &str, out: &mut impl Sink) -> Result<()> {
    let action = || Action::AddTo(typed_name.to_string());
    if self.contains(&video.id) {
      return Err(PlayerError::AlreadyAdded(action()));
    }
    if let Some(reason) = &video.flag {
      return Err(PlayerError::Flagged { action: action(), reason: reason.clone() });
    }
    self.video_ids.push(video.id.clone());
    out.emit(format!("Added video to {}: {}", typed_name, video.title));
    Ok(())
  }

  pub fn remove(&mut self, video: &Video, typed_name: &str, out: &mut impl Sink) -> Result<()> {
    let pos = self
      .video_ids
      .iter()
      .position(|id| *id == video.id)
      .ok_or_else(|| PlayerError::NotInPlaylist(Action::RemoveFrom(typed_name.to_string())))?;
    self.video_ids.remove(pos);
    out.emit(format!("Removed video from {}: {}", typed_name, video.title));
    Ok(())
  }

  pub fn clear(&mut self) {
    self.video_ids.clear();
  }
}

/// All playlists of the session, keyed case-insensitively.
#[derive(Debug, Default)]
pub struct PlaylistStore {
  playlists: HashMap<PlaylistKey, Playlist>,
}

impl PlaylistStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<&Playlist> {
    self.playlists.get(&PlaylistKey::new(name))
  }

  pub fn len(&self) -> usize {
    self.playlists.len()
  }

  pub fn is_empty(&self) -> bool {
    self.playlists.is_empty()
  }

  pub fn create(&mut self, name: &str, out: &mut impl Sink) -> Result<()> {
    if name.chars().any(char::is_whitespace) {
      return Err(PlayerError::InvalidName);
    }
    let key = PlaylistKey::new(name);
    if self.playlists.contains_key(&key) {
      return Err(PlayerError::PlaylistExists);
    }
    self.playlists.insert(key, Playlist::new(name));
    info!(playlist = name, total = self.len(), "playlist: created");
    out.emit(format!("Successfully created new playlist: {}", name));
    Ok(())
  }

  pub fn add_video(&mut self, catalog: &VideoCatalog, name: &str, video_id: &str, out: &mut impl Sink) -> Result<()> {
    let playlist = self
      .playlists
      .get_mut(&PlaylistKey::new(name))
      .ok_or_else(|| PlayerError::PlaylistNotFound(Action::AddTo(name.to_string())))?;
    let video = catalog.get(video_id).ok_or_else(|| PlayerError::VideoNotFound(Action::AddTo(name.to_string())))?;
    playlist.add(video, name, out)?;
    info!(playlist = playlist.name(), video_id, "playlist: video added");
    Ok(())
  }

  pub fn remove_video(
    &mut self,
    catalog: &VideoCatalog,
    name: &str,
    video_id: &str,
    out: &mut impl Sink,
  ) -> Result<()> {
    let playlist = self
      .playlists
      .get_mut(&PlaylistKey::new(name))
      .ok_or_else(|| PlayerError::PlaylistNotFound(Action::RemoveFrom(name.to_string())))?;
    let video =
      catalog.get(video_id).ok_or_else(|| PlayerError::VideoNotFound(Action::RemoveFrom(name.to_string())))?;
    playlist.remove(video, name, out)?;
    info!(playlist = playlist.name(), video_id, "playlist: video removed");
    Ok(())
  }

  pub fn clear(&mut self, name: &str, out: &mut impl Sink) -> Result<()> {
    let playlist = self
      .playlists
      .get_mut(&PlaylistKey::new(name))
      .ok_or_else(|| PlayerError::PlaylistNotFound(Action::ClearPlaylist(name.to_string())))?;
    playlist.clear();
    info!(playlist = playlist.name(), "playlist: cleared");
    out.emit(format!("Successfully removed all videos from {}", name));
    Ok(())
  }

  pub fn delete(&mut self, name: &str, out: &mut impl Sink) -> Result<()> {
    let removed = self
      .playlists
      .remove(&PlaylistKey::new(name))
      .ok_or_else(|| PlayerError::PlaylistNotFound(Action::DeletePlaylist(name.to_string())))?;
    info!(playlist = removed.name(), "playlist: deleted");
    out.emit(format!("Deleted playlist: {}", name));
    Ok(())
  }

  /// Display names sorted case-insensitively.
  pub fn list_all(&self, out: &mut impl Sink) -> Vec<String> {
    if self.is_empty() {
      out.emit("No playlists exist yet".to_string());
      return Vec::new();
    }
    let mut entries: Vec<(&PlaylistKey, &Playlist)> = self.playlists.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let names: Vec<String> = entries.into_iter().map(|(_, p)| p.name().to_string()).collect();

    out.emit("Showing all playlists:".to_string());
    for name in &names {
      out.emit(format!("  {}", name));
    }
    names
  }

  /// Every entry is indented, flagged or not, and shows the flag as it is now in the catalog.
  pub fn show(&self, catalog: &VideoCatalog, name: &str, out: &mut impl Sink) -> Result<()> {
    let playlist =
      self.get(name).ok_or_else(|| PlayerError::PlaylistNotFound(Action::ShowPlaylist(name.to_string())))?;
    out.emit(format!("Showing playlist: {}", name));
    if playlist.video_ids().is_empty() {
      out.emit("  No videos here yet".to_string());
      return Ok(());
    }
    for video in playlist.video_ids().iter().filter_map(|id| catalog.get(id)) {
      out.emit(format!("  {}", video.listing()));
    }
    Ok(())
  }
}
