use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Catalog shipped with the binary, used when no catalog file is configured.
const BUILTIN_CATALOG: &str = include_str!("../videos.txt");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
  pub id: String,
  pub title: String,
  pub tags: Vec<String>,
  /// Moderation flag reason. A flagged video cannot be played or added to a playlist.
  pub flag: Option<String>,
}

impl Video {
  pub fn is_flagged(&self) -> bool {
    self.flag.is_some()
  }

  /// `Title (id) [tags]`, with ` - FLAGGED <reason>` appended when flagged.
  pub fn listing(&self) -> String {
    match &self.flag {
      Some(reason) => format!("{} - FLAGGED {}", self, reason),
      None => self.to_string(),
    }
  }

  /// Whole-tag, case-insensitive match. Folds case the same way title search does.
  pub fn has_tag(&self, tag: &str) -> bool {
    let tag = tag.to_lowercase();
    self.tags.iter().any(|t| t.to_lowercase() == tag)
  }
}

impl fmt::Display for Video {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({}) [{}]", self.title, self.id, self.tags.join(" "))
  }
}

/// The fixed set of videos available during a session.
///
/// Videos keep their load order, so `all()` is stable across calls. The only
/// mutation is the moderation flag, done through the playback controller.
#[derive(Debug, Clone, Default)]
pub struct VideoCatalog {
  videos: Vec<Video>,
}

impl VideoCatalog {
  /// Build a catalog, rejecting duplicate ids.
  pub fn from_videos(videos: Vec<Video>) -> Result<Self> {
    let mut seen = HashSet::new();
    for video in &videos {
      if !seen.insert(video.id.as_str()) {
        bail!("duplicate video id '{}'", video.id);
      }
    }
    Ok(Self { videos })
  }

  pub fn builtin() -> Result<Self> {
    Self::parse(BUILTIN_CATALOG).context("Built-in catalog is invalid")
  }

  pub fn load(path: &Path) -> Result<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read catalog {}", path.display()))?;
    Self::parse(&content).with_context(|| format!("Failed to parse catalog {}", path.display()))
  }

  /// Parse the `Title | id | #tag1 , #tag2` line format.
  pub fn parse(content: &str) -> Result<Self> {
    let mut videos = Vec::new();
    for (idx, line) in content.lines().enumerate() {
      if line.trim().is_empty() {
        continue;
      }
      let video = parse_catalog_line(line).with_context(|| format!("line {}", idx + 1))?;
      videos.push(video);
    }
    Self::from_videos(videos)
  }

  pub fn all(&self) -> &[Video] {
    &self.videos
  }

  pub fn get(&self, id: &str) -> Option<&Video> {
    self.videos.iter().find(|v| v.id == id)
  }

  pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Video> {
    self.videos.iter_mut().find(|v| v.id == id)
  }

  pub fn len(&self) -> usize {
    self.videos.len()
  }
}

fn parse_catalog_line(line: &str) -> Result<Video> {
  let parts: Vec<&str> = line.split('|').map(str::trim).collect();
  if parts.len() < 2 {
    bail!("expected 'Title | id | tags', got '{}'", line.trim());
  }
  let title = parts[0];
  let id = parts[1];
  if title.is_empty() || id.is_empty() {
    bail!("title and id must not be empty");
  }
  let tags: Vec<String> = parts
    .get(2)
    .map(|field| field.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect())
    .unwrap_or_default();
  Ok(Video { id: id.to_string(), title: title.to_string(), tags, flag: None })
}

#[cfg(test)]
impl Video {
  pub fn new(id: &str, title: &str, tags: &[&str]) -> Self {
    Self {
      id: id.to_string(),
      title: title.to_string(),
      tags: tags.iter().map(|t| t.to_string()).collect(),
      flag: None,
    }
  }

  pub fn flagged(mut self, reason: &str) -> Self {
    self.flag = Some(reason.to_string());
    self
  }
}
