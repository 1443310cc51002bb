use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;

use crate::catalog::{Video, VideoCatalog};
use crate::constants::constants;
use crate::error::{Action, PlayerError, Result};
use crate::output::Sink;

/// What the player is doing. A paused video is still the current video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
  #[default]
  Idle,
  Playing(Video),
  Paused(Video),
}

impl PlaybackState {
  pub fn current(&self) -> Option<&Video> {
    match self {
      PlaybackState::Idle => None,
      PlaybackState::Playing(video) | PlaybackState::Paused(video) => Some(video),
    }
  }

  pub fn is_paused(&self) -> bool {
    matches!(self, PlaybackState::Paused(_))
  }
}

/// Owns playback state and runs the playback, search and moderation commands
/// against a catalog.
#[derive(Debug, Default)]
pub struct PlaybackController {
  state: PlaybackState,
}

impl PlaybackController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> &PlaybackState {
    &self.state
  }

  /// Emit every video's listing line, sorted by the full line.
  pub fn list_all_videos(&self, catalog: &VideoCatalog, out: &mut impl Sink) -> Vec<String> {
    let mut listing: Vec<String> = catalog.all().iter().map(Video::listing).collect();
    listing.sort();
    out.emit("Here's a list of all available videos:".to_string());
    for line in &listing {
      out.emit(line.clone());
    }
    listing
  }

  pub fn play(&mut self, catalog: &VideoCatalog, video_id: &str, out: &mut impl Sink) -> Result<()> {
    let video = catalog.get(video_id).ok_or(PlayerError::VideoNotFound(Action::Play))?;
    if let Some(reason) = &video.flag {
      return Err(PlayerError::Flagged { action: Action::Play, reason: reason.clone() });
    }
    self.stop_current(out);
    self.start(video.clone(), out);
    Ok(())
  }

  /// Play a uniformly chosen unflagged video.
  ///
  /// Whatever is playing is stopped before the draw, so an empty candidate
  /// set still leaves the player idle.
  pub fn play_random<R: Rng + ?Sized>(
    &mut self,
    catalog: &VideoCatalog,
    rng: &mut R,
    out: &mut impl Sink,
  ) -> Result<()> {
    let candidates: Vec<&Video> = catalog.all().iter().filter(|v| !v.is_flagged()).collect();
    self.stop_current(out);
    let video = candidates.choose(rng).ok_or(PlayerError::NoVideosAvailable)?;
    self.start((*video).clone(), out);
    Ok(())
  }

  pub fn stop(&mut self, out: &mut impl Sink) -> Result<()> {
    if self.state.current().is_none() {
      return Err(PlayerError::NothingPlaying(Action::Stop));
    }
    self.stop_current(out);
    Ok(())
  }

  pub fn pause(&mut self, out: &mut impl Sink) -> Result<()> {
    let video = match &self.state {
      PlaybackState::Idle => return Err(PlayerError::NothingPlaying(Action::Pause)),
      PlaybackState::Paused(video) => return Err(PlayerError::AlreadyPaused(video.title.clone())),
      PlaybackState::Playing(video) => video.clone(),
    };
    info!(video_id = %video.id, "playback: paused");
    out.emit(format!("Pausing video: {}", video.title));
    self.state = PlaybackState::Paused(video);
    Ok(())
  }

  pub fn resume(&mut self, out: &mut impl Sink) -> Result<()> {
    let video = match &self.state {
      PlaybackState::Idle => return Err(PlayerError::NothingPlaying(Action::Continue)),
      PlaybackState::Playing(_) => return Err(PlayerError::NotPaused),
      PlaybackState::Paused(video) => video.clone(),
    };
    info!(video_id = %video.id, "playback: resumed");
    out.emit(format!("Continuing video: {}", video.title));
    self.state = PlaybackState::Playing(video);
    Ok(())
  }

  pub fn show_current(&self, out: &mut impl Sink) {
    let Some(video) = self.state.current() else {
      out.emit("No video is currently playing".to_string());
      return;
    };
    let suffix = if self.state.is_paused() { " - PAUSED" } else { "" };
    out.emit(format!("Currently playing: {}{}", video, suffix));
  }

  /// Unflagged videos whose title contains `term`, ignoring case.
  pub fn search(&self, catalog: &VideoCatalog, term: &str, out: &mut impl Sink) -> Result<Vec<Video>> {
    let needle = term.to_lowercase();
    let matches =
      catalog.all().iter().filter(|v| !v.is_flagged() && v.title.to_lowercase().contains(&needle)).cloned().collect();
    present_results(term, matches, out)
  }

  /// Unflagged videos carrying `tag` exactly (ignoring case). Tags start with `#`.
  pub fn search_by_tag(&self, catalog: &VideoCatalog, tag: &str, out: &mut impl Sink) -> Result<Vec<Video>> {
    let matches = if tag.starts_with('#') {
      catalog.all().iter().filter(|v| !v.is_flagged() && v.has_tag(tag)).cloned().collect()
    } else {
      Vec::new()
    };
    present_results(tag, matches, out)
  }

  pub fn flag_video(
    &mut self,
    catalog: &mut VideoCatalog,
    video_id: &str,
    reason: Option<&str>,
    out: &mut impl Sink,
  ) -> Result<()> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty()).unwrap_or(&constants().default_flag_reason);
    let video = catalog.get_mut(video_id).ok_or(PlayerError::VideoNotFound(Action::Flag))?;
    if video.is_flagged() {
      return Err(PlayerError::AlreadyFlagged);
    }
    video.flag = Some(reason.to_string());
    let title = video.title.clone();

    if self.state.current().is_some_and(|v| v.id == video_id) {
      self.stop_current(out);
    }
    info!(video_id, reason, "moderation: flagged");
    out.emit(format!("Successfully flagged video: {} - reason: {}", title, reason));
    Ok(())
  }

  pub fn allow_video(&mut self, catalog: &mut VideoCatalog, video_id: &str, out: &mut impl Sink) -> Result<()> {
    let video = catalog.get_mut(video_id).ok_or(PlayerError::VideoNotFound(Action::Allow))?;
    if video.flag.take().is_none() {
      return Err(PlayerError::NotFlagged);
    }
    info!(video_id, "moderation: flag removed");
    out.emit(format!("Successfully removed flag from video: {}", video.title));
    Ok(())
  }

  fn start(&mut self, video: Video, out: &mut impl Sink) {
    info!(video_id = %video.id, "playback: playing");
    out.emit(format!("Playing video: {}", video.title));
    self.state = PlaybackState::Playing(video);
  }

  fn stop_current(&mut self, out: &mut impl Sink) {
    if let Some(video) = self.state.current() {
      info!(video_id = %video.id, "playback: stopped");
      out.emit(format!("Stopping video: {}", video.title));
      self.state = PlaybackState::Idle;
    }
  }
}

/// Sort matches by title and emit them as a numbered list.
fn present_results(query: &str, mut matches: Vec<Video>, out: &mut impl Sink) -> Result<Vec<Video>> {
  if matches.is_empty() {
    return Err(PlayerError::NoSearchResults(query.to_string()));
  }
  matches.sort_by(|a, b| a.title.cmp(&b.title));
  out.emit(format!("Here are the results for {}:", query));
  for (i, video) in matches.iter().enumerate() {
    out.emit(format!("  {}) {}", i + 1, video));
  }
  Ok(matches)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn example_catalog() -> VideoCatalog {
    VideoCatalog::from_videos(vec![
      Video::new("dog1", "Funny Dogs", &["#dog"]).flagged("Trust"),
      Video::new("cat1", "Amazing Cats", &["#cat", "#animal"]),
    ])
    .unwrap()
  }

  fn library() -> VideoCatalog {
    VideoCatalog::builtin().unwrap()
  }

  // --- listing ---

  #[test]
  fn list_all_videos_sorted_with_flag_suffix() {
    let controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    let listing = controller.list_all_videos(&example_catalog(), &mut out);
    assert_eq!(listing, vec!["Amazing Cats (cat1) [#cat #animal]", "Funny Dogs (dog1) [#dog] - FLAGGED Trust"]);
    assert_eq!(out[0], "Here's a list of all available videos:");
    assert_eq!(out[1..], listing[..]);
  }

  #[test]
  fn list_all_videos_builtin_order() {
    let mut out: Vec<String> = Vec::new();
    let listing = PlaybackController::new().list_all_videos(&library(), &mut out);
    assert_eq!(
      listing,
      vec![
        "Amazing Cats (amazing_cats_video_id) [#cat #animal]",
        "Another Cat Video (another_cat_video_id) [#cat #animal]",
        "Funny Dogs (funny_dogs_video_id) [#dog #animal]",
        "Life at Google (life_at_google_video_id) [#google #career]",
        "Video about nothing (nothing_video_id) []",
      ]
    );
  }

  // --- play / stop ---

  #[test]
  fn play_then_show_current() {
    let catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "amazing_cats_video_id", &mut out).unwrap();
    controller.show_current(&mut out);
    assert_eq!(
      out,
      vec!["Playing video: Amazing Cats", "Currently playing: Amazing Cats (amazing_cats_video_id) [#cat #animal]"]
    );
    assert!(!controller.state().is_paused());
  }

  #[test]
  fn play_flagged_video_is_rejected() {
    let catalog = example_catalog();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    let err = controller.play(&catalog, "dog1", &mut out).unwrap_err();
    assert_eq!(err.to_string(), "Cannot play video: Video is currently flagged Trust");
    assert_eq!(controller.state(), &PlaybackState::Idle);
    assert!(out.is_empty());
  }

  #[test]
  fn play_flagged_keeps_current_video() {
    let catalog = example_catalog();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "cat1", &mut out).unwrap();
    assert!(controller.play(&catalog, "dog1", &mut out).is_err());
    assert_eq!(controller.state().current().map(|v| v.id.as_str()), Some("cat1"));
  }

  #[test]
  fn play_missing_video() {
    let mut controller = PlaybackController::new();
    let err = controller.play(&library(), "does_not_exist", &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot play video: Video does not exist");
    assert_eq!(err.kind(), ErrorKind::NotFound);
  }

  #[test]
  fn play_another_video_stops_the_first() {
    let catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "amazing_cats_video_id", &mut out).unwrap();
    controller.pause(&mut out).unwrap();
    controller.play(&catalog, "funny_dogs_video_id", &mut out).unwrap();
    assert_eq!(
      out,
      vec![
        "Playing video: Amazing Cats",
        "Pausing video: Amazing Cats",
        "Stopping video: Amazing Cats",
        "Playing video: Funny Dogs",
      ]
    );
    assert!(!controller.state().is_paused());
  }

  #[test]
  fn stop_when_idle_and_when_playing() {
    let catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    let err = controller.stop(&mut out).unwrap_err();
    assert_eq!(err.to_string(), "Cannot stop video: No video is currently playing");

    controller.play(&catalog, "nothing_video_id", &mut out).unwrap();
    controller.stop(&mut out).unwrap();
    assert_eq!(out, vec!["Playing video: Video about nothing", "Stopping video: Video about nothing"]);
    assert_eq!(controller.state(), &PlaybackState::Idle);
  }

  #[test]
  fn same_title_videos_are_told_apart() {
    let catalog = VideoCatalog::from_videos(vec![
      Video::new("first", "Twin", &["#a"]),
      Video::new("second", "Twin", &["#b"]),
    ])
    .unwrap();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "second", &mut out).unwrap();
    controller.show_current(&mut out);
    assert_eq!(out.last().unwrap(), "Currently playing: Twin (second) [#b]");
    assert_eq!(controller.state().current().map(|v| v.id.as_str()), Some("second"));
  }

  // --- random ---

  #[test]
  fn play_random_only_picks_unflagged() {
    let catalog = example_catalog();
    let mut controller = PlaybackController::new();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
      controller.play_random(&catalog, &mut rng, &mut Vec::new()).unwrap();
      assert_eq!(controller.state().current().map(|v| v.id.as_str()), Some("cat1"));
    }
  }

  #[test]
  fn play_random_stops_current_first() {
    let catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "life_at_google_video_id", &mut out).unwrap();
    controller.play_random(&catalog, &mut StdRng::seed_from_u64(1), &mut out).unwrap();
    assert_eq!(out[1], "Stopping video: Life at Google");
    assert!(out[2].starts_with("Playing video: "));
    assert!(matches!(controller.state(), PlaybackState::Playing(_)));
  }

  #[test]
  fn play_random_with_everything_flagged() {
    let mut catalog = example_catalog();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "cat1", &mut out).unwrap();
    catalog.get_mut("cat1").unwrap().flag = Some("Spam".to_string());

    let err = controller.play_random(&catalog, &mut StdRng::seed_from_u64(3), &mut out).unwrap_err();
    assert_eq!(out, vec!["Playing video: Amazing Cats", "Stopping video: Amazing Cats"]);
    assert_eq!(err.to_string(), "No videos available");
    assert_eq!(err.kind(), ErrorKind::Empty);
    assert_eq!(controller.state(), &PlaybackState::Idle);
  }

  #[test]
  fn play_random_empty_catalog_when_idle() {
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    let err = controller.play_random(&VideoCatalog::default(), &mut StdRng::seed_from_u64(0), &mut out).unwrap_err();
    assert_eq!(err, PlayerError::NoVideosAvailable);
    assert!(out.is_empty());
  }

  // --- pause / resume ---

  #[test]
  fn pause_twice_reports_already_paused() {
    let catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "funny_dogs_video_id", &mut out).unwrap();
    controller.pause(&mut out).unwrap();
    let before = controller.state().clone();
    let err = controller.pause(&mut out).unwrap_err();
    assert_eq!(err.to_string(), "Video already paused: Funny Dogs");
    assert_eq!(controller.state(), &before);
    assert_eq!(out, vec!["Playing video: Funny Dogs", "Pausing video: Funny Dogs"]);
  }

  #[test]
  fn pause_when_idle() {
    let err = PlaybackController::new().pause(&mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot pause video: No video is currently playing");
  }

  #[test]
  fn resume_when_idle_or_not_paused() {
    let catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    let err = controller.resume(&mut out).unwrap_err();
    assert_eq!(err.to_string(), "Cannot continue video: No video is currently playing");

    controller.play(&catalog, "funny_dogs_video_id", &mut out).unwrap();
    let err = controller.resume(&mut out).unwrap_err();
    assert_eq!(err.to_string(), "Cannot continue video: Video is not paused");
    assert_eq!(err.kind(), ErrorKind::AlreadyInState);
  }

  #[test]
  fn pause_resume_show_current() {
    let catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "funny_dogs_video_id", &mut out).unwrap();
    controller.pause(&mut out).unwrap();
    controller.show_current(&mut out);
    controller.resume(&mut out).unwrap();
    controller.show_current(&mut out);
    assert_eq!(
      out[2..],
      [
        "Currently playing: Funny Dogs (funny_dogs_video_id) [#dog #animal] - PAUSED",
        "Continuing video: Funny Dogs",
        "Currently playing: Funny Dogs (funny_dogs_video_id) [#dog #animal]",
      ]
    );
  }

  #[test]
  fn show_current_when_idle() {
    let mut out: Vec<String> = Vec::new();
    PlaybackController::new().show_current(&mut out);
    assert_eq!(out, vec!["No video is currently playing"]);
  }

  // --- search ---

  #[test]
  fn search_is_case_insensitive_and_sorted() {
    let mut out: Vec<String> = Vec::new();
    let results = PlaybackController::new().search(&library(), "CAT", &mut out).unwrap();
    let ids: Vec<&str> = results.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["amazing_cats_video_id", "another_cat_video_id"]);
    assert_eq!(
      out,
      vec![
        "Here are the results for CAT:",
        "  1) Amazing Cats (amazing_cats_video_id) [#cat #animal]",
        "  2) Another Cat Video (another_cat_video_id) [#cat #animal]",
      ]
    );
  }

  #[test]
  fn search_skips_flagged_videos() {
    let err = PlaybackController::new().search(&example_catalog(), "dogs", &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "No search results for dogs");
  }

  #[test]
  fn search_by_tag_matches_whole_tags() {
    let controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    let results = controller.search_by_tag(&library(), "#ANIMAL", &mut out).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(out[0], "Here are the results for #ANIMAL:");
    assert_eq!(out[3], "  3) Funny Dogs (funny_dogs_video_id) [#dog #animal]");

    let err = controller.search_by_tag(&library(), "#anim", &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "No search results for #anim");
  }

  #[test]
  fn search_by_tag_requires_hash() {
    let err = PlaybackController::new().search_by_tag(&library(), "cat", &mut Vec::new()).unwrap_err();
    assert_eq!(err, PlayerError::NoSearchResults("cat".to_string()));
  }

  #[test]
  fn search_by_tag_skips_flagged_videos() {
    let err = PlaybackController::new().search_by_tag(&example_catalog(), "#dog", &mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Empty);
  }

  // --- moderation ---

  #[test]
  fn flag_video_with_default_reason() {
    let mut catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.flag_video(&mut catalog, "funny_dogs_video_id", None, &mut out).unwrap();
    assert_eq!(out, vec!["Successfully flagged video: Funny Dogs - reason: Not supplied"]);
    assert_eq!(catalog.get("funny_dogs_video_id").unwrap().flag.as_deref(), Some("Not supplied"));

    let err = controller.play(&catalog, "funny_dogs_video_id", &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot play video: Video is currently flagged Not supplied");
  }

  #[test]
  fn flag_playing_video_stops_it() {
    let mut catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "amazing_cats_video_id", &mut out).unwrap();
    controller.pause(&mut out).unwrap();
    controller.flag_video(&mut catalog, "amazing_cats_video_id", Some("dont_like_cats"), &mut out).unwrap();
    assert_eq!(
      out[2..],
      ["Stopping video: Amazing Cats", "Successfully flagged video: Amazing Cats - reason: dont_like_cats"]
    );
    assert_eq!(controller.state(), &PlaybackState::Idle);
  }

  #[test]
  fn flag_other_video_keeps_playing() {
    let mut catalog = library();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.play(&catalog, "amazing_cats_video_id", &mut out).unwrap();
    controller.flag_video(&mut catalog, "funny_dogs_video_id", Some("x"), &mut out).unwrap();
    assert_eq!(controller.state().current().map(|v| v.id.as_str()), Some("amazing_cats_video_id"));
  }

  #[test]
  fn flag_twice_or_missing() {
    let mut catalog = library();
    let mut controller = PlaybackController::new();
    controller.flag_video(&mut catalog, "nothing_video_id", Some("boring"), &mut Vec::new()).unwrap();
    let err = controller.flag_video(&mut catalog, "nothing_video_id", Some("again"), &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot flag video: Video is already flagged");
    assert_eq!(catalog.get("nothing_video_id").unwrap().flag.as_deref(), Some("boring"));

    let err = controller.flag_video(&mut catalog, "missing", None, &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot flag video: Video does not exist");
  }

  #[test]
  fn allow_video_clears_flag() {
    let mut catalog = example_catalog();
    let mut controller = PlaybackController::new();
    let mut out: Vec<String> = Vec::new();
    controller.allow_video(&mut catalog, "dog1", &mut out).unwrap();
    assert_eq!(out, vec!["Successfully removed flag from video: Funny Dogs"]);
    controller.play(&catalog, "dog1", &mut out).unwrap();
    assert_eq!(out.last().unwrap(), "Playing video: Funny Dogs");
  }

  #[test]
  fn allow_unflagged_or_missing() {
    let mut catalog = example_catalog();
    let mut controller = PlaybackController::new();
    let err = controller.allow_video(&mut catalog, "cat1", &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot remove flag from video: Video is not flagged");
    let err = controller.allow_video(&mut catalog, "nope", &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot remove flag from video: Video does not exist");
  }
}
