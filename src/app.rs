use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::BufRead;
use tracing::{debug, info};

use crate::catalog::{Video, VideoCatalog};
use crate::command::{self, Command, InvalidCommand};
use crate::constants::constants;
use crate::error::PlayerError;
use crate::output::Sink;
use crate::player::PlaybackController;
use crate::playlist::PlaylistStore;

/// One interactive session: the catalog plus everything the user has done to it.
pub struct App {
  pub catalog: VideoCatalog,
  pub player: PlaybackController,
  pub playlists: PlaylistStore,
  pub should_quit: bool,
  rng: StdRng,
}

impl App {
  pub fn new(catalog: VideoCatalog, seed: Option<u64>) -> Self {
    let rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    Self {
      catalog,
      player: PlaybackController::new(),
      playlists: PlaylistStore::new(),
      should_quit: false,
      rng,
    }
  }

  /// Parse and run one input line. Invalid input is reported, not returned.
  pub fn handle_line(&mut self, line: &str, out: &mut impl Sink, input: &mut impl BufRead) -> Result<()> {
    match line.parse::<Command>() {
      Ok(cmd) => self.execute(cmd, out, input),
      Err(e @ InvalidCommand) => {
        debug!(line, "command: invalid");
        out.emit(e.to_string());
        Ok(())
      }
    }
  }

  /// Run a command, writing its output and any failure line to `out`.
  ///
  /// `input` is only read after a search, for the "play one of these?" answer.
  pub fn execute(&mut self, cmd: Command, out: &mut impl Sink, input: &mut impl BufRead) -> Result<()> {
    debug!(?cmd, "command: executing");
    let result = match cmd {
      Command::NumberOfVideos => {
        out.emit(format!("{} videos in the library", self.catalog.len()));
        Ok(())
      }
      Command::ShowAllVideos => {
        self.player.list_all_videos(&self.catalog, out);
        Ok(())
      }
      Command::Play(video_id) => self.player.play(&self.catalog, &video_id, out),
      Command::PlayRandom => self.player.play_random(&self.catalog, &mut self.rng, out),
      Command::Stop => self.player.stop(out),
      Command::Pause => self.player.pause(out),
      Command::Continue => self.player.resume(out),
      Command::ShowPlaying => {
        self.player.show_current(out);
        Ok(())
      }
      Command::CreatePlaylist(name) => self.playlists.create(&name, out),
      Command::AddToPlaylist { playlist, video_id } => {
        self.playlists.add_video(&self.catalog, &playlist, &video_id, out)
      }
      Command::RemoveFromPlaylist { playlist, video_id } => {
        self.playlists.remove_video(&self.catalog, &playlist, &video_id, out)
      }
      Command::ClearPlaylist(name) => self.playlists.clear(&name, out),
      Command::DeletePlaylist(name) => self.playlists.delete(&name, out),
      Command::ShowAllPlaylists => {
        self.playlists.list_all(out);
        Ok(())
      }
      Command::ShowPlaylist(name) => self.playlists.show(&self.catalog, &name, out),
      Command::SearchVideos(term) => match self.player.search(&self.catalog, &term, out) {
        Ok(results) => self.offer_selection(&results, out, input)?,
        Err(e) => Err(e),
      },
      Command::SearchVideosWithTag(tag) => match self.player.search_by_tag(&self.catalog, &tag, out) {
        Ok(results) => self.offer_selection(&results, out, input)?,
        Err(e) => Err(e),
      },
      Command::FlagVideo { video_id, reason } => {
        self.player.flag_video(&mut self.catalog, &video_id, reason.as_deref(), out)
      }
      Command::AllowVideo(video_id) => self.player.allow_video(&mut self.catalog, &video_id, out),
      Command::Help => {
        for line in command::help_lines() {
          out.emit(line.to_string());
        }
        Ok(())
      }
      Command::Exit => {
        info!("session: exit requested");
        self.should_quit = true;
        Ok(())
      }
    };
    self.report(result, out);
    debug!(now_playing = ?self.player.state().current().map(|v| v.id.as_str()), "command: done");
    Ok(())
  }

  /// Ask which search result to play and play it. A non-answer plays nothing.
  ///
  /// The outer error is an input failure; the inner result is the play attempt.
  fn offer_selection(
    &mut self,
    results: &[Video],
    out: &mut impl Sink,
    input: &mut impl BufRead,
  ) -> Result<Result<(), PlayerError>> {
    out.emit("Would you like to play any of the above? If yes, specify the number of the video.".to_string());
    out.emit("If your answer is not a valid number, we will assume it's a no.".to_string());

    let mut answer = String::new();
    input.read_line(&mut answer).context("Failed to read search selection")?;
    let Some(idx) = command::parse_selection(&answer, results.len()) else {
      debug!(answer = answer.trim(), "search: no selection");
      return Ok(Ok(()));
    };
    Ok(self.player.play(&self.catalog, &results[idx].id, out))
  }

  fn report(&self, result: Result<(), PlayerError>, out: &mut impl Sink) {
    if let Err(e) = result {
      debug!(kind = ?e.kind(), "command: rejected");
      out.emit(e.to_string());
    }
  }

  /// Read-eval-print loop until EXIT or end of input.
  pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Sink) -> Result<()> {
    for line in &constants().greeting {
      out.emit(line.clone());
    }
    while !self.should_quit {
      out.prompt(&constants().prompt).context("Failed to write prompt")?;
      let mut line = String::new();
      let read = input.read_line(&mut line).context("Failed to read command")?;
      if read == 0 {
        info!("session: end of input");
        break;
      }
      if line.trim().is_empty() {
        continue;
      }
      self.handle_line(&line, out, input)?;
    }
    out.emit(constants().farewell.clone());
    Ok(())
  }
}
