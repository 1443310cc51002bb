use std::str::FromStr;

/// One line of shell input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  NumberOfVideos,
  ShowAllVideos,
  Play(String),
  PlayRandom,
  Stop,
  Pause,
  Continue,
  ShowPlaying,
  CreatePlaylist(String),
  AddToPlaylist { playlist: String, video_id: String },
  RemoveFromPlaylist { playlist: String, video_id: String },
  ClearPlaylist(String),
  DeletePlaylist(String),
  ShowAllPlaylists,
  ShowPlaylist(String),
  SearchVideos(String),
  SearchVideosWithTag(String),
  FlagVideo { video_id: String, reason: Option<String> },
  AllowVideo(String),
  Help,
  Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please enter a valid command, type HELP for a list of available commands.")]
pub struct InvalidCommand;

const HELP: &[&str] = &[
  "Available commands:",
  "    ADD_TO_PLAYLIST <playlist_name> <video_id> - Adds a video to a playlist with a given name.",
  "    ALLOW_VIDEO <video_id> - Removes a flag from a video with the given id.",
  "    CLEAR_PLAYLIST <playlist_name> - Removes all videos from a playlist with a given name.",
  "    CONTINUE - Resumes playing the current video.",
  "    CREATE_PLAYLIST <playlist_name> - Creates a new (empty) playlist with the provided name.",
  "    DELETE_PLAYLIST <playlist_name> - Deletes the playlist with the given name.",
  "    EXIT - Terminates the program execution.",
  "    FLAG_VIDEO <video_id> <flag_reason> - Mark a video as flagged.",
  "    HELP - Displays help.",
  "    NUMBER_OF_VIDEOS - Shows how many videos are in the library.",
  "    PAUSE - Pauses the current video.",
  "    PLAY <video_id> - Plays specified video.",
  "    PLAY_RANDOM - Plays a random video from the library.",
  "    REMOVE_FROM_PLAYLIST <playlist_name> <video_id> - Removes the specified video from the specified playlist",
  "    SEARCH_VIDEOS <search_term> - Display all the videos whose titles contain the search_term.",
  "    SEARCH_VIDEOS_WITH_TAG <tag_name> - Display all videos whose tags contains the provided tag.",
  "    SHOW_ALL_PLAYLISTS - Display all the available playlists.",
  "    SHOW_ALL_VIDEOS - Lists all videos from the library.",
  "    SHOW_PLAYING - Displays the title, id and paused status of the video that is currently playing (or paused).",
  "    SHOW_PLAYLIST <playlist_name> - Displays videos in a playlist with a given name.",
  "    STOP - Stops the current video.",
];

pub fn help_lines() -> &'static [&'static str] {
  HELP
}

impl FromStr for Command {
  type Err = InvalidCommand;

  /// Command words are case-insensitive; arguments are whitespace-separated.
  fn from_str(line: &str) -> Result<Self, Self::Err> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let one = |f: fn(String) -> Command| match args.as_slice() {
      [arg] => Ok(f(arg.to_string())),
      _ => Err(InvalidCommand),
    };
    let none = |cmd: Command| if args.is_empty() { Ok(cmd) } else { Err(InvalidCommand) };
    // Everything after the command word, kept as typed.
    let verbatim =
      |f: fn(String) -> Command| if rest.is_empty() { Err(InvalidCommand) } else { Ok(f(rest.to_string())) };

    match word.to_uppercase().as_str() {
      "NUMBER_OF_VIDEOS" => none(Command::NumberOfVideos),
      "SHOW_ALL_VIDEOS" => none(Command::ShowAllVideos),
      "PLAY" => one(Command::Play),
      "PLAY_RANDOM" => none(Command::PlayRandom),
      "STOP" => none(Command::Stop),
      "PAUSE" => none(Command::Pause),
      "CONTINUE" => none(Command::Continue),
      "SHOW_PLAYING" => none(Command::ShowPlaying),
      "CREATE_PLAYLIST" => verbatim(Command::CreatePlaylist),
      "ADD_TO_PLAYLIST" | "REMOVE_FROM_PLAYLIST" => {
        let [playlist, video_id] = args.as_slice() else { return Err(InvalidCommand) };
        let (playlist, video_id) = (playlist.to_string(), video_id.to_string());
        if word.eq_ignore_ascii_case("ADD_TO_PLAYLIST") {
          Ok(Command::AddToPlaylist { playlist, video_id })
        } else {
          Ok(Command::RemoveFromPlaylist { playlist, video_id })
        }
      }
      "CLEAR_PLAYLIST" => one(Command::ClearPlaylist),
      "DELETE_PLAYLIST" => one(Command::DeletePlaylist),
      "SHOW_ALL_PLAYLISTS" => none(Command::ShowAllPlaylists),
      "SHOW_PLAYLIST" => one(Command::ShowPlaylist),
      "SEARCH_VIDEOS" => verbatim(Command::SearchVideos),
      "SEARCH_VIDEOS_WITH_TAG" => one(Command::SearchVideosWithTag),
      "FLAG_VIDEO" => {
        if rest.is_empty() {
          return Err(InvalidCommand);
        }
        let (video_id, reason) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let reason = Some(reason.trim()).filter(|r| !r.is_empty()).map(str::to_string);
        Ok(Command::FlagVideo { video_id: video_id.to_string(), reason })
      }
      "ALLOW_VIDEO" => one(Command::AllowVideo),
      "HELP" => none(Command::Help),
      "EXIT" => none(Command::Exit),
      _ => Err(InvalidCommand),
    }
  }
}

/// Interpret the answer to "which result do you want to play?".
///
/// Returns the zero-based index of a 1-based choice; anything that is not a
/// number in `1..=count` means no selection.
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
  let choice: usize = input.trim().parse().ok()?;
  (1..=count).contains(&choice).then(|| choice - 1)
}
