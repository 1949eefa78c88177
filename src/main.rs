use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::{error, info};
use revmix_collab::{Collab, CollabError, EventReceiver, FileSessionStore, SessionStore};
use revmix_core::{Config, RecorderError, RoomKind, TimelineError};
use revmix_impls::UploadError;
use thiserror::Error;
use tokio::runtime::{self, Runtime};

mod commands;
mod logging;
mod record;
mod render;

#[derive(Parser)]
#[command(name = "revmix")]
#[command(about = "Record, submit, and judge rap battles on RevMix", long_about = None)]
struct Cli {
    /// Base URL of the backend, overrides REVMIX_BACKEND_URL
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Where the session is stored, overrides REVMIX_SESSION_PATH
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with an existing account
    Login {
        username: String,

        #[arg(short, long, env = "REVMIX_PASSWORD")]
        password: String,
    },

    /// Create an account and sign in with it
    Register {
        username: String,
        email: String,

        #[arg(short, long, env = "REVMIX_PASSWORD")]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List open battle rooms and challenges
    Feed {
        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,
    },

    /// Show a battle room, its performances, and the live rankings
    Room {
        room_id: String,

        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,
    },

    /// Join a battle room as a participant
    Join { room_id: String },

    /// Show the announced results of a battle room
    Results { room_id: String },

    /// Close a battle room you host
    Close { room_id: String },

    /// Create a battle room and enter it
    CreateRoom {
        #[arg(short, long)]
        name: String,

        /// What the performers should rap about
        #[arg(short, long)]
        prompt: String,

        #[arg(short, long, value_enum, default_value = "challenge")]
        kind: RoomKindArg,

        /// Seconds each performer gets
        #[arg(short, long, default_value = "300")]
        timer: u32,

        #[arg(short, long, default_value = "8")]
        max_participants: u32,
    },

    /// Submit a performance to a battle room
    #[command(group(clap::ArgGroup::new("source").required(true).args(["record", "upload", "timeline"])))]
    Submit {
        room_id: String,

        /// Record s16le PCM piped into stdin, e.g. `arecord -f S16_LE -r 44100 -c 1 |`
        #[arg(long)]
        record: bool,

        /// Submit an audio file
        #[arg(long, value_name = "FILE")]
        upload: Option<PathBuf>,

        /// Compose a timeline from clip names or audio files, in order
        #[arg(long, value_name = "CLIP", num_args = 1..)]
        timeline: Vec<String>,
    },

    /// Judge a performance, every score from 1 to 10
    Vote {
        room_id: String,
        performance_id: String,

        #[arg(long, default_value = "5")]
        flow: u8,

        #[arg(long, default_value = "5")]
        lyrics: u8,

        #[arg(long, default_value = "5")]
        creativity: u8,
    },

    /// Play back a timeline without submitting it
    Preview {
        /// Clip names or audio files, in order
        #[arg(required = true)]
        clips: Vec<String>,
    },

    /// List the clips a timeline can be composed from
    Effects,

    /// Add an audio file to the clip catalog
    AddEffect { file: PathBuf },

    /// Show the global leaderboard
    Leaderboard {
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show a user's profile, your own if no user is given
    Profile { user_id: Option<String> },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoomKindArg {
    Challenge,
    Collab,
    Solo,
}

impl From<RoomKindArg> for RoomKind {
    fn from(kind: RoomKindArg) -> Self {
        match kind {
            RoomKindArg::Challenge => RoomKind::Challenge,
            RoomKindArg::Collab => RoomKind::Collab,
            RoomKindArg::Solo => RoomKind::Solo,
        }
    }
}

pub struct RevMix {
    collab: Collab,
    events: EventReceiver,
    runtime: Runtime,
}

#[derive(Debug, Error)]
pub enum RevMixError {
    #[error("{}", .0.alert())]
    Collab(#[from] CollabError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error("You are not signed in")]
    SignedOut,

    #[error("No clip named \"{0}\" and no such audio file")]
    UnknownClip(String),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl RevMix {
    fn new(config: Config) -> Result<Self, RevMixError> {
        let runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("revmix-async")
            .build()
            .map_err(|e| RevMixError::Fatal(e.to_string()))?;

        info!("Using backend at {}", config.backend_url);

        let store = FileSessionStore::new(&config.session_path).boxed();
        let (collab, events) = Collab::new(config, store)?;

        Ok(Self {
            collab,
            events,
            runtime,
        })
    }

    fn run(&self, command: Command) -> Result<(), RevMixError> {
        self.runtime
            .block_on(commands::run(&self.collab, &self.events, command))
    }
}

impl RevMixError {
    fn hint(&self) -> String {
        match self {
            RevMixError::Collab(e) if e.is_unauthorized() => "Your session has expired. Sign in again with `revmix login`.".to_string(),
            RevMixError::Collab(CollabError::Api(e)) if e.is_network() => "Make sure the backend is running and --backend points at it.".to_string(),
            RevMixError::Collab(_) => "The backend refused the request. Check the message above.".to_string(),
            RevMixError::Upload(_) => "Pick an audio file such as .wav, .mp3, or .ogg within the size limit.".to_string(),
            RevMixError::Recorder(_) => "Pipe raw s16le PCM into stdin, for example from `arecord -f S16_LE -r 44100 -c 1`.".to_string(),
            RevMixError::Timeline(_) => "Pass at least one clip. List the available clips with `revmix effects`.".to_string(),
            RevMixError::SignedOut => "Sign in with `revmix login` or create an account with `revmix register`.".to_string(),
            RevMixError::UnknownClip(_) => "List the available clips with `revmix effects`.".to_string(),
            RevMixError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let config = Config::from_env()
        .with_backend_url(cli.backend)
        .with_session_path(cli.session);

    match RevMix::new(config).and_then(|revmix| revmix.run(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{}", "RevMix could not finish the command.".bold().red());
            error!("{}", error);
            error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());

            ExitCode::FAILURE
        }
    }
}
