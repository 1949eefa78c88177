use std::{env, path::PathBuf, time::Duration};

use log::debug;

use crate::CaptureFormat;

/// The backend the client talks to when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// The file name of the persisted session, the equivalent of a local storage key.
pub const SESSION_FILE_NAME: &str = "revmix_session.json";

/// The configuration of the client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend, without the `/api` prefix
    pub backend_url: String,
    /// Where the session blob is persisted
    pub session_path: PathBuf,
    /// How often the home feed is refreshed
    pub feed_poll_interval: Duration,
    /// How often an open battle room is refreshed
    pub room_poll_interval: Duration,
    /// The longest a single recording may run, in seconds
    pub max_recording_duration: u32,
    /// Uploads larger than this are refused, in bytes
    pub max_upload_size: u64,
    /// The duration reported for a single uploaded performance, in seconds
    pub upload_duration: f64,
    /// The duration given to clips uploaded into the timeline library, in seconds
    pub custom_clip_duration: f64,
    /// How far apart clips are positioned on the timeline, in seconds
    pub timeline_spacing: f64,
    /// How often the timeline preview advances
    pub preview_tick: Duration,
    /// How many seconds of progress a preview tick represents
    pub preview_step: f64,
    /// The format microphone audio is captured in
    pub capture_format: CaptureFormat,
}

impl Config {
    /// Loads the configuration from the environment, reading a `.env` file first if one exists.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::default();

        if let Ok(url) = env::var("REVMIX_BACKEND_URL") {
            config.backend_url = url;
        }

        if let Ok(path) = env::var("REVMIX_SESSION_PATH") {
            config.session_path = path.into();
        }

        config
    }

    /// Returns the backend url with the given override applied
    pub fn with_backend_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.backend_url = url;
        }

        self
    }

    /// Returns the config with the given session path override applied
    pub fn with_session_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.session_path = path;
        }

        self
    }

    /// How many samples the longest allowed recording holds
    pub fn max_recording_samples(&self) -> usize {
        self.capture_format
            .seconds_to_samples(self.max_recording_duration as f32)
    }
}

impl Default for Config {
    fn default() -> Self {
        let session_path = dirs::data_local_dir()
            .map(|dir| dir.join("revmix").join(SESSION_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SESSION_FILE_NAME));

        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            session_path,
            feed_poll_interval: Duration::from_secs(10),
            room_poll_interval: Duration::from_secs(5),
            max_recording_duration: 120,
            max_upload_size: 10 * 1024 * 1024,
            upload_duration: 60.,
            custom_clip_duration: 10.,
            timeline_spacing: 2.,
            preview_tick: Duration::from_millis(100),
            preview_step: 0.1,
            capture_format: CaptureFormat::default(),
        }
    }
}
