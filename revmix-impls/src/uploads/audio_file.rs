use std::path::Path;

use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use revmix_core::AudioBlob;
use thiserror::Error;
use tokio::fs;

lazy_static! {
    static ref EXTENSION_REGEX: Regex = Regex::new(r"^(.+?)(\.[a-zA-Z0-9]+)?$").unwrap();
}

/// Extensions accepted as audio, and the content type they are sent as
const AUDIO_TYPES: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("wave", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("webm", "audio/webm"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("flac", "audio/flac"),
];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select an audio file")]
    NotAudio,
    #[error("File size must be less than {}MB", .0 / (1024 * 1024))]
    TooLarge(u64),
    #[error("Could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// An audio file picked by the user, read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    /// The file name without its extension
    pub name: String,
    pub blob: AudioBlob,
}

impl AudioFile {
    /// Reads an audio file, refusing anything that isn't audio or is larger than `max_size` bytes.
    pub async fn load(path: impl AsRef<Path>, max_size: u64) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let mime = mime_for(path).ok_or(UploadError::NotAudio)?;

        let size = fs::metadata(path).await?.len();
        if size > max_size {
            return Err(UploadError::TooLarge(max_size));
        }

        let bytes = fs::read(path).await?;
        let name = display_name(path);

        info!("Loaded {} ({}, {} bytes)", name, mime, bytes.len());

        Ok(Self {
            name,
            blob: AudioBlob::new(mime, bytes),
        })
    }
}

/// Returns the content type of the file if its extension is a known audio type
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();

    AUDIO_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

fn display_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    EXTENSION_REGEX
        .captures(&file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or(file_name)
}

#[cfg(test)]
mod test {
    use std::{io::Write, path::Path};

    use assert_matches::assert_matches;
    use tempfile::Builder;

    use super::{display_name, mime_for, AudioFile, UploadError};

    #[test]
    fn audio_is_recognized_by_extension() {
        assert_eq!(mime_for(Path::new("verse.MP3")), Some("audio/mpeg"));
        assert_eq!(mime_for(Path::new("beat.wav")), Some("audio/wav"));
        assert_eq!(mime_for(Path::new("notes.txt")), None);
        assert_eq!(mime_for(Path::new("README")), None);
    }

    #[test]
    fn names_lose_only_their_last_extension() {
        assert_eq!(display_name(Path::new("/tmp/air.horn.wav")), "air.horn");
        assert_eq!(display_name(Path::new("scratch.mp3")), "scratch");
    }

    #[tokio::test]
    async fn files_are_read_into_blobs() {
        let mut file = Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(b"RIFF").unwrap();

        let audio = AudioFile::load(file.path(), 1024).await.unwrap();
        assert_eq!(audio.blob.mime, "audio/wav");
        assert_eq!(audio.blob.bytes, b"RIFF");
    }

    #[tokio::test]
    async fn large_and_non_audio_files_are_refused() {
        let mut file = Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(&[0; 64]).unwrap();

        let error = AudioFile::load(file.path(), 32)
            .await
            .unwrap_err();
        assert_matches!(error, UploadError::TooLarge(32));

        let error = AudioFile::load("lyrics.txt", 1024).await.unwrap_err();
        assert_matches!(error, UploadError::NotAudio);
        assert_eq!(error.to_string(), "Please select an audio file");
        assert_eq!(
            UploadError::TooLarge(10 * 1024 * 1024).to_string(),
            "File size must be less than 10MB"
        );
    }
}
