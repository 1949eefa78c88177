mod capture;
mod encoder;
mod recorder;

pub use capture::*;
pub use encoder::*;
pub use recorder::*;

use base64::{engine::general_purpose::STANDARD, DecodeError, Engine};

/// A single audio sample
pub type Sample = f32;

/// A playable piece of encoded audio, ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    /// The content type of the bytes, e.g. `audio/wav`
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl AudioBlob {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Decodes a blob from base64, as the backend hands it out
    pub fn from_base64(mime: impl Into<String>, encoded: &str) -> Result<Self, DecodeError> {
        Ok(Self::new(mime, STANDARD.decode(encoded)?))
    }

    /// Encodes the audio as plain base64, without a data URL prefix
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
