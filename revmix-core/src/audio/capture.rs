use thiserror::Error;

use super::Sample;

/// The shape of captured audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    /// The rate of samples per second
    pub sample_rate: usize,
    /// The number of channels in the audio stream
    pub channel_count: usize,
}

impl CaptureFormat {
    /// How many samples exist in a second
    pub fn samples_per_sec(&self) -> usize {
        self.sample_rate * self.channel_count
    }

    /// Returns the number of samples for any given number of seconds
    pub fn seconds_to_samples(&self, seconds: f32) -> usize {
        (seconds * self.samples_per_sec() as f32) as usize
    }

    /// Returns the number of seconds for any given number of samples
    pub fn samples_to_seconds(&self, samples: usize) -> f32 {
        (samples as f32) / self.samples_per_sec() as f32
    }
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self {
            // The rate microphones are asked for
            sample_rate: 44100,
            // A voice is mono
            channel_count: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Microphone access required: {0}")]
    Unavailable(String),
    #[error("The audio input is already in use")]
    Busy,
    #[error("The audio input is not open")]
    NotOpen,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An exclusive audio input, such as a microphone.
///
/// Opening a device acquires the input, closing it releases it again.
pub trait CaptureDevice
where
    Self: Send,
{
    /// Acquires the input so samples can be read in the given format.
    fn open(&mut self, format: CaptureFormat) -> Result<(), CaptureError>;

    /// Reads captured samples into the buffer, returning how many were read.
    /// Returning 0 means the input has no more audio to give.
    ///
    /// Note: This is potentially a blocking operation.
    fn read(&mut self, buf: &mut [Sample]) -> Result<usize, CaptureError>;

    /// Releases the input.
    fn close(&mut self);
}
