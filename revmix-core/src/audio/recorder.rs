use std::marker::PhantomData;

use log::{info, warn};
use thiserror::Error;

use super::{AudioBlob, CaptureDevice, CaptureError, CaptureFormat, Encoder, Sample};

/// How many samples are read from the device at a time
const READ_CHUNK_SIZE: usize = 4096;

/// Captures audio from a [CaptureDevice] and encodes it into a playable [AudioBlob].
///
/// A recorder owns exactly one device, so there can never be two recordings active at once.
pub struct Recorder<D, E> {
    device: D,
    format: CaptureFormat,
    /// The longest a recording may run, in seconds
    max_duration: u32,
    state: RecorderState,
    samples: Vec<Sample>,
    encoder: PhantomData<E>,
}

#[derive(Debug, Clone, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
    Recorded(RecordedAudio),
}

/// A finished recording
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAudio {
    pub blob: AudioBlob,
    /// The length of the recording in whole seconds
    pub duration: u32,
}

/// What happened after pumping samples from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderProgress {
    Recording { elapsed: u32 },
    /// The recording stopped by itself, either because the limit was reached or the input ended
    Finished { duration: u32 },
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("A recording is already in progress")]
    AlreadyRecording,
    #[error("Nothing is being recorded")]
    NotRecording,
    #[error("The maximum recording length has been reached, clear the recording first")]
    LimitReached,
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl<D, E> Recorder<D, E>
where
    D: CaptureDevice,
    E: Encoder,
{
    pub fn new(device: D, format: CaptureFormat, max_duration: u32) -> Self {
        Self {
            device,
            format,
            max_duration,
            state: Default::default(),
            samples: Default::default(),
            encoder: PhantomData,
        }
    }

    /// Acquires the device and starts a new recording, discarding any previous one.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        match &self.state {
            RecorderState::Recording => return Err(RecorderError::AlreadyRecording),
            RecorderState::Recorded(audio) if audio.duration >= self.max_duration => {
                return Err(RecorderError::LimitReached)
            }
            _ => {}
        }

        self.device.open(self.format)?;
        self.samples.clear();
        self.state = RecorderState::Recording;

        info!("Recording started, limit is {}s", self.max_duration);

        Ok(())
    }

    /// Reads the next chunk of samples from the device.
    ///
    /// Stops the recording when the limit is reached or the device runs dry.
    pub fn pump(&mut self) -> Result<RecorderProgress, RecorderError> {
        if !self.is_recording() {
            return Err(RecorderError::NotRecording);
        }

        let max_samples = self.max_samples();
        let remaining = max_samples.saturating_sub(self.samples.len());
        let mut buf = vec![0.; READ_CHUNK_SIZE.min(remaining).max(1)];

        let read = match self.device.read(&mut buf) {
            Ok(read) => read.min(remaining),
            Err(error) => {
                warn!("Recording aborted: {}", error);

                self.device.close();
                self.samples.clear();
                self.state = RecorderState::Idle;

                return Err(error.into());
            }
        };

        self.samples.extend_from_slice(&buf[..read]);

        if read == 0 || self.samples.len() >= max_samples {
            let audio = self.finish();
            return Ok(RecorderProgress::Finished {
                duration: audio.duration,
            });
        }

        Ok(RecorderProgress::Recording {
            elapsed: self.elapsed(),
        })
    }

    /// Stops the recording, releases the device, and encodes what was captured.
    pub fn stop(&mut self) -> Result<RecordedAudio, RecorderError> {
        if !self.is_recording() {
            return Err(RecorderError::NotRecording);
        }

        Ok(self.finish())
    }

    /// Discards the recording, releasing the device if it is still held.
    pub fn clear(&mut self) {
        if self.is_recording() {
            self.device.close();
        }

        self.samples.clear();
        self.state = RecorderState::Idle;
    }

    /// Returns the elapsed recording time in whole seconds
    pub fn elapsed(&self) -> u32 {
        match &self.state {
            RecorderState::Idle => 0,
            RecorderState::Recording => self.format.samples_to_seconds(self.samples.len()) as u32,
            RecorderState::Recorded(audio) => audio.duration,
        }
    }

    pub fn recorded(&self) -> Option<&RecordedAudio> {
        match &self.state {
            RecorderState::Recorded(audio) => Some(audio),
            _ => None,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording)
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn max_duration(&self) -> u32 {
        self.max_duration
    }

    fn max_samples(&self) -> usize {
        self.format.seconds_to_samples(self.max_duration as f32)
    }

    fn finish(&mut self) -> RecordedAudio {
        self.device.close();

        let duration = self.format.samples_to_seconds(self.samples.len()) as u32;

        let mut encoder = E::new(self.format);
        encoder.encode(&self.samples);

        let mime = encoder.content_type();
        let audio = RecordedAudio {
            blob: AudioBlob::new(mime, encoder.finish()),
            duration,
        };

        info!(
            "Recording stopped after {}s, encoded {} bytes as {}",
            duration,
            audio.blob.len(),
            E::name()
        );

        self.samples.clear();
        self.state = RecorderState::Recorded(audio.clone());

        audio
    }
}

#[cfg(test)]
mod test {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use assert_matches::assert_matches;

    use super::{Recorder, RecorderError, RecorderProgress};
    use crate::{CaptureDevice, CaptureError, CaptureFormat, Encoder, Sample};

    /// Hands out a fixed amount of silence
    struct SilentDevice {
        remaining: usize,
        open: Arc<AtomicBool>,
    }

    impl CaptureDevice for SilentDevice {
        fn open(&mut self, _format: CaptureFormat) -> Result<(), CaptureError> {
            if self.open.swap(true, Ordering::SeqCst) {
                return Err(CaptureError::Busy);
            }
            Ok(())
        }

        fn read(&mut self, buf: &mut [Sample]) -> Result<usize, CaptureError> {
            let amount = buf.len().min(self.remaining);
            self.remaining -= amount;
            Ok(amount)
        }

        fn close(&mut self) {
            self.open.store(false, Ordering::SeqCst);
        }
    }

    /// Writes one byte per sample
    struct CountingEncoder(Vec<u8>);

    impl Encoder for CountingEncoder {
        fn new(_format: CaptureFormat) -> Self {
            Self(vec![])
        }

        fn encode(&mut self, samples: &[Sample]) {
            self.0.extend(samples.iter().map(|_| 0u8));
        }

        fn finish(self) -> Vec<u8> {
            self.0
        }

        fn content_type(&self) -> String {
            "audio/test".to_string()
        }

        fn name() -> String {
            "Counting".to_string()
        }
    }

    const FORMAT: CaptureFormat = CaptureFormat {
        sample_rate: 1000,
        channel_count: 1,
    };

    fn recorder(seconds_available: usize) -> (Recorder<SilentDevice, CountingEncoder>, Arc<AtomicBool>) {
        let open = Arc::new(AtomicBool::new(false));
        let device = SilentDevice {
            remaining: seconds_available * 1000,
            open: open.clone(),
        };

        (Recorder::new(device, FORMAT, 3), open)
    }

    fn pump_until_finished(recorder: &mut Recorder<SilentDevice, CountingEncoder>) -> u32 {
        loop {
            if let RecorderProgress::Finished { duration } = recorder.pump().unwrap() {
                return duration;
            }
        }
    }

    #[test]
    fn only_one_recording_at_a_time() {
        let (mut recorder, open) = recorder(10);

        recorder.start().unwrap();
        assert!(open.load(Ordering::SeqCst));
        assert_matches!(recorder.start(), Err(RecorderError::AlreadyRecording));

        let audio = recorder.stop().unwrap();
        assert!(!open.load(Ordering::SeqCst));
        assert_eq!(audio.blob.mime, "audio/test");
    }

    #[test]
    fn recording_stops_at_the_limit() {
        let (mut recorder, open) = recorder(10);

        recorder.start().unwrap();
        let duration = pump_until_finished(&mut recorder);

        assert_eq!(duration, 3);
        assert_eq!(recorder.recorded().unwrap().blob.len(), 3000);
        assert!(!open.load(Ordering::SeqCst));

        // A full recording must be cleared before recording again
        assert_matches!(recorder.start(), Err(RecorderError::LimitReached));
        recorder.clear();
        assert!(recorder.start().is_ok());
    }

    #[test]
    fn recording_stops_when_input_ends() {
        let (mut recorder, _) = recorder(1);

        recorder.start().unwrap();
        assert_eq!(pump_until_finished(&mut recorder), 1);
        assert_matches!(recorder.pump(), Err(RecorderError::NotRecording));
    }

    #[test]
    fn clearing_releases_the_device() {
        let (mut recorder, open) = recorder(10);

        recorder.start().unwrap();
        recorder.pump().unwrap();
        recorder.clear();

        assert!(!open.load(Ordering::SeqCst));
        assert_eq!(recorder.elapsed(), 0);
        assert!(recorder.recorded().is_none());
    }
}
