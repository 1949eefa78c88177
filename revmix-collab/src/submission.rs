use revmix_api::{NewPerformanceSchema, PerformanceSource};
use revmix_core::{AudioBlob, RecordedAudio, TimelineClipData, TimelineDraft, TIMELINE_PLACEHOLDER};
use thiserror::Error;

/// Whether the user records or uploads a single take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureMode {
    #[default]
    Record,
    Upload,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Please record, upload, or create a timeline track first")]
    NothingReady,
    #[error("You already submitted a performance to this battle")]
    AlreadySubmitted,
    #[error("This battle has ended")]
    BattleEnded,
}

/// A performance ready to be sent, minus who sends it and where
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub audio_data: String,
    pub duration: f64,
    pub source: PerformanceSource,
    pub audio_timeline: Vec<TimelineClipData>,
}

/// Collects the audio the user prepared and decides what gets submitted.
///
/// A finished timeline always wins over a single take.
#[derive(Debug, Clone, Default)]
pub struct SubmissionAssembler {
    mode: CaptureMode,
    recording: Option<RecordedAudio>,
    upload: Option<AudioBlob>,
    timeline: Option<TimelineDraft>,
    /// The duration reported for uploads, which aren't measured
    upload_duration: f64,
}

impl SubmissionAssembler {
    pub fn new(upload_duration: f64) -> Self {
        Self {
            upload_duration,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CaptureMode) {
        self.mode = mode;
    }

    pub fn set_recording(&mut self, recording: RecordedAudio) {
        self.recording = Some(recording);
    }

    pub fn set_upload(&mut self, upload: AudioBlob) {
        self.upload = Some(upload);
    }

    pub fn set_timeline(&mut self, timeline: TimelineDraft) {
        self.timeline = Some(timeline);
    }

    /// Drops the single take of the current mode
    pub fn clear_audio(&mut self) {
        match self.mode {
            CaptureMode::Record => self.recording = None,
            CaptureMode::Upload => self.upload = None,
        }
    }

    pub fn clear_timeline(&mut self) {
        self.timeline = None;
    }

    pub fn assemble(&self) -> Result<Submission, SubmissionError> {
        if let Some(timeline) = &self.timeline {
            return Ok(Submission {
                audio_data: TIMELINE_PLACEHOLDER.to_string(),
                duration: timeline.total_duration,
                source: PerformanceSource::Timeline,
                audio_timeline: timeline.audio_timeline.clone(),
            });
        }

        let (blob, duration, source) = match self.mode {
            CaptureMode::Record => self
                .recording
                .as_ref()
                .map(|r| (&r.blob, r.duration as f64, PerformanceSource::Record)),
            CaptureMode::Upload => self
                .upload
                .as_ref()
                .map(|b| (b, self.upload_duration, PerformanceSource::Upload)),
        }
        .ok_or(SubmissionError::NothingReady)?;

        Ok(Submission {
            audio_data: blob.to_base64(),
            duration,
            source,
            audio_timeline: vec![],
        })
    }
}

impl Submission {
    pub fn into_new_performance(
        self,
        user_id: impl Into<String>,
        room_id: impl Into<String>,
    ) -> NewPerformanceSchema {
        NewPerformanceSchema {
            user_id: user_id.into(),
            room_id: room_id.into(),
            audio_data: self.audio_data,
            duration: self.duration,
            timeline_marks: vec![],
            audio_timeline: self.audio_timeline,
            source: self.source,
        }
    }
}
