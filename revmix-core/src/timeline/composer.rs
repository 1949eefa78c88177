use log::debug;
use serde::Serialize;

use super::{ClipSource, TimelineError};
use crate::{Id, TimelineClipData};

pub type SequenceId = Id<TimelineClip>;

/// A clip placed on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineClip {
    /// Identifies this placement, the same source can be placed many times
    pub sequence_id: SequenceId,
    pub source: ClipSource,
    /// Where the clip starts, in seconds
    pub position: f64,
}

/// The description of a finished timeline. No audio is mixed, this is metadata only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineDraft {
    pub audio_timeline: Vec<TimelineClipData>,
    pub total_duration: f64,
}

/// Assembles an ordered sequence of clips.
///
/// Clips are positioned back to back with a fixed spacing that ignores their content,
/// and insertion order is the only ordering guarantee.
#[derive(Debug)]
pub struct TimelineComposer {
    /// Seconds between the positions of two consecutive clips
    spacing: f64,
    clips: Vec<TimelineClip>,
    /// The clip currently being dragged, if any
    dragged: Option<ClipSource>,
    total_duration: f64,
}

impl TimelineComposer {
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            clips: Default::default(),
            dragged: None,
            total_duration: 0.,
        }
    }

    /// Picks up a clip so it can be dropped onto the timeline
    pub fn drag_start(&mut self, source: ClipSource) {
        self.dragged = Some(source);
    }

    pub fn drag_cancel(&mut self) {
        self.dragged = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    /// Drops the dragged clip at the end of the timeline.
    ///
    /// Returns `None` if nothing was being dragged.
    pub fn drop_clip(&mut self) -> Option<SequenceId> {
        let source = self.dragged.take()?;
        Some(self.append(source))
    }

    /// Appends a clip at the end of the timeline in one step
    pub fn append(&mut self, source: ClipSource) -> SequenceId {
        let clip = TimelineClip {
            sequence_id: Id::new(),
            position: self.clips.len() as f64 * self.spacing,
            source,
        };

        let sequence_id = clip.sequence_id;

        debug!(
            "Placed {} at {}s on the timeline",
            clip.source.name, clip.position
        );

        self.clips.push(clip);
        self.recalculate_duration();

        sequence_id
    }

    /// Removes the clip with the given sequence id. Returns true if a clip was removed.
    ///
    /// The positions of the remaining clips are left as they are.
    pub fn remove(&mut self, sequence_id: SequenceId) -> bool {
        let before = self.clips.len();

        self.clips.retain(|c| c.sequence_id != sequence_id);
        self.recalculate_duration();

        self.clips.len() != before
    }

    /// Empties the timeline
    pub fn clear(&mut self) {
        self.clips.clear();
        self.dragged = None;
        self.recalculate_duration();
    }

    pub fn clips(&self) -> &[TimelineClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// The sum of the durations of all clips, in seconds
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Returns the ruler labels, in seconds, one every 5 seconds up to the total duration
    pub fn ruler_marks(&self) -> Vec<u32> {
        let count = (self.total_duration / 5.).ceil() as u32 + 1;
        (0..count).map(|i| i * 5).collect()
    }

    /// Describes the timeline so it can be submitted
    pub fn finalize(&self) -> Result<TimelineDraft, TimelineError> {
        if self.clips.is_empty() {
            return Err(TimelineError::Empty);
        }

        Ok(TimelineDraft {
            audio_timeline: self
                .clips
                .iter()
                .map(|c| c.source.to_clip_data(c.position))
                .collect(),
            total_duration: self.total_duration,
        })
    }

    fn recalculate_duration(&mut self) {
        self.total_duration = self.clips.iter().map(|c| c.source.duration).sum();
    }
}

impl Default for TimelineComposer {
    fn default() -> Self {
        Self::new(2.)
    }
}
