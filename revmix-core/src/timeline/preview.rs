use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{interval, MissedTickBehavior};

use super::{TimelineComposer, TimelineError};

/// Simulated playback of a timeline.
///
/// Nothing is decoded or mixed, a progress counter is advanced in fixed steps purely for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackPreview {
    /// How many seconds a tick advances the progress
    step: f64,
    progress: f64,
    total: f64,
    playing: bool,
}

/// The result of advancing the preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewTick {
    Playing { progress: f64, total: f64 },
    Finished,
    Stopped,
}

impl PlaybackPreview {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            progress: 0.,
            total: 0.,
            playing: false,
        }
    }

    /// Starts the preview from the beginning of the timeline
    pub fn play(&mut self, timeline: &TimelineComposer) -> Result<(), TimelineError> {
        if timeline.is_empty() {
            return Err(TimelineError::Empty);
        }

        self.total = timeline.total_duration();
        self.progress = 0.;
        self.playing = true;

        Ok(())
    }

    /// Stops the preview and rewinds it
    pub fn stop(&mut self) {
        self.playing = false;
        self.progress = 0.;
    }

    /// Advances the preview by one step. Reaching the end stops and rewinds it.
    pub fn tick(&mut self) -> PreviewTick {
        if !self.playing {
            return PreviewTick::Stopped;
        }

        if self.progress >= self.total {
            self.stop();
            return PreviewTick::Finished;
        }

        self.progress += self.step;

        PreviewTick::Playing {
            progress: self.progress,
            total: self.total,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// How far along the preview is, from 0 to 1
    pub fn progress_fraction(&self) -> f64 {
        if self.total > 0. {
            (self.progress / self.total).min(1.)
        } else {
            0.
        }
    }
}

/// Drives a preview at a fixed real-time rate until it finishes or is stopped.
///
/// Dropping the returned future cancels the preview's timer.
pub async fn run_preview<F>(preview: &Mutex<PlaybackPreview>, tick_rate: Duration, mut on_tick: F)
where
    F: FnMut(PreviewTick),
{
    let mut ticker = interval(tick_rate);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let tick = preview.lock().tick();
        on_tick(tick);

        if !matches!(tick, PreviewTick::Playing { .. }) {
            break;
        }
    }
}
