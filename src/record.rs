use std::io;

use log::{info, warn};
use revmix_core::{format_clock, Config, RecordedAudio, Recorder, RecorderError, RecorderProgress};
use revmix_impls::{PcmStreamCapture, WaveEncoder};
use tokio::task;

use crate::RevMixError;

/// Records from stdin until the input ends or the recording limit is reached
pub async fn record(config: &Config) -> Result<RecordedAudio, RevMixError> {
    let format = config.capture_format;
    let max_duration = config.max_recording_duration;

    let recorded = task::spawn_blocking(move || -> Result<RecordedAudio, RecorderError> {
        let capture = PcmStreamCapture::new(io::stdin());
        let mut recorder: Recorder<_, WaveEncoder> = Recorder::new(capture, format, max_duration);

        recorder.start()?;
        info!("Recording from stdin, up to {}", format_clock(max_duration));

        let mut shown = 0;
        loop {
            match recorder.pump()? {
                RecorderProgress::Recording { elapsed } if elapsed > shown => {
                    shown = elapsed;
                    info!("Recording {}", format_clock(elapsed));
                }
                RecorderProgress::Recording { .. } => {}
                RecorderProgress::Finished { duration } => {
                    info!("Recorded {}", format_clock(duration));
                    break;
                }
            }
        }

        recorder.recorded().cloned().ok_or(RecorderError::NotRecording)
    })
    .await
    .map_err(|e| RevMixError::Fatal(e.to_string()))??;

    if recorded.duration == 0 {
        warn!("The recording is shorter than a second");
    }

    Ok(recorded)
}
