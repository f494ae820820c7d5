//! Energy-gate voice-activity trimming.
//!
//! Runs before inference so the decoder never sees long stretches of
//! leading or trailing non-speech audio. Interior pauses are kept, so
//! restoring timestamps afterwards only needs the single lead offset.

use crate::SAMPLE_RATE;

/// Mean-square energy below which a frame counts as non-speech.
const ENERGY_THRESHOLD: f32 = 0.0005;
/// Mean absolute amplitude below which a frame counts as non-speech.
const SILENCE_THRESHOLD: f32 = 0.015;
/// Frame length used for gating.
const FRAME_MS: usize = 100;
/// Frames of context kept on each side of detected speech.
const PAD_FRAMES: usize = 1;

/// Audio with its leading and trailing non-speech frames removed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedAudio {
    /// Kept samples, including the padding frames.
    pub samples: Vec<f32>,
    /// Seconds of audio dropped from the front; add this to every
    /// timestamp the decoder reports to get back on the caller's clock.
    pub lead_secs: f32,
}

/// Decides whether one frame contains speech.
///
/// Returns `(is_speech, energy, silence)` so callers can log the
/// measurements that drove the decision.
pub fn frame_is_speech(frame: &[f32]) -> (bool, f32, f32) {
    if frame.is_empty() {
        return (false, 0.0, 0.0);
    }

    let energy = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
    let silence = frame.iter().map(|s| s.abs()).sum::<f32>() / frame.len() as f32;

    (energy >= ENERGY_THRESHOLD && silence >= SILENCE_THRESHOLD, energy, silence)
}

/// Trims non-speech audio from both ends of `samples`.
///
/// Returns `None` when no frame passes the gate (the whole buffer is
/// silence or too quiet to decode). A trailing partial frame is treated
/// like a full frame.
pub fn trim_speech(samples: &[f32]) -> Option<TrimmedAudio> {
    let frame_len = SAMPLE_RATE as usize * FRAME_MS / 1000;
    if samples.is_empty() {
        return None;
    }

    let frames: Vec<&[f32]> = samples.chunks(frame_len).collect();
    let first = frames.iter().position(|f| frame_is_speech(f).0)?;
    let last = frames.iter().rposition(|f| frame_is_speech(f).0)?;

    let start_frame = first.saturating_sub(PAD_FRAMES);
    let end_frame = (last + PAD_FRAMES + 1).min(frames.len());

    let start = start_frame * frame_len;
    let end = (end_frame * frame_len).min(samples.len());

    Some(TrimmedAudio {
        samples: samples[start..end].to_vec(),
        lead_secs: start as f32 / SAMPLE_RATE as f32,
    })
}
