use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One recognized token with timing and confidence.
///
/// Produced only as a child of a [`TranscriptionSegment`]; the surface
/// form keeps whatever whitespace the engine attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Start timestamp in seconds.
    pub start: f32,
    /// End timestamp in seconds, `start <= end`.
    pub end: f32,
    /// Text surface form (may carry a leading space).
    pub word: String,
    /// Confidence in `[0.0, 1.0]`.
    pub probability: f32,
}

/// One contiguous unit of recognized speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    /// Sequential identifier assigned by the engine, unique within one
    /// transcription (not necessarily starting at 0).
    pub id: i64,
    /// Engine-internal audio-position marker, passed through unchanged.
    pub seek: i64,
    /// Segment start in seconds.
    pub start: f32,
    /// Segment end in seconds, `start <= end`.
    pub end: f32,
    /// Recognized text.
    pub text: String,
    /// Decoding temperature the engine used for this segment.
    pub temperature: f32,
    /// Mean token log-probability.
    pub avg_logprob: f32,
    /// zlib compression ratio of the segment text.
    pub compression_ratio: f32,
    /// Probability that the segment contains no speech.
    pub no_speech_prob: f32,
    /// Word-level timing, present only when the engine produced it.
    /// Never serialized as an empty array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

/// The full response document for one request.
///
/// A plain value type owned by a single request/response cycle; nothing
/// here is mutated after construction or shared across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Detected or requested language code.
    pub language: String,
    /// Confidence in `[0.0, 1.0]` for the detected language. Engines
    /// that cannot score their detection report `1.0`, meaning
    /// "resolved" rather than a measured probability.
    pub language_probability: f32,
    /// Total audio duration in seconds, `>= 0`.
    pub duration: f32,
    /// Per-language probabilities, present only when the engine ran
    /// full language identification. Never serialized as an empty map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_language_probs: Option<HashMap<String, f32>>,
    /// Segments ordered by non-decreasing `start`; empty for silence.
    pub segments: Vec<TranscriptionSegment>,
}
