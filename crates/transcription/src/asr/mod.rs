pub mod local_whisper;

use std::collections::HashMap;

use async_trait::async_trait;

/// Inference task requested for a piece of audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Produce text in the spoken language.
    Transcribe,
    /// Produce English text regardless of the spoken language.
    Translate,
}

impl Task {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transcribe => "transcribe",
            Self::Translate => "translate",
        }
    }
}

/// Request to transcribe one complete audio buffer.
#[derive(Debug, Clone)]
pub struct SttRequest {
    /// PCM audio at 16kHz mono, f32 normalized [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Task mode.
    pub task: Task,
    /// Optional language hint (ISO 639-1, e.g. "en", "de").
    pub language_hint: Option<String>,
}

/// One word as the engine natively reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWord {
    pub start: f32,
    pub end: f32,
    pub word: String,
    pub probability: f32,
}

/// One segment as the engine natively reports it.
///
/// Scalar fields are copied verbatim into the public schema; `words` is
/// `None` when the engine produced no word-level data for the segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    pub id: i64,
    pub seek: i64,
    pub start: f32,
    pub end: f32,
    pub text: String,
    pub temperature: f32,
    pub avg_logprob: f32,
    pub compression_ratio: f32,
    pub no_speech_prob: f32,
    pub words: Option<Vec<RawWord>>,
}

/// Language and duration metadata for one inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    pub language: String,
    /// Confidence in `language`. Engines that cannot score their
    /// detection report `1.0` here, so it reads as "resolved", not as
    /// a measured probability.
    pub language_probability: f32,
    /// Total input duration in seconds.
    pub duration: f32,
    /// Full per-language distribution, only when the engine computed one.
    pub all_language_probs: Option<HashMap<String, f32>>,
}

/// Trait for pluggable speech-to-text engines.
///
/// One call covers one complete audio buffer; the returned segments are
/// fully materialized and ordered by non-decreasing start time.
#[async_trait]
pub trait SttEngine: Send + Sync + 'static {
    /// Runs inference over the whole request buffer.
    async fn transcribe(&self, request: SttRequest) -> anyhow::Result<(Vec<RawSegment>, AudioInfo)>;

    /// Human-readable engine name.
    fn name(&self) -> &str;
}
