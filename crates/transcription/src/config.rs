use serde::{Deserialize, Serialize};

/// Configuration for the speech-to-text engine.
///
/// Decoding policy (beam width 5, word timestamps on, voice-activity
/// trimming on) is fixed in the backend and deliberately not exposed
/// here; these knobs only select the model and tune threading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Named Whisper model size ("tiny", "base", "small", ...).
    pub model_size: String,
    /// Directory holding GGML model files. None = platform cache dir.
    pub models_dir: Option<String>,
    /// Language hint (ISO 639-1, e.g. "en", "de"). None = auto-detect.
    pub language: Option<String>,
    /// Inference thread count. None = derive from available parallelism.
    pub threads: Option<usize>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model_size: "small".to_string(),
            models_dir: None,
            language: None,
            threads: None,
        }
    }
}
