use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Process-level settings, loaded from `SCRIBED_*` environment variables
/// over built-in defaults.
///
/// The defaults mirror the original deployment: serve on `127.0.0.1:8000`
/// with the `small` Whisper model.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Host the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Named Whisper model size ("tiny", "base", "small", ...).
    pub model_size: String,
    /// Directory holding GGML model files. None = platform cache dir.
    pub models_dir: Option<String>,
    /// Language hint (ISO 639-1). None = auto-detect per request.
    pub language: Option<String>,
    /// Inference thread count. None = derive from available parallelism.
    pub threads: Option<usize>,
}

impl Settings {
    /// Loads settings from the environment.
    ///
    /// Example: `SCRIBED_PORT=9000 SCRIBED_MODEL_SIZE=base scribed-api`.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000)?
            .set_default("model_size", "small")?
            .add_source(Environment::with_prefix("SCRIBED").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
