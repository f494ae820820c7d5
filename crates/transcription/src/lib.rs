pub mod asr;
pub mod config;
pub mod mapping;
pub mod model;
pub mod transcript;
pub mod vad;

pub use asr::{AudioInfo, RawSegment, RawWord, SttEngine, SttRequest, Task};
pub use config::SttConfig;
pub use transcript::{Transcription, TranscriptionSegment, Word};

/// Sample rate every engine in this crate consumes.
///
/// Fixed by the hyperparameters Whisper was trained on; callers must
/// supply already-decoded 16 kHz mono samples.
pub const SAMPLE_RATE: u32 = 16_000;
