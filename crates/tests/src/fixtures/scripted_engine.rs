use std::sync::Mutex;

use async_trait::async_trait;
use scribed_transcription::{AudioInfo, RawSegment, RawWord, SttEngine, SttRequest};

/// Engine stand-in that returns a canned result and records every
/// request it saw, so tests can assert what the HTTP layer passed down.
pub struct ScriptedEngine {
    result: anyhow::Result<(Vec<RawSegment>, AudioInfo)>,
    requests: Mutex<Vec<SttRequest>>,
}

impl ScriptedEngine {
    pub fn returning(segments: Vec<RawSegment>, info: AudioInfo) -> Self {
        Self {
            result: Ok((segments, info)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(anyhow::anyhow!("{message}")),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<SttRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SttEngine for ScriptedEngine {
    async fn transcribe(&self, request: SttRequest) -> anyhow::Result<(Vec<RawSegment>, AudioInfo)> {
        self.requests.lock().unwrap().push(request);
        match &self.result {
            Ok((segments, info)) => Ok((segments.clone(), info.clone())),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A two-segment result with word timing, language detection metadata
/// and a full language distribution.
pub fn rich_result() -> (Vec<RawSegment>, AudioInfo) {
    let segments = vec![
        RawSegment {
            id: 0,
            seek: 0,
            start: 0.0,
            end: 2.0,
            text: " Hello there".to_string(),
            temperature: 0.0,
            avg_logprob: -0.25,
            compression_ratio: 0.8,
            no_speech_prob: 0.01,
            words: Some(vec![
                RawWord {
                    start: 0.0,
                    end: 0.9,
                    word: " Hello".to_string(),
                    probability: 0.97,
                },
                RawWord {
                    start: 0.9,
                    end: 2.0,
                    word: " there".to_string(),
                    probability: 0.92,
                },
            ]),
        },
        RawSegment {
            id: 1,
            seek: 200,
            start: 2.0,
            end: 3.5,
            text: " General Kenobi".to_string(),
            temperature: 0.0,
            avg_logprob: -0.4,
            compression_ratio: 0.85,
            no_speech_prob: 0.02,
            words: None,
        },
    ];

    let info = AudioInfo {
        language: "en".to_string(),
        language_probability: 0.98,
        duration: 3.5,
        all_language_probs: Some(
            [("en".to_string(), 0.98), ("nl".to_string(), 0.01)]
                .into_iter()
                .collect(),
        ),
    };

    (segments, info)
}

/// What an engine reports for silence: no segments, low-confidence
/// default language, no distribution.
pub fn silent_result() -> (Vec<RawSegment>, AudioInfo) {
    (
        Vec::new(),
        AudioInfo {
            language: "en".to_string(),
            language_probability: 0.0,
            duration: 0.0,
            all_language_probs: None,
        },
    )
}
