use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{AudioInfo, RawSegment, RawWord, SttEngine, SttRequest, Task};
use crate::SAMPLE_RATE;
use crate::config::SttConfig;
use crate::vad;

/// Beam search width. Service policy, not client-configurable.
const BEAM_SIZE: i32 = 5;

/// Get the language string for a whisper language ID.
fn whisper_lang_str(lang_id: i32) -> Option<String> {
    whisper_rs::get_lang_str(lang_id).map(|s| s.to_string())
}

/// Local Whisper engine using whisper.cpp via whisper-rs.
///
/// The model context is loaded once and shared; every call creates a
/// fresh decoding state, so concurrent requests never share decoder
/// scratch space.
///
/// The state API only exposes the winning language id of auto
/// detection, not its score, so `AudioInfo::language_probability` is
/// `1.0` whenever any language was resolved and `0.0` when no speech
/// passed the energy gate.
pub struct WhisperEngine {
    ctx: Arc<WhisperContext>,
    config: SttConfig,
}

impl WhisperEngine {
    /// Creates a new Whisper engine, loading the model from disk.
    ///
    /// `model_path` should point to a GGML Whisper model file (e.g. ggml-small.bin).
    pub fn new(model_path: &str, config: SttConfig) -> anyhow::Result<Self> {
        info!(model_path, "Loading Whisper model");
        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .map_err(|e| anyhow::anyhow!("Failed to load Whisper model '{}': {}", model_path, e))?;
        info!("Whisper model loaded");
        Ok(Self {
            ctx: Arc::new(ctx),
            config,
        })
    }

    fn thread_count(&self) -> i32 {
        self.config
            .threads
            .unwrap_or_else(|| num_cpus().min(4))
            .max(1) as i32
    }
}

#[async_trait]
impl SttEngine for WhisperEngine {
    async fn transcribe(&self, request: SttRequest) -> anyhow::Result<(Vec<RawSegment>, AudioInfo)> {
        // Duration reflects the caller's full input, even when the
        // energy gate trims the edges before decoding.
        let duration = request.samples.len() as f32 / SAMPLE_RATE as f32;
        let lang = request
            .language_hint
            .clone()
            .or_else(|| self.config.language.clone());

        let Some(trimmed) = vad::trim_speech(&request.samples) else {
            debug!(duration, "No speech passed the energy gate, skipping inference");
            return Ok((
                Vec::new(),
                AudioInfo {
                    language: lang.unwrap_or_else(|| "en".to_string()),
                    language_probability: 0.0,
                    duration,
                    all_language_probs: None,
                },
            ));
        };

        let ctx = Arc::clone(&self.ctx);
        let threads = self.thread_count();
        let translate = request.task == Task::Translate;

        // whisper.cpp is CPU-bound; run on the blocking thread pool.
        let result = tokio::task::spawn_blocking(move || -> anyhow::Result<(Vec<RawSegment>, AudioInfo)> {
            let mut state = ctx
                .create_state()
                .map_err(|e| anyhow::anyhow!("Failed to create Whisper state: {}", e))?;

            let mut params = FullParams::new(SamplingStrategy::BeamSearch {
                beam_size: BEAM_SIZE,
                patience: 1.0,
            });

            if let Some(ref lang) = lang {
                params.set_language(Some(lang));
            } else {
                // Enable auto language detection when no hint is provided
                params.set_detect_language(true);
            }

            params.set_translate(translate);

            // Word-level timestamps. Service policy, always on.
            params.set_token_timestamps(true);

            // Suppress non-speech output
            params.set_print_progress(false);
            params.set_print_special(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            params.set_single_segment(false);
            params.set_no_speech_thold(0.6);
            params.set_suppress_blank(true);
            params.set_n_threads(threads);

            state
                .full(params, &trimmed.samples)
                .map_err(|e| anyhow::anyhow!("Whisper transcription failed: {}", e))?;

            let offset = trimmed.lead_secs;
            let n_segments = state.full_n_segments();
            let mut segments = Vec::with_capacity(n_segments as usize);

            for i in 0..n_segments {
                let Some(segment) = state.get_segment(i) else {
                    continue;
                };

                let text = match segment.to_str() {
                    Ok(t) => t.to_string(),
                    Err(_) => continue,
                };

                let t0 = segment.start_timestamp();
                let t1 = segment.end_timestamp();

                let mut tokens = Vec::new();
                let n_tokens = segment.n_tokens();
                for j in 0..n_tokens {
                    let Some(token) = segment.get_token(j) else {
                        continue;
                    };
                    let Ok(token_text) = token.to_str() else {
                        continue;
                    };
                    if is_special_token(token_text) {
                        continue;
                    }
                    let data = token.token_data();
                    tokens.push(DecodedToken {
                        text: token_text.to_string(),
                        t0: data.t0,
                        t1: data.t1,
                        probability: token.token_probability(),
                    });
                }

                let words = assemble_words(&tokens, offset);
                let diagnostics = token_diagnostics(&tokens);

                segments.push(RawSegment {
                    id: i as i64,
                    // whisper's own centisecond clock position, pre-shift.
                    seek: t0,
                    // Token and segment timestamps are centiseconds.
                    start: offset + t0 as f32 / 100.0,
                    end: offset + t1 as f32 / 100.0,
                    temperature: 0.0,
                    avg_logprob: diagnostics.avg_logprob,
                    compression_ratio: compression_ratio(&text),
                    no_speech_prob: diagnostics.no_speech_prob,
                    text,
                    words,
                });
            }

            let (language, language_probability) = match lang {
                Some(l) => (l, 1.0),
                None => {
                    // The state API exposes the winning language id but not
                    // its score, so the reported confidence stays at 1.0.
                    let detected = whisper_lang_str(state.full_lang_id_from_state())
                        .unwrap_or_else(|| "en".to_string());
                    (detected, 1.0)
                }
            };

            debug!(
                segments = segments.len(),
                %language,
                "Whisper transcription complete"
            );

            Ok((
                segments,
                AudioInfo {
                    language,
                    language_probability,
                    duration,
                    all_language_probs: None,
                },
            ))
        })
        .await
        .map_err(|e| anyhow::anyhow!("Whisper task join error: {}", e))??;

        Ok(result)
    }

    fn name(&self) -> &str {
        "local_whisper"
    }
}

/// One non-special decoded token with its timing and confidence.
struct DecodedToken {
    text: String,
    /// Start in centiseconds on the decoder clock.
    t0: i64,
    /// End in centiseconds on the decoder clock.
    t1: i64,
    probability: f32,
}

/// Segment-level diagnostics derived from the token stream.
struct TokenDiagnostics {
    avg_logprob: f32,
    no_speech_prob: f32,
}

/// Whisper control tokens look like `[_BEG_]` or `<|endoftext|>`.
fn is_special_token(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<')
}

/// Groups decoded tokens into words.
///
/// Whisper marks word boundaries with a leading space on the first token
/// of each word; bare continuation tokens (including punctuation) attach
/// to the word in progress. Word confidence is the mean token
/// probability, timestamps are shifted by `offset` back onto the
/// caller's clock. Returns `None` when there are no tokens, never an
/// empty list.
fn assemble_words(tokens: &[DecodedToken], offset: f32) -> Option<Vec<RawWord>> {
    if tokens.is_empty() {
        return None;
    }

    let mut words: Vec<RawWord> = Vec::new();
    let mut probs: Vec<f32> = Vec::new();

    for token in tokens {
        let starts_word = token.text.starts_with(' ') || words.is_empty();
        if starts_word {
            if let (Some(word), Some(mean)) = (words.last_mut(), mean_of(&probs)) {
                word.probability = mean;
            }
            probs.clear();
            words.push(RawWord {
                start: offset + token.t0 as f32 / 100.0,
                end: offset + token.t1 as f32 / 100.0,
                word: token.text.clone(),
                probability: token.probability,
            });
        } else if let Some(word) = words.last_mut() {
            word.word.push_str(&token.text);
            word.end = offset + token.t1 as f32 / 100.0;
        }
        probs.push(token.probability);
    }

    if let (Some(word), Some(mean)) = (words.last_mut(), mean_of(&probs)) {
        word.probability = mean;
    }

    Some(words)
}

fn mean_of(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

/// Derives segment diagnostics from token confidences.
///
/// whisper.cpp does not surface the decoder's internal per-segment
/// no-speech probability through the state API, so the reported value is
/// the complement of the mean token confidence: garbage audio decodes to
/// low-confidence tokens and trends toward 1.0.
fn token_diagnostics(tokens: &[DecodedToken]) -> TokenDiagnostics {
    let Some(mean_p) = mean_of(&tokens.iter().map(|t| t.probability).collect::<Vec<_>>()) else {
        return TokenDiagnostics {
            avg_logprob: 0.0,
            no_speech_prob: 1.0,
        };
    };

    let avg_logprob = tokens
        .iter()
        .map(|t| t.probability.max(1e-10).ln())
        .sum::<f32>()
        / tokens.len() as f32;

    TokenDiagnostics {
        avg_logprob,
        no_speech_prob: (1.0 - mean_p).clamp(0.0, 1.0),
    }
}

/// zlib compression ratio of the segment text, the same repetition
/// measure the upstream inference stacks report.
fn compression_ratio(text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    if encoder.write_all(text.as_bytes()).is_err() {
        return 0.0;
    }
    match encoder.finish() {
        Ok(compressed) if !compressed.is_empty() => text.len() as f32 / compressed.len() as f32,
        _ => 0.0,
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
