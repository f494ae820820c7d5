//! Native engine output → public response document.
//!
//! Scalar fields are copied verbatim (no unit conversion, no rounding).
//! The only normalization is that empty optional collections become
//! absent: a segment without word data has no `words` field on the wire,
//! and a result without a language distribution has no
//! `all_language_probs` field.

use crate::asr::{AudioInfo, RawSegment, RawWord};
use crate::transcript::{Transcription, TranscriptionSegment, Word};

/// Assembles the response document from one engine invocation.
pub fn to_transcription(segments: Vec<RawSegment>, info: AudioInfo) -> Transcription {
    Transcription {
        language: info.language,
        language_probability: info.language_probability,
        duration: info.duration,
        all_language_probs: info.all_language_probs.filter(|probs| !probs.is_empty()),
        segments: segments.into_iter().map(to_segment).collect(),
    }
}

fn to_segment(segment: RawSegment) -> TranscriptionSegment {
    TranscriptionSegment {
        id: segment.id,
        seek: segment.seek,
        start: segment.start,
        end: segment.end,
        text: segment.text,
        temperature: segment.temperature,
        avg_logprob: segment.avg_logprob,
        compression_ratio: segment.compression_ratio,
        no_speech_prob: segment.no_speech_prob,
        words: segment
            .words
            .filter(|words| !words.is_empty())
            .map(|words| words.into_iter().map(to_word).collect()),
    }
}

fn to_word(word: RawWord) -> Word {
    Word {
        start: word.start,
        end: word.end,
        word: word.word,
        probability: word.probability,
    }
}
