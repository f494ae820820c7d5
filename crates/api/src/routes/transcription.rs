use std::time::Instant;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use scribed_transcription::{SttRequest, Task, Transcription, mapping};
use tracing::{debug, info};

use crate::{error::ApiError, state::AppState};

/// `POST /transcribe` — text in the spoken language.
///
/// The body is the full sample buffer; inference starts only once it has
/// arrived and the response is one complete document. An empty array is
/// passed through and comes back as a transcription with zero segments.
pub async fn transcribe(
    State(state): State<AppState>,
    payload: Result<Json<Vec<f32>>, JsonRejection>,
) -> Result<Json<Transcription>, ApiError> {
    let Json(samples) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    run_task(state, samples, Task::Transcribe).await
}

/// `POST /translate` — English text, same schema.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<Vec<f32>>, JsonRejection>,
) -> Result<Json<Transcription>, ApiError> {
    let Json(samples) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    run_task(state, samples, Task::Translate).await
}

/// Shared path for both task modes; they differ only in the task passed
/// to the engine.
async fn run_task(
    state: AppState,
    samples: Vec<f32>,
    task: Task,
) -> Result<Json<Transcription>, ApiError> {
    let started = Instant::now();

    let (segments, audio_info) = state
        .engine
        .transcribe(SttRequest {
            samples,
            task,
            language_hint: None,
        })
        .await?;

    let document = mapping::to_transcription(segments, audio_info);

    info!(
        task = task.as_str(),
        took_ms = started.elapsed().as_millis() as u64,
        segments = document.segments.len(),
        language = %document.language,
        "Inference complete"
    );
    debug!(?document, "Response document");

    Ok(Json(document))
}
