use std::sync::Arc;

use scribed_transcription::SttEngine;

/// Shared application state passed to axum handlers.
///
/// The engine is constructed once at startup and shared read-only across
/// requests; this layer adds no pooling or admission control of its own.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SttEngine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn SttEngine>) -> Self {
        Self { engine }
    }
}
