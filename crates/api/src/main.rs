use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use scribed_api::{build_router, state::AppState};
use scribed_config::Settings;
use scribed_transcription::{SttConfig, asr::local_whisper::WhisperEngine, model};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scribed-api", about = "Whisper transcription service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch model weights and exit (run once before serving).
    Download,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load settings")?;
    let models_dir = settings.models_dir.clone().map(PathBuf::from);

    match cli.command {
        Some(Command::Download) => {
            let size = settings.model_size.clone();
            // Blocking reqwest; keep it off the async runtime threads.
            let path = tokio::task::spawn_blocking(move || {
                model::download(&size, models_dir.as_deref())
            })
            .await??;
            info!(path = %path.display(), "Model ready");
            Ok(())
        }
        None => serve(settings, models_dir).await,
    }
}

async fn serve(settings: Settings, models_dir: Option<PathBuf>) -> anyhow::Result<()> {
    // Serving is local-files-only: missing weights are fatal at startup,
    // never discovered mid-request.
    let model_path = model::resolve(&settings.model_size, models_dir.as_deref())
        .context("model weights unavailable")?;

    let stt_config = SttConfig {
        model_size: settings.model_size.clone(),
        models_dir: settings.models_dir.clone(),
        language: settings.language.clone(),
        threads: settings.threads,
    };

    let engine = WhisperEngine::new(
        model_path
            .to_str()
            .context("model path is not valid UTF-8")?,
        stt_config,
    )?;

    let state = AppState::new(Arc::new(engine));
    let router = build_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, model = %settings.model_size, "scribed listening");

    axum::serve(listener, router).await?;
    Ok(())
}
