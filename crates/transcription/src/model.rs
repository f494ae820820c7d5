//! GGML model file resolution and one-shot download.
//!
//! Serving mode is local-files-only: [`resolve`] never touches the
//! network, and the binary's `download` subcommand is the only path that
//! fetches weights.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Model sizes published in the upstream whisper.cpp repository.
const KNOWN_SIZES: &[&str] = &[
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large-v2",
    "large-v3",
];

const MODEL_BASE_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unknown model size '{0}' (expected one of tiny, base, small, medium, large-v3, or an .en variant)")]
    UnknownSize(String),
    #[error("model file not found at {path}; run the `download` subcommand first")]
    NotDownloaded { path: PathBuf },
    #[error("could not determine model cache directory")]
    NoCacheDir,
    #[error("failed to create model directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File name of the GGML weights for a model size.
pub fn model_file_name(size: &str) -> String {
    format!("ggml-{size}.bin")
}

/// Upstream URL of the GGML weights for a model size.
pub fn model_url(size: &str) -> String {
    format!("{MODEL_BASE_URL}/{}", model_file_name(size))
}

fn check_size(size: &str) -> Result<(), ModelError> {
    if KNOWN_SIZES.contains(&size) {
        Ok(())
    } else {
        Err(ModelError::UnknownSize(size.to_string()))
    }
}

/// Directory model files live in when none is configured.
///
/// `$XDG_CACHE_HOME/scribed/models` on Linux, the platform equivalent
/// elsewhere.
pub fn default_models_dir() -> Result<PathBuf, ModelError> {
    dirs::cache_dir()
        .map(|d| d.join("scribed").join("models"))
        .ok_or(ModelError::NoCacheDir)
}

fn models_dir(dir: Option<&Path>) -> Result<PathBuf, ModelError> {
    match dir {
        Some(d) => Ok(d.to_path_buf()),
        None => default_models_dir(),
    }
}

/// Resolves the on-disk path for a model size without downloading.
///
/// Errors if the weights are missing so that a serving process fails at
/// startup rather than mid-request.
pub fn resolve(size: &str, dir: Option<&Path>) -> Result<PathBuf, ModelError> {
    check_size(size)?;
    let path = models_dir(dir)?.join(model_file_name(size));
    if path.exists() {
        Ok(path)
    } else {
        Err(ModelError::NotDownloaded { path })
    }
}

/// Fetches the weights for a model size into the model directory.
///
/// Streams to a `.part` file and renames on success, so a killed
/// download never leaves a truncated model behind. Already-present
/// weights are left untouched.
pub fn download(size: &str, dir: Option<&Path>) -> Result<PathBuf, ModelError> {
    check_size(size)?;
    let dir = models_dir(dir)?;
    let dest = dir.join(model_file_name(size));
    if dest.exists() {
        info!(path = %dest.display(), "Model already present, skipping download");
        return Ok(dest);
    }

    fs::create_dir_all(&dir).map_err(ModelError::CreateDir)?;

    let url = model_url(size);
    let temp_path = dest.with_extension("part");
    info!(%url, path = %dest.display(), "Downloading model");

    let result = download_inner(&url, &dest, &temp_path);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result?;

    info!(path = %dest.display(), "Model downloaded");
    Ok(dest)
}

fn download_inner(url: &str, dest: &Path, temp_path: &Path) -> Result<(), ModelError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let mut file = fs::File::create(temp_path).map_err(|e| ModelError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    // Stream in chunks; models run to multiple GB for the large sizes.
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(|e| ModelError::Write {
            path: temp_path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(|e| ModelError::Write {
            path: temp_path.to_path_buf(),
            source: e,
        })?;
    }

    fs::rename(temp_path, dest).map_err(|e| ModelError::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}
