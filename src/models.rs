//! Model file resolution for the local Whisper predictor.
//!
//! Looks for a named model in the user cache directory and downloads it
//! once when missing. Downloads land in a `.part` file first and are
//! renamed only when complete, so an interrupted download never leaves a
//! truncated model behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Model fetched when the whisper backend is requested without an
/// explicit model path.
pub const DEFAULT_MODEL_NAME: &str = "ggml-base.bin";
pub const DEFAULT_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin";

#[derive(Debug, Error)]
pub enum ModelResolveError {
    #[error("could not determine a model cache directory")]
    NoCacheDir,
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
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

/// Resolve a model by name, downloading it into the cache when missing.
pub fn resolve(name: &str, url: &str) -> Result<PathBuf, ModelResolveError> {
    resolve_in(&model_cache_dir()?, name, url)
}

fn resolve_in(cache_dir: &Path, name: &str, url: &str) -> Result<PathBuf, ModelResolveError> {
    let cached = cache_dir.join(name);
    if cached.exists() {
        log::debug!("model {name} found in cache at {}", cached.display());
        return Ok(cached);
    }

    fs::create_dir_all(cache_dir).map_err(|source| ModelResolveError::CacheDir {
        path: cache_dir.to_path_buf(),
        source,
    })?;
    download(url, &cached)?;
    Ok(cached)
}

/// Platform cache directory for downloaded models.
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    dirs::cache_dir()
        .map(|d| d.join("stt-bench").join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path) -> Result<(), ModelResolveError> {
    log::info!("downloading model from {url}");
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| ModelResolveError::Download {
            url: url.to_string(),
            source,
        })?;

    let bytes = response
        .bytes()
        .map_err(|source| ModelResolveError::Download {
            url: url.to_string(),
            source,
        })?;

    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(|source| ModelResolveError::Write {
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|source| ModelResolveError::Write {
            path: temp_path.clone(),
            source,
        })?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|source| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source,
    })?;

    log::info!("model cached at {} ({} bytes)", dest.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_model_is_returned_without_download() {
        let tmp = tempfile::tempdir().unwrap();
        let model_path = tmp.path().join("test-model.bin");
        fs::write(&model_path, b"model bytes").unwrap();

        // An unreachable URL proves no download is attempted.
        let resolved = resolve_in(
            tmp.path(),
            "test-model.bin",
            "http://invalid.nonexistent.example.com/model.bin",
        )
        .unwrap();
        assert_eq!(resolved, model_path);
    }

    #[test]
    fn failed_download_leaves_no_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("model.bin");

        let result = download("http://invalid.nonexistent.example.com/model.bin", &dest);
        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }

    #[test]
    fn cache_dir_is_scoped_to_the_crate() {
        let dir = model_cache_dir().unwrap();
        let rendered = dir.to_string_lossy();
        assert!(rendered.contains("stt-bench"));
        assert!(rendered.ends_with("models"));
    }
}
