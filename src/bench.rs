//! Latency benchmarking core: length-sweep generation and the measurement
//! loop.
//!
//! The recorded latency is the backend-reported `transcribe_ms`, not
//! wall-clock time around the call. For a hosted backend this excludes
//! network and queueing overhead, so numbers measured against different
//! deployments are not directly comparable. Known caveat; it is kept
//! because it isolates inference time from transport.
//!
//! Measurements run strictly serially on one thread. Parallel calls would
//! contend for the backend and bias the very quantity under test.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{audio, BoxError, TranscriptionService};

/// Discarded calls made on the base clip before measurement starts, to
/// push one-time initialization cost out of the measured region.
const WARM_UP_CALLS: u32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create temporary sweep directory: {0}")]
    SweepDir(#[source] std::io::Error),
    #[error("failed to materialize benchmark sample {index}: {source}")]
    Sample {
        index: u32,
        #[source]
        source: BoxError,
    },
    #[error("backend unavailable: {source}")]
    CollaboratorUnavailable {
        #[source]
        source: BoxError,
    },
    #[error("transcription failed on sample {index}, repetition {repetition}: {source}")]
    Transcription {
        index: u32,
        repetition: u32,
        #[source]
        source: BoxError,
    },
    #[error("failed to render chart to {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct BenchConfig {
    /// Maximum number of times the base clip is repeated; the sweep tests
    /// lengths 1..=max_repeats times the base duration.
    pub max_repeats: u32,
    /// Transcription calls per audio length, averaged into one data point.
    pub reps_per_length: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            max_repeats: 10,
            reps_per_length: 3,
        }
    }
}

impl BenchConfig {
    fn validate(&self) -> Result<(), BenchError> {
        if self.max_repeats < 1 {
            return Err(BenchError::InvalidInput(
                "max_repeats must be at least 1".to_string(),
            ));
        }
        if self.reps_per_length < 1 {
            return Err(BenchError::InvalidInput(
                "reps_per_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One materialized point of the length sweep.
#[derive(Debug)]
pub struct BenchmarkSample {
    pub index: u32,
    pub length_seconds: f64,
    pub path: PathBuf,
}

/// Final, index-aligned output of a benchmark run.
///
/// `lengths[i]` and `average_durations[i]` belong to the same sample;
/// `lengths` is strictly ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub lengths: Vec<f64>,
    pub average_durations: Vec<f64>,
}

/// Produces synthetic clips of increasing length by repeating a base clip.
///
/// Sample `i` (1-based) is the base clip concatenated `i` times, written
/// into a sweep-scoped temporary directory. The directory is removed when
/// the sweep is dropped, on every exit path. Materializing the same index
/// twice yields byte-identical audio.
pub struct LengthSweep {
    base: PathBuf,
    base_duration: f64,
    max_repeats: u32,
    dir: TempDir,
}

impl LengthSweep {
    pub fn new(base: &Path, max_repeats: u32) -> Result<Self, BenchError> {
        if max_repeats < 1 {
            return Err(BenchError::InvalidInput(
                "max_repeats must be at least 1".to_string(),
            ));
        }
        let base_duration = audio::wav_duration_seconds(base).map_err(|e| {
            BenchError::InvalidInput(format!("cannot decode base clip: {e}"))
        })?;
        let dir = TempDir::new().map_err(BenchError::SweepDir)?;

        Ok(Self {
            base: base.to_path_buf(),
            base_duration,
            max_repeats,
            dir,
        })
    }

    pub fn base_duration(&self) -> f64 {
        self.base_duration
    }

    pub fn max_repeats(&self) -> u32 {
        self.max_repeats
    }

    /// Write the clip for `index` (1..=max_repeats) and return its sample.
    pub fn materialize(&self, index: u32) -> Result<BenchmarkSample, BenchError> {
        if index < 1 || index > self.max_repeats {
            return Err(BenchError::InvalidInput(format!(
                "sample index {index} out of range 1..={}",
                self.max_repeats
            )));
        }

        let path = self.dir.path().join(format!("temp_{index}.wav"));
        audio::repeat_wav(&self.base, &path, index).map_err(|source| BenchError::Sample {
            index,
            source,
        })?;

        Ok(BenchmarkSample {
            index,
            length_seconds: self.base_duration * index as f64,
            path,
        })
    }
}

/// Drives warm-up and the measurement sweep against one backend.
pub struct BenchmarkRunner<S> {
    service: S,
    config: BenchConfig,
}

impl<S: TranscriptionService> BenchmarkRunner<S> {
    pub fn new(service: S, config: BenchConfig) -> Result<Self, BenchError> {
        config.validate()?;
        Ok(Self { service, config })
    }

    /// Run warm-up and the full sweep, returning the aligned series.
    ///
    /// Any backend failure aborts the whole run; a partial result would
    /// corrupt the averages, so none is ever returned.
    pub fn run(&mut self, base_clip: &Path) -> Result<BenchmarkResult, BenchError> {
        // Reject a bad base clip before spending backend calls on it.
        audio::wav_duration_seconds(base_clip).map_err(|e| {
            BenchError::InvalidInput(format!("cannot decode base clip: {e}"))
        })?;

        self.warm_up(base_clip)?;

        // The sweep directory is created only after a successful warm-up;
        // a dead backend must not leave artifacts behind.
        let sweep = LengthSweep::new(base_clip, self.config.max_repeats)?;
        self.measure(&sweep)
    }

    fn warm_up(&mut self, clip: &Path) -> Result<(), BenchError> {
        println!("Warming up the model...");
        for call in 1..=WARM_UP_CALLS {
            log::debug!("warm-up call {call}/{WARM_UP_CALLS}");
            self.service
                .transcribe_file(clip)
                .map_err(|source| BenchError::CollaboratorUnavailable { source })?;
        }
        println!("Warm-up complete.");
        Ok(())
    }

    fn measure(&mut self, sweep: &LengthSweep) -> Result<BenchmarkResult, BenchError> {
        let reps = self.config.reps_per_length;
        let count = sweep.max_repeats() as usize;
        let mut lengths = Vec::with_capacity(count);
        let mut average_durations = Vec::with_capacity(count);

        for index in 1..=sweep.max_repeats() {
            let sample = sweep.materialize(index)?;
            println!("Transcribing {index}x length...");

            let mut durations = Vec::with_capacity(reps as usize);
            for repetition in 1..=reps {
                println!("  Repetition {repetition}/{reps}");
                let output = self
                    .service
                    .transcribe_file(&sample.path)
                    .map_err(|source| BenchError::Transcription {
                        index,
                        repetition,
                        source,
                    })?;
                if output.transcribe_ms < 0.0 {
                    log::warn!(
                        "backend reported negative transcribe_ms ({}) on sample {index}",
                        output.transcribe_ms
                    );
                }
                durations.push(output.transcribe_ms / 1000.0);
                println!("{}", output.transcription);
            }

            lengths.push(sample.length_seconds);
            average_durations.push(mean(&durations));
        }

        Ok(BenchmarkResult {
            lengths,
            average_durations,
        })
    }
}

/// Arithmetic mean of a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_matches_arithmetic_definition() {
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-9);
        assert!((mean(&[0.25]) - 0.25).abs() < 1e-9);
        assert!((mean(&[1.5, 2.5]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn config_rejects_zero_values() {
        let zero_repeats = BenchConfig {
            max_repeats: 0,
            reps_per_length: 3,
        };
        assert!(matches!(
            zero_repeats.validate(),
            Err(BenchError::InvalidInput(_))
        ));

        let zero_reps = BenchConfig {
            max_repeats: 10,
            reps_per_length: 0,
        };
        assert!(matches!(
            zero_reps.validate(),
            Err(BenchError::InvalidInput(_))
        ));
    }

    #[test]
    fn default_config_matches_driver_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.max_repeats, 10);
        assert_eq!(config.reps_per_length, 3);
    }
}
