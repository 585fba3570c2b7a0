//! Audio utilities for the benchmark sweep.
//!
//! Everything here works on 16 kHz, 16-bit, mono PCM WAV, the format the
//! transcription backends consume. Files in any other layout are rejected
//! up front rather than resampled.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::BoxError;

const SAMPLE_RATE: u32 = 16_000;

fn open_checked(path: &Path) -> Result<hound::WavReader<BufReader<File>>, BoxError> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let spec = reader.spec();

    if spec.channels != 1
        || spec.sample_rate != SAMPLE_RATE
        || spec.bits_per_sample != 16
        || spec.sample_format != hound::SampleFormat::Int
    {
        return Err(format!(
            "unsupported WAV format in {} ({} ch, {} Hz, {} bit, {:?}); expected 16 kHz 16-bit mono PCM",
            path.display(),
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample,
            spec.sample_format
        )
        .into());
    }

    Ok(reader)
}

/// Read WAV samples normalized to the range [-1.0, 1.0].
///
/// # Errors
///
/// Fails if the file cannot be opened or is not 16 kHz 16-bit mono PCM.
pub fn read_wav_samples(path: &Path) -> Result<Vec<f32>, BoxError> {
    let mut reader = open_checked(path)?;

    let samples: Result<Vec<f32>, _> = reader
        .samples::<i16>()
        .map(|sample| sample.map(|s| s as f32 / i16::MAX as f32))
        .collect();

    Ok(samples?)
}

/// Duration of a WAV clip in seconds, taken from the file header.
pub fn wav_duration_seconds(path: &Path) -> Result<f64, BoxError> {
    let reader = open_checked(path)?;
    let spec = reader.spec();
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// Write `src` concatenated with itself `repeats` times to `dest`.
///
/// The concatenation is deterministic: writing the same source and repeat
/// count again produces a byte-identical file.
pub fn repeat_wav(src: &Path, dest: &Path, repeats: u32) -> Result<(), BoxError> {
    if repeats < 1 {
        return Err("repeat count must be at least 1".into());
    }

    let mut reader = open_checked(src)?;
    let spec = reader.spec();
    let samples = reader.samples::<i16>().collect::<Result<Vec<i16>, _>>()?;

    let mut writer = hound::WavWriter::create(dest, spec)
        .map_err(|e| format!("cannot create {}: {e}", dest.display()))?;
    for _ in 0..repeats {
        for &sample in &samples {
            writer.write_sample(sample)?;
        }
    }
    writer.finalize()?;

    Ok(())
}
