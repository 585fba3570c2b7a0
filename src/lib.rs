pub mod audio;
pub mod bench;
pub mod engines;
pub mod models;
pub mod report;
pub mod subtitle;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Boxed error type used at the collaborator seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

/// What a transcription backend reports for a single call.
///
/// Timings are backend-reported milliseconds: `load_audio_ms` covers
/// decoding the input, `transcribe_ms` covers inference only.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionOutput {
    pub transcription: String,
    pub segments: Vec<TranscriptionSegment>,
    pub load_audio_ms: f64,
    pub transcribe_ms: f64,
}

/// The narrow seam between the benchmark and a transcription backend.
///
/// Implementations may be local models or remote endpoints; callers treat
/// them as an opaque `transcribe(audio) -> output` call and must not depend
/// on anything beyond this contract.
pub trait TranscriptionService {
    fn transcribe_file(&mut self, path: &Path) -> Result<TranscriptionOutput, BoxError>;
}
