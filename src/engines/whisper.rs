use std::path::{Path, PathBuf};
use std::time::Instant;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{audio, BoxError, TranscriptionOutput, TranscriptionSegment, TranscriptionService};

/// Explicit configuration for the local Whisper predictor.
///
/// There is no module-level model handle; every predictor instance owns
/// its configuration and its loaded model, with an explicit
/// `load_model` / `unload_model` lifecycle.
#[derive(Debug, Clone)]
pub struct WhisperPredictorConfig {
    pub language: Option<String>,
    pub temperature: f32,
    pub beam_size: i32,
    pub suppress_blank: bool,
    pub suppress_non_speech_tokens: bool,
    pub no_speech_thold: f32,
}

impl Default for WhisperPredictorConfig {
    fn default() -> Self {
        Self {
            // The deployment this predictor mirrors serves German.
            language: Some("de".to_string()),
            temperature: 0.0,
            beam_size: 3,
            suppress_blank: true,
            suppress_non_speech_tokens: true,
            no_speech_thold: 0.2,
        }
    }
}

pub struct WhisperPredictor {
    config: WhisperPredictorConfig,
    loaded_model_path: Option<PathBuf>,
    context: Option<WhisperContext>,
    state: Option<whisper_rs::WhisperState>,
}

impl WhisperPredictor {
    pub fn new(config: WhisperPredictorConfig) -> Self {
        Self {
            config,
            loaded_model_path: None,
            context: None,
            state: None,
        }
    }

    pub fn load_model(&mut self, model_path: &Path) -> Result<(), BoxError> {
        let load_start = Instant::now();
        let context = WhisperContext::new_with_params(
            model_path.to_str().ok_or("model path is not valid UTF-8")?,
            WhisperContextParameters::default(),
        )?;
        let state = context.create_state()?;

        self.context = Some(context);
        self.state = Some(state);
        self.loaded_model_path = Some(model_path.to_path_buf());

        log::info!(
            "loaded whisper model {} in {:.2?}",
            model_path.display(),
            load_start.elapsed()
        );
        Ok(())
    }

    pub fn unload_model(&mut self) {
        self.loaded_model_path = None;
        self.state = None;
        self.context = None;
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.loaded_model_path.as_deref()
    }
}

impl TranscriptionService for WhisperPredictor {
    fn transcribe_file(&mut self, path: &Path) -> Result<TranscriptionOutput, BoxError> {
        let load_start = Instant::now();
        let samples = audio::read_wav_samples(path)?;
        let load_audio_ms = load_start.elapsed().as_secs_f64() * 1000.0;

        let state = self
            .state
            .as_mut()
            .ok_or("model not loaded; call load_model() first")?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: self.config.beam_size,
            patience: -1.0,
        });
        params.set_language(self.config.language.as_deref());
        params.set_temperature(self.config.temperature);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_suppress_blank(self.config.suppress_blank);
        params.set_suppress_non_speech_tokens(self.config.suppress_non_speech_tokens);
        params.set_no_speech_thold(self.config.no_speech_thold);

        let transcribe_start = Instant::now();
        state.full(params, &samples)?;
        let transcribe_ms = transcribe_start.elapsed().as_secs_f64() * 1000.0;

        let num_segments = state.full_n_segments()?;
        let mut segments = Vec::new();
        let mut transcription = String::new();

        for i in 0..num_segments {
            let text = state.full_get_segment_text(i)?;
            let start = state.full_get_segment_t0(i)? as f32 / 100.0;
            let end = state.full_get_segment_t1(i)? as f32 / 100.0;

            transcription.push_str(&text);
            segments.push(TranscriptionSegment { start, end, text });
        }

        Ok(TranscriptionOutput {
            transcription: transcription.trim().to_string(),
            segments,
            load_audio_ms,
            transcribe_ms,
        })
    }
}
