use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};

use stt_bench::engines::hosted::{HostedEndpoint, HostedEndpointConfig};
#[cfg(feature = "whisper")]
use stt_bench::engines::whisper::{WhisperPredictor, WhisperPredictorConfig};
#[cfg(feature = "whisper")]
use stt_bench::models;
use stt_bench::{subtitle, BoxError, TranscriptionOutput, TranscriptionService};

#[derive(Parser, Debug)]
#[command(about = "Transcribe a single audio file", version)]
struct Args {
    /// Path to the audio file (16 kHz 16-bit mono WAV)
    audio_file_path: PathBuf,

    /// Which transcription backend to use
    #[arg(long, value_enum, default_value_t = EngineChoice::Hosted)]
    engine: EngineChoice,

    /// Hosted endpoint URL (defaults to $STT_BENCH_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Model file for the whisper backend (downloaded to the cache when omitted)
    #[cfg(feature = "whisper")]
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Language hint passed to the backend
    #[arg(long, default_value = "de")]
    language: String,

    /// Output format for the transcript
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print backend-reported timings
    #[arg(long)]
    debug: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EngineChoice {
    Hosted,
    #[cfg(feature = "whisper")]
    Whisper,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Srt,
}

enum EngineWrapper {
    Hosted(HostedEndpoint),
    #[cfg(feature = "whisper")]
    Whisper(WhisperPredictor),
}

impl TranscriptionService for EngineWrapper {
    fn transcribe_file(&mut self, path: &Path) -> Result<TranscriptionOutput, BoxError> {
        match self {
            EngineWrapper::Hosted(engine) => engine.transcribe_file(path),
            #[cfg(feature = "whisper")]
            EngineWrapper::Whisper(engine) => engine.transcribe_file(path),
        }
    }
}

fn build_engine(args: &Args) -> Result<EngineWrapper, BoxError> {
    match args.engine {
        EngineChoice::Hosted => {
            let mut config = HostedEndpointConfig::default();
            if let Some(url) = &args.endpoint {
                config.url = url.clone();
            }
            config.language = args.language.clone();
            Ok(EngineWrapper::Hosted(HostedEndpoint::new(config)?))
        }
        #[cfg(feature = "whisper")]
        EngineChoice::Whisper => {
            let model_path = match &args.model_path {
                Some(path) => path.clone(),
                None => models::resolve(models::DEFAULT_MODEL_NAME, models::DEFAULT_MODEL_URL)?,
            };
            let mut predictor = WhisperPredictor::new(WhisperPredictorConfig {
                language: Some(args.language.clone()),
                ..Default::default()
            });
            predictor.load_model(&model_path)?;
            Ok(EngineWrapper::Whisper(predictor))
        }
    }
}

fn run(args: Args) -> Result<(), BoxError> {
    let mut engine = build_engine(&args)?;
    let output = engine.transcribe_file(&args.audio_file_path)?;

    if args.debug {
        println!("Duration to load audio: {:.2} ms", output.load_audio_ms);
        println!("Duration to transcribe: {:.2} ms", output.transcribe_ms);
    }

    match args.format {
        OutputFormat::Text => println!("{}", output.transcription),
        OutputFormat::Srt => print!("{}", subtitle::to_srt(&output.segments)),
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("transcribe_cli failed: {e}");
        process::exit(1);
    }
}
