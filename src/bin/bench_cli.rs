use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use stt_bench::bench::{BenchConfig, BenchError, BenchmarkRunner};
use stt_bench::engines::hosted::{HostedEndpoint, HostedEndpointConfig};
#[cfg(feature = "whisper")]
use stt_bench::engines::whisper::{WhisperPredictor, WhisperPredictorConfig};
#[cfg(feature = "whisper")]
use stt_bench::models;
use stt_bench::{report, BoxError, TranscriptionOutput, TranscriptionService};

#[derive(Parser, Debug)]
#[command(
    about = "Benchmark transcription latency for audio of increasing length",
    version
)]
struct Args {
    /// Path to the base audio clip (16 kHz 16-bit mono WAV)
    audio_file_path: PathBuf,

    /// Maximum number of times the base clip is repeated
    #[arg(default_value_t = 10)]
    max_repeats: u32,

    /// Transcription repetitions per audio length
    #[arg(default_value_t = 3)]
    reps_per_length: u32,

    /// Which transcription backend to benchmark
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

    /// Output path for the chart image
    #[arg(long, default_value = "transcription_time_plot.png")]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EngineChoice {
    Hosted,
    #[cfg(feature = "whisper")]
    Whisper,
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

fn run(args: Args) -> Result<(), BenchError> {
    let engine = build_engine(&args)
        .map_err(|source| BenchError::CollaboratorUnavailable { source })?;

    let config = BenchConfig {
        max_repeats: args.max_repeats,
        reps_per_length: args.reps_per_length,
    };
    let mut runner = BenchmarkRunner::new(engine, config)?;
    let result = runner.run(&args.audio_file_path)?;

    // Summary first: the raw numbers must survive a chart failure.
    report::print_summary(&result);
    report::render_chart(&result, args.reps_per_length, &args.output)?;
    println!("Saved chart to {}", args.output.display());
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            // clap exits with code 2 on argument errors; this driver
            // promises usage text plus exit code 1.
            let _ = err.print();
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("bench_cli failed: {e}");
        process::exit(1);
    }
}
