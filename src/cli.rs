use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use ambient_probe::analysis::{self, average_energy, EnergyLog, EnergyMonitor, SpectrogramParams};
use ambient_probe::audio::{AudioError, AudioLoader, Waveform};
use ambient_probe::config::{self, Config};
use ambient_probe::table::ToTable;

/// Ambient audio feature extraction toolkit
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Decimal places in the output table
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Log debug information to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Band power over time windows
    Spectrogram(SpectrogramArgs),

    /// Strongest autocorrelation lags per segment
    Periodicity(PeriodicityArgs),

    /// Mean amplitude envelope per segment and decay rate
    Envelope(SegmentArgs),

    /// Spectral flatness per segment
    Tonality(SegmentArgs),

    /// Higuchi fractal dimension per segment and overall
    Complexity(ComplexityArgs),

    /// Amplitude entropy per segment and overall
    Entropy(EntropyArgs),

    /// Zero-crossing rate per segment
    Zcr(SegmentArgs),

    /// Compare the energy of several recordings against a rolling history
    Monitor(MonitorArgs),
}

#[derive(Args)]
struct SpectrogramArgs {
    /// Path to the input audio file
    #[arg(required = true)]
    audio_file: PathBuf,

    /// Lower frequency cutoff (Hz)
    #[arg(long, default_value_t = 0.0)]
    cutoff_lo: f64,

    /// Upper frequency cutoff (Hz)
    #[arg(long, default_value_t = 2000.0)]
    cutoff_hi: f64,

    /// Position in audio to begin analysis (seconds)
    #[arg(long)]
    start: Option<f64>,

    /// Position in audio to end analysis (seconds)
    #[arg(long)]
    end: Option<f64>,

    /// Number of time windows
    #[arg(long, default_value_t = 5)]
    time_bins: usize,

    /// Number of frequency bins (1 reports raw power per window)
    #[arg(long, default_value_t = 20)]
    freq_bins: usize,

    /// Analyze left and right channels separately
    #[arg(long)]
    stereo: bool,
}

#[derive(Args)]
struct PeriodicityArgs {
    #[arg(required = true)]
    audio_file: PathBuf,

    /// Peaks reported per segment
    #[arg(long)]
    top_k: Option<usize>,

    /// Number of segments
    #[arg(long)]
    segments: Option<usize>,
}

#[derive(Args)]
struct SegmentArgs {
    #[arg(required = true)]
    audio_file: PathBuf,

    /// Number of segments
    #[arg(long)]
    segments: Option<usize>,
}

#[derive(Args)]
struct ComplexityArgs {
    #[arg(required = true)]
    audio_file: PathBuf,

    #[arg(long)]
    segments: Option<usize>,

    /// Higuchi k_max per segment
    #[arg(long)]
    segment_kmax: Option<usize>,

    /// Higuchi k_max over the whole recording
    #[arg(long)]
    global_kmax: Option<usize>,
}

#[derive(Args)]
struct EntropyArgs {
    #[arg(required = true)]
    audio_file: PathBuf,

    #[arg(long)]
    segments: Option<usize>,

    /// Amplitude histogram bins
    #[arg(long)]
    bins: Option<usize>,
}

#[derive(Args)]
struct MonitorArgs {
    /// Recordings to compare, in order
    #[arg(required = true, num_args = 1..)]
    audio_files: Vec<PathBuf>,

    /// Ratio over the rolling mean that counts as a spike
    #[arg(long, default_value_t = analysis::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Number of readings kept in the rolling history
    #[arg(long, default_value_t = analysis::DEFAULT_HISTORY_LEN)]
    history: usize,

    #[arg(long, default_value_t = 0.0)]
    cutoff_lo: f64,

    #[arg(long, default_value_t = 2000.0)]
    cutoff_hi: f64,

    /// Time windows per recording
    #[arg(long, default_value_t = 4)]
    time_bins: usize,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "ambient_probe=debug"
    } else {
        "ambient_probe=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn load(loader: &AudioLoader, path: &Path) -> Result<Waveform, AudioError> {
    let waveform = loader.load(path)?;
    tracing::debug!(
        "Loaded {}: {:.2}s, {} channel(s) at {}Hz",
        path.display(),
        waveform.duration(),
        waveform.channels(),
        waveform.sample_rate()
    );
    Ok(waveform)
}

fn run_spectrogram(
    loader: &AudioLoader,
    args: &SpectrogramArgs,
) -> Result<Box<dyn ToTable>, AudioError> {
    let waveform = load(loader, &args.audio_file)?;
    let params = SpectrogramParams {
        cutoff_lo: args.cutoff_lo,
        cutoff_hi: args.cutoff_hi,
        start: args.start,
        end: args.end,
        time_bins: args.time_bins,
        freq_bins: args.freq_bins,
    };

    if args.stereo {
        Ok(Box::new(analysis::compute_stereo_spectrogram(&waveform, &params)?))
    } else {
        Ok(Box::new(analysis::compute_spectrogram(&waveform, &params)?))
    }
}

fn run_monitor(loader: &AudioLoader, args: &MonitorArgs) -> Result<EnergyLog, AudioError> {
    let params = SpectrogramParams {
        cutoff_lo: args.cutoff_lo,
        cutoff_hi: args.cutoff_hi,
        start: None,
        end: None,
        time_bins: args.time_bins,
        freq_bins: 1,
    };
    let mut monitor = EnergyMonitor::new(args.history, args.threshold);
    let mut log = EnergyLog::default();

    for path in &args.audio_files {
        let waveform = load(loader, path)?;
        let spectrogram = analysis::compute_spectrogram(&waveform, &params)?;
        let observation = monitor.observe(average_energy(&spectrogram));
        log.entries.push((path.display().to_string(), observation));
    }

    Ok(log)
}

fn run_command(config: &Config, command: &Commands) -> Result<Box<dyn ToTable>, AudioError> {
    let loader = config.loader();

    let result: Box<dyn ToTable> = match command {
        Commands::Spectrogram(args) => run_spectrogram(&loader, args)?,
        Commands::Periodicity(args) => {
            let mut params = config.periodicity_params();
            params.top_k = args.top_k.unwrap_or(params.top_k);
            params.segments = args.segments.unwrap_or(params.segments);
            let waveform = load(&loader, &args.audio_file)?;
            Box::new(analysis::analyze_periodicity(&waveform, &params)?)
        }
        Commands::Envelope(args) => {
            let params = segment_params(config, args);
            let waveform = load(&loader, &args.audio_file)?;
            Box::new(analysis::analyze_envelope(&waveform, &params)?)
        }
        Commands::Tonality(args) => {
            let params = segment_params(config, args);
            let waveform = load(&loader, &args.audio_file)?;
            Box::new(analysis::analyze_tonality(&waveform, &params)?)
        }
        Commands::Complexity(args) => {
            let mut params = config.complexity_params();
            params.segments = args.segments.unwrap_or(params.segments);
            params.segment_kmax = args.segment_kmax.unwrap_or(params.segment_kmax);
            params.global_kmax = args.global_kmax.unwrap_or(params.global_kmax);
            let waveform = load(&loader, &args.audio_file)?;
            Box::new(analysis::analyze_complexity(&waveform, &params)?)
        }
        Commands::Entropy(args) => {
            let mut params = config.entropy_params();
            params.segments = args.segments.unwrap_or(params.segments);
            params.bins = args.bins.unwrap_or(params.bins);
            let waveform = load(&loader, &args.audio_file)?;
            Box::new(analysis::analyze_entropy(&waveform, &params)?)
        }
        Commands::Zcr(args) => {
            let params = segment_params(config, args);
            let waveform = load(&loader, &args.audio_file)?;
            Box::new(analysis::analyze_zero_crossings(&waveform, &params)?)
        }
        Commands::Monitor(args) => Box::new(run_monitor(&loader, args)?),
    };

    Ok(result)
}

fn segment_params(config: &Config, args: &SegmentArgs) -> analysis::SegmentParams {
    let mut params = config.segment_params();
    params.segments = args.segments.unwrap_or(params.segments);
    params
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => config::load_config()?,
    };

    let mut formatter = config.formatter();
    if let Some(precision) = cli.precision {
        formatter.precision = precision;
    }

    let result = run_command(&config, &cli.command)?;
    let output = formatter.render(result.as_ref());
    io::stdout().write_all(output.as_bytes())?;

    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(err) => {
            eprintln!("\nERROR: {}\n", err);
            if let Some(AudioError::Decode(msg)) = err.downcast_ref::<AudioError>() {
                if msg.starts_with("Audio file not found") {
                    eprintln!("Please check that:");
                    eprintln!("1. The file path is correct");
                    eprintln!("2. The file exists");
                    eprintln!("3. You have permission to read the file");
                } else if msg.starts_with("Failed to run transcoder") {
                    eprintln!("Non-WAV recordings need ffmpeg installed and on PATH,");
                    eprintln!("or set [loader] ffmpeg in config.toml.");
                }
            }
            process::exit(1);
        }
    }
}
