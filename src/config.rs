use crate::analysis::{
    ComplexityParams, EntropyParams, PeriodicityParams, SegmentParams, DEFAULT_GLOBAL_KMAX,
    DEFAULT_HISTOGRAM_BINS, DEFAULT_PERIODICITY_SEGMENTS, DEFAULT_SEGMENTS, DEFAULT_SEGMENT_KMAX,
    DEFAULT_TOP_K,
};
use crate::audio::{AudioLoader, DEFAULT_FFMPEG};
use crate::format::{Formatter, DEFAULT_DELIMITER, DEFAULT_PRECISION};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// Default configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Toolkit configuration, read from `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loader: LoaderConfig,
    pub analysis: AnalysisSettings,
    pub output: OutputConfig,
}

/// How recordings are decoded
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Transcoder executable used for non-WAV files
    pub ffmpeg: String,
}

/// Segment counts and analysis constants
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub segments: usize,
    pub periodicity_segments: usize,
    pub top_k: usize,
    pub histogram_bins: usize,
    pub segment_kmax: usize,
    pub global_kmax: usize,
}

/// Serialization of result tables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub precision: usize,
    pub delimiter: char,
}

/// Errors that can occur while reading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            ffmpeg: DEFAULT_FFMPEG.to_string(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            segments: DEFAULT_SEGMENTS,
            periodicity_segments: DEFAULT_PERIODICITY_SEGMENTS,
            top_k: DEFAULT_TOP_K,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            segment_kmax: DEFAULT_SEGMENT_KMAX,
            global_kmax: DEFAULT_GLOBAL_KMAX,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            precision: DEFAULT_PRECISION,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads the configuration from `path`.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn loader(&self) -> AudioLoader {
        AudioLoader::with_ffmpeg(&self.loader.ffmpeg)
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.output.precision, self.output.delimiter)
    }

    pub fn segment_params(&self) -> SegmentParams {
        SegmentParams {
            segments: self.analysis.segments,
        }
    }

    pub fn periodicity_params(&self) -> PeriodicityParams {
        PeriodicityParams {
            top_k: self.analysis.top_k,
            segments: self.analysis.periodicity_segments,
        }
    }

    pub fn complexity_params(&self) -> ComplexityParams {
        ComplexityParams {
            segments: self.analysis.segments,
            segment_kmax: self.analysis.segment_kmax,
            global_kmax: self.analysis.global_kmax,
        }
    }

    pub fn entropy_params(&self) -> EntropyParams {
        EntropyParams {
            segments: self.analysis.segments,
            bins: self.analysis.histogram_bins,
        }
    }
}

/// Load configuration from config.toml
///
/// A missing file yields the default configuration; a file that exists but
/// cannot be read or parsed is an error.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(CONFIG_FILE))
}

/// Load configuration from a specific file, falling back to defaults if it
/// does not exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Config::from_file(path)
}
