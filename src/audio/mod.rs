/// Audio loading module for turning recordings into in-memory waveforms.
///
/// This module provides functionality to:
/// - Read and parse WAV files
/// - Transcode other containers through an external `ffmpeg`
/// - Downmix multi-channel recordings to mono
mod loader;
mod types;

pub use loader::{load_audio, read_wav_file, AudioLoader, DEFAULT_FFMPEG};
pub use types::{AudioError, Waveform};
