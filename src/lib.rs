//! Ambient Probe - multi-resolution audio feature extraction
//!
//! This library turns a recording into compact numeric summaries
//! (spectrograms, periodicity, envelope, tonality, complexity, entropy and
//! zero-crossing rate) and serializes them as small delimited text tables
//! for consumers that only accept short text payloads.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod format;
pub mod table;

pub use audio::{AudioError, AudioLoader, Waveform};
pub use format::Formatter;
pub use table::{Table, ToTable};
