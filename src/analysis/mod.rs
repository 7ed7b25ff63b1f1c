/// Feature extraction over fully loaded waveforms.
///
/// Every analyzer is a pure function of a borrowed [`Waveform`](crate::audio::Waveform)
/// and a validated parameter struct. Analyzers share no state and can run
/// concurrently on separate waveforms.
mod complexity;
mod energy;
mod entropy;
mod envelope;
pub mod fft;
mod params;
mod periodicity;
pub mod segment;
mod series;
mod spectrogram;
mod tonality;
mod zero_crossing;

pub use complexity::{analyze_complexity, higuchi_fd};
pub use energy::{
    average_energy, EnergyLog, EnergyMonitor, EnergyObservation, DEFAULT_HISTORY_LEN,
    DEFAULT_THRESHOLD,
};
pub use entropy::{amplitude_entropy, analyze_entropy};
pub use envelope::{analyze_envelope, EnvelopeReport};
pub use params::{
    ComplexityParams, EntropyParams, PeriodicityParams, SegmentParams, SpectrogramParams,
    DEFAULT_GLOBAL_KMAX, DEFAULT_HISTOGRAM_BINS, DEFAULT_PERIODICITY_SEGMENTS,
    DEFAULT_SEGMENTS, DEFAULT_SEGMENT_KMAX, DEFAULT_TOP_K,
};
pub use periodicity::{analyze_periodicity, Peak, PeriodicityReport, SegmentPeaks};
pub use segment::{FrequencyBinning, TimeSegmentation};
pub use series::{SegmentSeries, SegmentValue, OVERALL_LABEL};
pub use spectrogram::{
    compute_spectrogram, compute_stereo_spectrogram, Spectrogram, StereoSpectrogram,
};
pub use tonality::{analyze_tonality, spectral_flatness};
pub use zero_crossing::{analyze_zero_crossings, zero_crossing_rate};
