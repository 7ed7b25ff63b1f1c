use crate::audio::AudioError;

/// Segment count shared by the per-segment analyzers.
pub const DEFAULT_SEGMENTS: usize = 30;
/// Segment count used for autocorrelation.
pub const DEFAULT_PERIODICITY_SEGMENTS: usize = 10;
/// Number of autocorrelation peaks reported per segment.
pub const DEFAULT_TOP_K: usize = 5;
/// Number of amplitude histogram bins for entropy.
pub const DEFAULT_HISTOGRAM_BINS: usize = 64;
/// Higuchi scale limit applied to each segment.
pub const DEFAULT_SEGMENT_KMAX: usize = 10;
/// Higuchi scale limit applied to the whole signal.
pub const DEFAULT_GLOBAL_KMAX: usize = 30;

fn require_positive(name: &str, value: usize) -> Result<(), AudioError> {
    if value == 0 {
        return Err(AudioError::InvalidParams(format!(
            "{} must be at least 1",
            name
        )));
    }
    Ok(())
}

/// Parameters for a windowed spectrogram.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramParams {
    /// Lower frequency cutoff (Hz)
    pub cutoff_lo: f64,
    /// Upper frequency cutoff (Hz)
    pub cutoff_hi: f64,
    /// Start of the analysis interval in seconds
    pub start: Option<f64>,
    /// End of the analysis interval in seconds, clamped to the duration
    pub end: Option<f64>,
    /// Number of time windows
    pub time_bins: usize,
    /// Number of frequency bins. A single bin keeps raw power per window.
    pub freq_bins: usize,
}

impl Default for SpectrogramParams {
    fn default() -> Self {
        SpectrogramParams {
            cutoff_lo: 0.0,
            cutoff_hi: 2000.0,
            start: None,
            end: None,
            time_bins: 5,
            freq_bins: 20,
        }
    }
}

impl SpectrogramParams {
    pub fn validate(&self) -> Result<(), AudioError> {
        if !self.cutoff_lo.is_finite() || !self.cutoff_hi.is_finite() {
            return Err(AudioError::InvalidParams(
                "Frequency cutoffs must be finite".to_string(),
            ));
        }
        if self.cutoff_lo < 0.0 {
            return Err(AudioError::InvalidParams(format!(
                "Lower cutoff ({:.1}Hz) must not be negative",
                self.cutoff_lo
            )));
        }
        if self.cutoff_lo >= self.cutoff_hi {
            return Err(AudioError::InvalidParams(format!(
                "Lower cutoff ({:.1}Hz) must be below upper cutoff ({:.1}Hz)",
                self.cutoff_lo, self.cutoff_hi
            )));
        }
        require_positive("time_bins", self.time_bins)?;
        require_positive("freq_bins", self.freq_bins)?;

        if let Some(start) = self.start {
            if !start.is_finite() || start < 0.0 {
                return Err(AudioError::InvalidParams(format!(
                    "Start time ({}s) must be a non-negative number",
                    start
                )));
            }
        }
        if let Some(end) = self.end {
            if !end.is_finite() || end < 0.0 {
                return Err(AudioError::InvalidParams(format!(
                    "End time ({}s) must be a non-negative number",
                    end
                )));
            }
        }
        if let Some(end) = self.end {
            // A missing start means the beginning of the recording
            let start = self.start.unwrap_or(0.0);
            if start >= end {
                return Err(AudioError::InvalidParams(format!(
                    "Start time ({:.2}s) must be before end time ({:.2}s)",
                    start, end
                )));
            }
        }
        Ok(())
    }
}

/// Parameters for autocorrelation peak picking.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicityParams {
    /// Peaks reported per segment (default 5)
    pub top_k: usize,
    /// Number of segments (default 10)
    pub segments: usize,
}

impl Default for PeriodicityParams {
    fn default() -> Self {
        PeriodicityParams {
            top_k: DEFAULT_TOP_K,
            segments: DEFAULT_PERIODICITY_SEGMENTS,
        }
    }
}

impl PeriodicityParams {
    pub fn validate(&self) -> Result<(), AudioError> {
        require_positive("top_k", self.top_k)?;
        require_positive("segments", self.segments)
    }
}

/// Parameters shared by the envelope, tonality and zero-crossing analyzers.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentParams {
    /// Number of segments (default 30)
    pub segments: usize,
}

impl Default for SegmentParams {
    fn default() -> Self {
        SegmentParams {
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl SegmentParams {
    pub fn validate(&self) -> Result<(), AudioError> {
        require_positive("segments", self.segments)
    }
}

/// Parameters for the Higuchi fractal dimension analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityParams {
    /// Number of segments (default 30)
    pub segments: usize,
    /// Scale limit per segment (default 10)
    pub segment_kmax: usize,
    /// Scale limit over the whole signal (default 30)
    pub global_kmax: usize,
}

impl Default for ComplexityParams {
    fn default() -> Self {
        ComplexityParams {
            segments: DEFAULT_SEGMENTS,
            segment_kmax: DEFAULT_SEGMENT_KMAX,
            global_kmax: DEFAULT_GLOBAL_KMAX,
        }
    }
}

impl ComplexityParams {
    pub fn validate(&self) -> Result<(), AudioError> {
        require_positive("segments", self.segments)?;
        if self.segment_kmax < 2 || self.global_kmax < 2 {
            return Err(AudioError::InvalidParams(format!(
                "k_max must be at least 2 (segment: {}, global: {})",
                self.segment_kmax, self.global_kmax
            )));
        }
        Ok(())
    }
}

/// Parameters for the amplitude entropy analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyParams {
    /// Number of segments (default 30)
    pub segments: usize,
    /// Histogram bins (default 64)
    pub bins: usize,
}

impl Default for EntropyParams {
    fn default() -> Self {
        EntropyParams {
            segments: DEFAULT_SEGMENTS,
            bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl EntropyParams {
    pub fn validate(&self) -> Result<(), AudioError> {
        require_positive("segments", self.segments)?;
        require_positive("bins", self.bins)
    }
}
