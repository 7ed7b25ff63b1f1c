/// A decoded recording held fully in memory.
///
/// Samples are interleaved by frame and normalized to the [-1, 1] range.
/// A `Waveform` is immutable once built; analyzers borrow it and derive
/// their own working buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

/// Errors that can occur during audio loading and analysis
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// IO errors when writing results
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source missing or corrupt, or the external transcoder failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid parameter values
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The signal is too short to analyze with the requested parameters
    #[error("Degenerate signal: {0}")]
    DegenerateSignal(String),
}

impl Waveform {
    /// Builds a waveform from interleaved samples.
    ///
    /// # Errors
    /// * If the sample rate or channel count is zero
    /// * If there is not at least one full frame of samples
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidParams(
                "Sample rate must be positive".to_string(),
            ));
        }
        if channels == 0 {
            return Err(AudioError::InvalidParams(
                "Channel count must be positive".to_string(),
            ));
        }
        if samples.len() < channels as usize {
            return Err(AudioError::DegenerateSignal(
                "Waveform contains no samples".to_string(),
            ));
        }

        let mut samples = samples;
        // Drop a dangling partial frame
        samples.truncate(samples.len() - samples.len() % channels as usize);

        Ok(Waveform {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Builds a single-channel waveform.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AudioError> {
        Self::new(samples, sample_rate, 1)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Returns the mono signal, averaging all channels frame by frame.
    ///
    /// Averaging (rather than summing) keeps the downmix in the same
    /// amplitude range as the source channels.
    pub fn to_mono(&self) -> Vec<f64> {
        let channels = self.channels as usize;
        if channels == 1 {
            return self.samples.iter().map(|&s| s as f64).collect();
        }

        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().map(|&s| s as f64).sum::<f64>() / channels as f64)
            .collect()
    }

    /// Extracts one channel as a contiguous signal.
    ///
    /// # Errors
    /// * If `index` is not a valid channel
    pub fn channel(&self, index: usize) -> Result<Vec<f64>, AudioError> {
        let channels = self.channels as usize;
        if index >= channels {
            return Err(AudioError::InvalidParams(format!(
                "Channel {} requested from a {}-channel waveform",
                index, channels
            )));
        }

        Ok(self
            .samples
            .iter()
            .skip(index)
            .step_by(channels)
            .map(|&s| s as f64)
            .collect())
    }

    /// Collapses a multi-channel waveform into a mono one.
    pub fn downmix(&self) -> Waveform {
        if self.channels == 1 {
            return self.clone();
        }

        Waveform {
            samples: self.to_mono().into_iter().map(|s| s as f32).collect(),
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }
}
