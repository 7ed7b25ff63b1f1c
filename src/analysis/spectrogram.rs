use super::fft;
use super::params::SpectrogramParams;
use super::segment::{FrequencyBinning, TimeSegmentation};
use crate::audio::{AudioError, Waveform};
use crate::table::{Cell, Table, ToTable};
use rustfft::{num_complex::Complex, FftPlanner};

/// Band power over time for a single channel.
///
/// Rows are time windows, columns frequency bins. With more than one bin,
/// every row sums to 1 (or is all zeros for a silent window). With a
/// single bin the raw power of each window is kept, so the column tracks
/// absolute energy over time.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    pub segmentation: TimeSegmentation,
    pub binning: FrequencyBinning,
    /// `segmentation.count` rows of `binning.count` values
    pub power: Vec<Vec<f64>>,
}

/// Left and right spectrograms over the same windows and bins.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoSpectrogram {
    pub left: Spectrogram,
    pub right: Spectrogram,
}

/// Computes a spectrogram of the mono downmix of `waveform`.
///
/// # Arguments
/// * `waveform` - Recording to analyze; multi-channel input is downmixed
/// * `params` - Cutoffs, interval and bin counts
///
/// # Returns
/// * `Result<Spectrogram, AudioError>` - One row per time window
///
/// # Errors
/// * If the parameters are invalid
/// * If the trimmed interval is too short for the requested windows
pub fn compute_spectrogram(
    waveform: &Waveform,
    params: &SpectrogramParams,
) -> Result<Spectrogram, AudioError> {
    params.validate()?;
    let signal = waveform.to_mono();
    let (segmentation, binning) = layout(signal.len(), waveform.sample_rate(), params)?;
    let power = channel_power(&signal, &segmentation, &binning);

    Ok(Spectrogram {
        segmentation,
        binning,
        power,
    })
}

/// Computes independent left/right spectrograms of a two-channel waveform.
///
/// # Arguments
/// * `waveform` - Two-channel recording
/// * `params` - Cutoffs, interval and bin counts, shared by both channels
///
/// # Returns
/// * `Result<StereoSpectrogram, AudioError>` - Left and right spectrograms
///
/// # Errors
/// * If the waveform does not have exactly two channels
/// * Same conditions as [`compute_spectrogram`]
pub fn compute_stereo_spectrogram(
    waveform: &Waveform,
    params: &SpectrogramParams,
) -> Result<StereoSpectrogram, AudioError> {
    params.validate()?;
    if waveform.channels() != 2 {
        return Err(AudioError::InvalidParams(format!(
            "Stereo analysis requires a two-channel recording, got {} channel(s)",
            waveform.channels()
        )));
    }

    let left_signal = waveform.channel(0)?;
    let right_signal = waveform.channel(1)?;
    let (segmentation, binning) = layout(left_signal.len(), waveform.sample_rate(), params)?;

    let left = Spectrogram {
        power: channel_power(&left_signal, &segmentation, &binning),
        segmentation: segmentation.clone(),
        binning: binning.clone(),
    };
    let right = Spectrogram {
        power: channel_power(&right_signal, &segmentation, &binning),
        segmentation,
        binning,
    };

    Ok(StereoSpectrogram { left, right })
}

/// Resolves the trimmed interval into time windows and frequency bins.
fn layout(
    frames: usize,
    sample_rate: u32,
    params: &SpectrogramParams,
) -> Result<(TimeSegmentation, FrequencyBinning), AudioError> {
    let rate = sample_rate as f64;
    let start = ((params.start.unwrap_or(0.0) * rate) as usize).min(frames);
    let end = params
        .end
        .map(|end| ((end * rate) as usize).min(frames))
        .unwrap_or(frames);

    if start >= end {
        return Err(AudioError::DegenerateSignal(format!(
            "Requested interval starts at {:.2}s but the recording is {:.2}s long",
            params.start.unwrap_or(0.0),
            frames as f64 / rate
        )));
    }

    let segmentation = TimeSegmentation::new(start, end - start, params.time_bins, sample_rate)?;
    let binning = FrequencyBinning::new(params.cutoff_lo, params.cutoff_hi, params.freq_bins)?;

    tracing::debug!(
        "Spectrogram over samples {}..{}: {} windows of {} samples, {} bins {}-{}Hz",
        start,
        end,
        segmentation.count,
        segmentation.window_len,
        binning.count,
        binning.lo,
        binning.hi
    );

    Ok((segmentation, binning))
}

/// Accumulates binned power for every window of one channel.
fn channel_power(
    signal: &[f64],
    segmentation: &TimeSegmentation,
    binning: &FrequencyBinning,
) -> Vec<Vec<f64>> {
    let window_len = segmentation.window_len;
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(window_len);

    // Bin assignment only depends on the window length, so resolve it once
    let bin_of: Vec<Option<usize>> = fft::frequencies(window_len, segmentation.sample_rate)
        .into_iter()
        .map(|freq| binning.index_of(freq))
        .collect();

    let interval = &signal[segmentation.start_sample..];
    let mut rows = Vec::with_capacity(segmentation.count);

    for window in segmentation.windows() {
        let mut buffer: Vec<Complex<f64>> = interval[window]
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        fft.process(&mut buffer);

        let mut row = vec![0.0; binning.count];
        for (c, bin) in buffer.iter().zip(&bin_of) {
            if let Some(bin) = bin {
                row[*bin] += c.norm_sqr();
            }
        }

        if binning.count > 1 {
            normalize_row(&mut row);
        }
        rows.push(row);
    }

    rows
}

/// Scales a row to sum to 1, leaving an all-zero row untouched.
fn normalize_row(row: &mut [f64]) {
    let total: f64 = row.iter().sum();
    if total > 0.0 {
        row.iter_mut().for_each(|x| *x /= total);
    } else {
        tracing::warn!("Silent window in cutoff range, emitting a zero row");
    }
}

impl ToTable for Spectrogram {
    fn to_table(&self) -> Table {
        let mut table = Table::new("Time", self.binning.labels());
        for (i, row) in self.power.iter().enumerate() {
            table.push_row(
                self.segmentation.label(i),
                row.iter().map(|&p| Cell::Float(p)).collect(),
            );
        }
        table
    }
}

impl ToTable for StereoSpectrogram {
    fn to_table(&self) -> Table {
        let labels = self.left.binning.labels();
        let columns = labels
            .iter()
            .map(|l| format!("L {}", l))
            .chain(labels.iter().map(|l| format!("R {}", l)))
            .collect();

        let mut table = Table::new("Time", columns);
        for (i, (left, right)) in self.left.power.iter().zip(&self.right.power).enumerate() {
            table.push_row(
                self.left.segmentation.label(i),
                left.iter().chain(right).map(|&p| Cell::Float(p)).collect(),
            );
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_row_handles_silence() {
        let mut row = vec![0.0, 0.0, 0.0];
        normalize_row(&mut row);
        assert_eq!(row, vec![0.0, 0.0, 0.0]);

        let mut row = vec![1.0, 3.0];
        normalize_row(&mut row);
        assert_eq!(row, vec![0.25, 0.75]);
    }

    #[test]
    fn interval_past_end_is_degenerate() {
        let waveform = Waveform::mono(vec![0.1; 100], 100).unwrap();
        let params = SpectrogramParams {
            start: Some(5.0),
            end: Some(10.0),
            time_bins: 1,
            freq_bins: 1,
            ..Default::default()
        };
        assert!(matches!(
            compute_spectrogram(&waveform, &params),
            Err(AudioError::DegenerateSignal(_))
        ));
    }
}
