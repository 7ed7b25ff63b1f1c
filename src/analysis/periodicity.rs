use super::fft;
use super::params::PeriodicityParams;
use super::segment::{split_segments, time_label};
use crate::audio::{AudioError, Waveform};
use crate::table::{Cell, Table, ToTable};

/// An autocorrelation peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Lag in samples (always at least 1)
    pub lag: usize,
    /// Autocorrelation relative to lag zero, in [-1, 1]
    pub strength: f64,
}

/// Peaks of one segment, ordered by increasing lag.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPeaks {
    pub label: String,
    pub peaks: Vec<Peak>,
}

/// Autocorrelation peaks for every segment of a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicityReport {
    pub sample_rate: u32,
    pub segments: Vec<SegmentPeaks>,
}

/// Finds the strongest autocorrelation lags in each segment.
///
/// The DC offset of the whole signal is removed first. A silent segment
/// yields zero strengths at the smallest lags.
///
/// # Arguments
/// * `waveform` - Recording to analyze
/// * `params` - Number of segments and peaks per segment
///
/// # Returns
/// * `Result<PeriodicityReport, AudioError>` - Peaks for every segment
///
/// # Errors
/// * If the parameters are invalid
/// * If the signal has fewer samples than segments
pub fn analyze_periodicity(
    waveform: &Waveform,
    params: &PeriodicityParams,
) -> Result<PeriodicityReport, AudioError> {
    params.validate()?;

    let mut signal = waveform.to_mono();
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    signal.iter_mut().for_each(|x| *x -= mean);

    let ranges = split_segments(signal.len(), params.segments)?;
    tracing::debug!(
        "Autocorrelation over {} segments, top {} peaks",
        ranges.len(),
        params.top_k
    );

    let segments = ranges
        .iter()
        .map(|range| SegmentPeaks {
            label: time_label(range, 0, waveform.sample_rate()),
            peaks: top_peaks(&signal[range.clone()], params.top_k),
        })
        .collect();

    Ok(PeriodicityReport {
        sample_rate: waveform.sample_rate(),
        segments,
    })
}

/// Picks the `k` largest-magnitude normalized autocorrelation values at
/// lags of one sample or more, returned in lag order.
fn top_peaks(segment: &[f64], k: usize) -> Vec<Peak> {
    let acf = fft::autocorrelation(segment);
    let zero_lag = acf.first().copied().unwrap_or(0.0);

    let mut candidates: Vec<Peak> = acf
        .iter()
        .enumerate()
        .skip(1)
        .map(|(lag, &r)| Peak {
            lag,
            strength: if zero_lag > 0.0 {
                (r / zero_lag).clamp(-1.0, 1.0)
            } else {
                0.0
            },
        })
        .collect();

    // Stable sort keeps smaller lags first among equal magnitudes
    candidates.sort_by(|a, b| b.strength.abs().total_cmp(&a.strength.abs()));
    candidates.truncate(k);
    candidates.sort_by_key(|p| p.lag);
    candidates
}

impl ToTable for PeriodicityReport {
    fn to_table(&self) -> Table {
        let mut table = Table::new(
            "Segment",
            vec![
                "Lag".to_string(),
                "Lag (s)".to_string(),
                "Strength".to_string(),
            ],
        );
        let rate = self.sample_rate as f64;

        for segment in &self.segments {
            for peak in &segment.peaks {
                table.push_row(
                    segment.label.clone(),
                    vec![
                        Cell::Int(peak.lag as i64),
                        Cell::Precise(peak.lag as f64 / rate, 6),
                        Cell::Float(peak.strength),
                    ],
                );
            }
        }
        table
    }
}
