use super::fft;
use super::params::SegmentParams;
use super::segment::{split_segments, time_label};
use super::series::{SegmentSeries, SegmentValue};
use crate::audio::{AudioError, Waveform};
use crate::table::{Cell, Table, ToTable};

/// Decimal places for the decay rate, which is tiny per sample.
const DECAY_PRECISION: usize = 9;

/// Mean amplitude envelope per segment plus a coarse decay estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeReport {
    pub series: SegmentSeries,
    /// `(first segment mean - last segment mean) / sample count`
    pub decay_rate: f64,
}

/// Computes the Hilbert amplitude envelope and averages it per segment.
///
/// The decay rate is a two-point slope, enough to flag a monotonic fade
/// but not a fitted reverberation model.
///
/// # Arguments
/// * `waveform` - Recording to analyze
/// * `params` - Number of segments
///
/// # Returns
/// * `Result<EnvelopeReport, AudioError>` - Segment means and decay rate
///
/// # Errors
/// * If the parameters are invalid
/// * If the signal has fewer samples than segments
pub fn analyze_envelope(
    waveform: &Waveform,
    params: &SegmentParams,
) -> Result<EnvelopeReport, AudioError> {
    params.validate()?;
    let signal = waveform.to_mono();
    let ranges = split_segments(signal.len(), params.segments)?;

    let envelope: Vec<f64> = fft::analytic_signal(&signal)
        .iter()
        .map(|c| c.norm())
        .collect();

    let values: Vec<SegmentValue> = ranges
        .iter()
        .map(|range| {
            let slice = &envelope[range.clone()];
            SegmentValue {
                label: time_label(range, 0, waveform.sample_rate()),
                value: slice.iter().sum::<f64>() / slice.len() as f64,
            }
        })
        .collect();

    let first = values.first().map(|v| v.value).unwrap_or(0.0);
    let last = values.last().map(|v| v.value).unwrap_or(0.0);
    let decay_rate = (first - last) / envelope.len() as f64;

    tracing::debug!("Envelope decay rate {:.3e} per sample", decay_rate);

    Ok(EnvelopeReport {
        series: SegmentSeries::new("Envelope", values),
        decay_rate,
    })
}

impl ToTable for EnvelopeReport {
    fn to_table(&self) -> Table {
        let mut table = self.series.to_table();
        table.push_row(
            "Decay Rate",
            vec![Cell::Precise(self.decay_rate, DECAY_PRECISION)],
        );
        table
    }
}
