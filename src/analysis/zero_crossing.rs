use super::params::SegmentParams;
use super::segment::{split_segments, time_label};
use super::series::{SegmentSeries, SegmentValue};
use crate::audio::{AudioError, Waveform};

/// Zero-crossing rate per segment: sign changes divided by segment length.
///
/// # Errors
/// * If the parameters are invalid
/// * If the signal has fewer samples than segments
pub fn analyze_zero_crossings(
    waveform: &Waveform,
    params: &SegmentParams,
) -> Result<SegmentSeries, AudioError> {
    params.validate()?;
    let signal = waveform.to_mono();
    let ranges = split_segments(signal.len(), params.segments)?;

    let values = ranges
        .iter()
        .map(|range| SegmentValue {
            label: time_label(range, 0, waveform.sample_rate()),
            value: zero_crossing_rate(&signal[range.clone()]),
        })
        .collect();

    Ok(SegmentSeries::new("ZCR", values))
}

/// Fraction of samples at which the sign flips. Zero counts as positive.
pub fn zero_crossing_rate(segment: &[f64]) -> f64 {
    if segment.is_empty() {
        return 0.0;
    }

    let crossings = segment
        .windows(2)
        .filter(|pair| (pair[0] < 0.0) != (pair[1] < 0.0))
        .count();

    crossings as f64 / segment.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_signal_crosses_every_sample() {
        let segment = [1.0, -1.0, 1.0, -1.0];
        assert_eq!(zero_crossing_rate(&segment), 0.75);
    }

    #[test]
    fn silence_and_dc_do_not_cross() {
        assert_eq!(zero_crossing_rate(&[0.0; 10]), 0.0);
        assert_eq!(zero_crossing_rate(&[0.3; 10]), 0.0);
    }
}
