use super::fft::{self, POWER_EPSILON};
use super::params::SegmentParams;
use super::segment::{split_segments, time_label};
use super::series::{SegmentSeries, SegmentValue};
use crate::audio::{AudioError, Waveform};

/// Spectral flatness per segment.
///
/// Values near 0 indicate a peaked, tonal spectrum; values near 1 a flat,
/// noise-like one. A silent segment yields 0.
///
/// # Arguments
/// * `waveform` - Recording to analyze
/// * `params` - Number of segments
///
/// # Errors
/// * If the parameters are invalid
/// * If the signal has fewer samples than segments
pub fn analyze_tonality(
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
            value: spectral_flatness(&signal[range.clone()]),
        })
        .collect();

    Ok(SegmentSeries::new("Flatness", values))
}

/// Geometric over arithmetic mean of the power spectrum of `segment`.
pub fn spectral_flatness(segment: &[f64]) -> f64 {
    if segment.is_empty() || segment.iter().all(|&x| x == 0.0) {
        return 0.0;
    }

    let power: Vec<f64> = fft::power_spectrum(segment)
        .into_iter()
        .map(|p| p.max(POWER_EPSILON))
        .collect();
    let n = power.len() as f64;

    // Geometric mean via logs to avoid underflow
    let geometric = (power.iter().map(|p| p.ln()).sum::<f64>() / n).exp();
    let arithmetic = power.iter().sum::<f64>() / n;

    (geometric / arithmetic).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut impulse = vec![0.0; 64];
        impulse[0] = 1.0;
        assert!((spectral_flatness(&impulse) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn silence_is_zero() {
        assert_eq!(spectral_flatness(&[0.0; 16]), 0.0);
    }
}
