use super::params::ComplexityParams;
use super::segment::{split_segments, time_label};
use super::series::{SegmentSeries, SegmentValue};
use crate::audio::{AudioError, Waveform};

/// Higuchi fractal dimension per segment and over the whole signal.
///
/// Smooth, tonal waveforms sit near 1; white noise approaches 2.
///
/// # Arguments
/// * `waveform` - Recording to analyze
/// * `params` - Number of segments and the per-segment and global `k_max`
///
/// # Returns
/// * `Result<SegmentSeries, AudioError>` - Per-segment dimensions with the
///   whole-signal dimension as the overall value
///
/// # Errors
/// * If the parameters are invalid
/// * If any segment has fewer than `segment_kmax + 1` samples, or the
///   whole signal fewer than `global_kmax + 1`
pub fn analyze_complexity(
    waveform: &Waveform,
    params: &ComplexityParams,
) -> Result<SegmentSeries, AudioError> {
    params.validate()?;
    let signal = waveform.to_mono();
    let ranges = split_segments(signal.len(), params.segments)?;

    let values = ranges
        .iter()
        .map(|range| {
            Ok(SegmentValue {
                label: time_label(range, 0, waveform.sample_rate()),
                value: higuchi_fd(&signal[range.clone()], params.segment_kmax)?,
            })
        })
        .collect::<Result<Vec<_>, AudioError>>()?;

    let overall = higuchi_fd(&signal, params.global_kmax)?;
    tracing::debug!("Overall Higuchi dimension {:.3}", overall);

    Ok(SegmentSeries::new("Fractal Dimension", values).with_overall(overall))
}

/// Higuchi fractal dimension estimate of `x` using scales `1..=kmax`.
///
/// For each scale `k` the mean normalized curve length `L(k)` over the `k`
/// decimated sub-series is computed; the dimension is the least-squares
/// slope of `ln L(k)` against `ln(1/k)`. Scales where the length vanishes
/// are left out of the fit; a constant input yields 0.
///
/// # Errors
/// * If `kmax < 2` or `x` has fewer than `kmax + 1` samples
pub fn higuchi_fd(x: &[f64], kmax: usize) -> Result<f64, AudioError> {
    let n = x.len();
    if kmax < 2 {
        return Err(AudioError::InvalidParams(format!(
            "k_max must be at least 2, got {}",
            kmax
        )));
    }
    if n < kmax + 1 {
        return Err(AudioError::DegenerateSignal(format!(
            "Higuchi estimate with k_max={} needs at least {} samples, got {}",
            kmax,
            kmax + 1,
            n
        )));
    }

    let mut log_inv_k = Vec::with_capacity(kmax);
    let mut log_length = Vec::with_capacity(kmax);

    for k in 1..=kmax {
        let mut total = 0.0;
        let mut curves = 0usize;

        for m in 0..k {
            let steps = (n - m - 1) / k;
            if steps == 0 {
                continue;
            }
            let length: f64 = (1..=steps)
                .map(|i| (x[m + i * k] - x[m + (i - 1) * k]).abs())
                .sum();
            let norm = (n - 1) as f64 / (steps * k) as f64;
            total += length * norm / k as f64;
            curves += 1;
        }

        let mean_length = total / curves as f64;
        if mean_length <= 0.0 {
            // No length at the finest scale means the input is constant
            if k == 1 {
                return Ok(0.0);
            }
            // A period dividing k hides all variation at that scale
            continue;
        }

        log_inv_k.push((1.0 / k as f64).ln());
        log_length.push(mean_length.ln());
    }

    if log_inv_k.len() < 2 {
        return Ok(0.0);
    }
    Ok(slope(&log_inv_k, &log_length))
}

/// Least-squares slope of `y` against `x`.
fn slope(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (num, den) = x.iter().zip(y).fold((0.0, 0.0), |(num, den), (&xi, &yi)| {
        let dx = xi - mean_x;
        (num + dx * (yi - mean_y), den + dx * dx)
    });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
