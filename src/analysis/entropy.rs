use super::params::EntropyParams;
use super::segment::{split_segments, time_label};
use super::series::{SegmentSeries, SegmentValue};
use crate::audio::{AudioError, Waveform};

/// Shannon entropy of the amplitude distribution, per segment and overall.
///
/// # Arguments
/// * `waveform` - Recording to analyze
/// * `params` - Number of segments and histogram bins
///
/// # Returns
/// * `Result<SegmentSeries, AudioError>` - Entropy in bits per segment,
///   with the whole-signal entropy as the overall value
///
/// # Errors
/// * If the parameters are invalid
/// * If the signal has fewer samples than segments
pub fn analyze_entropy(
    waveform: &Waveform,
    params: &EntropyParams,
) -> Result<SegmentSeries, AudioError> {
    params.validate()?;
    let signal = waveform.to_mono();
    let ranges = split_segments(signal.len(), params.segments)?;

    let values = ranges
        .iter()
        .map(|range| SegmentValue {
            label: time_label(range, 0, waveform.sample_rate()),
            value: amplitude_entropy(&signal[range.clone()], params.bins),
        })
        .collect();

    let overall = amplitude_entropy(&signal, params.bins);

    Ok(SegmentSeries::new("Entropy", values).with_overall(overall))
}

/// Entropy in bits of a `bins`-bin histogram of `samples`.
///
/// The histogram spans the sample range; a constant input lands in a
/// single bin and has entropy 0.
pub fn amplitude_entropy(samples: &[f64], bins: usize) -> f64 {
    if samples.is_empty() || bins == 0 {
        return 0.0;
    }

    let counts = histogram(samples, bins);
    let total = samples.len() as f64;

    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

fn histogram(samples: &[f64], bins: usize) -> Vec<usize> {
    let (mut lo, mut hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &x in samples {
        // The top edge belongs to the last bin
        let index = (((x - lo) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
}
