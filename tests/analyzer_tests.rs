// Per-segment analyzer tests
//
// These tests check the segment-based analyzers against signals with
// known character:
// - Autocorrelation peaks of a periodic tone
// - Envelope of silence and of a fading tone
// - Spectral flatness of a tone versus noise
// - Higuchi dimension of smooth versus random signals
// - Amplitude entropy of constant versus noisy signals
// - Zero-crossing rate of a tone

use ambient_probe::analysis::{
    analyze_complexity, analyze_entropy, analyze_envelope, analyze_periodicity,
    analyze_tonality, analyze_zero_crossings, ComplexityParams, EntropyParams,
    PeriodicityParams, SegmentParams,
};
use ambient_probe::audio::{AudioError, Waveform};

use test_utils::{noise, silence, sine, sine_with_phase, RATE};

fn mono(samples: Vec<f32>) -> Waveform {
    Waveform::mono(samples, RATE).unwrap()
}

/// The strongest positive autocorrelation peak sits at the tone's period.
#[test]
fn test_periodicity_finds_tone_period() {
    // 400Hz at 8kHz repeats every 20 samples
    let waveform = mono(sine(400.0, RATE, 1.0, 0.8));
    let report = analyze_periodicity(&waveform, &PeriodicityParams::default()).unwrap();

    assert_eq!(report.segments.len(), 10);
    for segment in &report.segments {
        assert_eq!(segment.peaks.len(), 5);
        assert!(segment.peaks.windows(2).all(|w| w[0].lag < w[1].lag));
        assert!(segment
            .peaks
            .iter()
            .all(|p| p.lag >= 1 && (-1.0..=1.0).contains(&p.strength)));

        let best = segment
            .peaks
            .iter()
            .filter(|p| p.strength > 0.0)
            .max_by(|a, b| a.strength.total_cmp(&b.strength))
            .expect("tone should have a positive peak");
        assert!((19..=21).contains(&best.lag), "best lag {}", best.lag);
    }
}

/// Silence has nothing to correlate: strengths are zero at the smallest lags.
#[test]
fn test_periodicity_of_silence_is_zero() {
    let report =
        analyze_periodicity(&mono(silence(2000)), &PeriodicityParams::default()).unwrap();
    for segment in &report.segments {
        let lags: Vec<usize> = segment.peaks.iter().map(|p| p.lag).collect();
        assert_eq!(lags, vec![1, 2, 3, 4, 5]);
        assert!(segment.peaks.iter().all(|p| p.strength == 0.0));
    }
}

#[test]
fn test_periodicity_respects_parameters() {
    let waveform = mono(noise(3001, 0.5, 21));
    let params = PeriodicityParams {
        top_k: 3,
        segments: 4,
    };
    let report = analyze_periodicity(&waveform, &params).unwrap();
    assert_eq!(report.segments.len(), 4);
    assert!(report.segments.iter().all(|s| s.peaks.len() == 3));

    let params = PeriodicityParams {
        top_k: 0,
        segments: 4,
    };
    assert!(matches!(
        analyze_periodicity(&waveform, &params),
        Err(AudioError::InvalidParams(_))
    ));
}

/// Five seconds of silence: every segment mean and the decay rate are zero.
#[test]
fn test_envelope_of_silence() {
    let waveform = mono(silence(RATE as usize * 5));
    let report = analyze_envelope(&waveform, &SegmentParams::default()).unwrap();

    assert_eq!(report.series.values.len(), 30);
    assert!(report.series.scalars().iter().all(|v| v.abs() < 1e-12));
    assert!(report.decay_rate.abs() < 1e-12);
}

/// A steady tone has a flat envelope near its amplitude.
#[test]
fn test_envelope_of_steady_tone() {
    let waveform = mono(sine(500.0, RATE, 3.0, 0.5));
    let report = analyze_envelope(&waveform, &SegmentParams::default()).unwrap();

    for value in report.series.scalars() {
        assert!((value - 0.5).abs() < 0.05, "envelope {}", value);
    }
    assert!(report.decay_rate.abs() < 1e-5);
}

/// A fading tone has a positive decay rate.
#[test]
fn test_envelope_of_fading_tone() {
    let tone = sine(500.0, RATE, 3.0, 1.0);
    let len = tone.len();
    let faded: Vec<f32> = tone
        .iter()
        .enumerate()
        .map(|(i, &s)| s * (1.0 - i as f32 / len as f32))
        .collect();

    let report = analyze_envelope(&mono(faded), &SegmentParams::default()).unwrap();
    let values = report.series.scalars();
    assert!(values[0] > values[29]);
    assert!(report.decay_rate > 0.0);
    let expected = (values[0] - values[29]) / len as f64;
    assert!((report.decay_rate - expected).abs() < 1e-15);
}

/// A pure tone is tonal (flatness near 0); noise is not.
#[test]
fn test_flatness_of_tone_and_noise() {
    // 800-sample segments hold exactly 50 cycles of 500Hz
    let tone = analyze_tonality(
        &mono(sine(500.0, RATE, 3.0, 0.8)),
        &SegmentParams::default(),
    )
    .unwrap();
    assert_eq!(tone.values.len(), 30);
    for value in tone.scalars() {
        assert!(value < 0.01, "tone flatness {}", value);
    }

    let noisy = analyze_tonality(
        &mono(noise(RATE as usize * 3, 0.8, 99)),
        &SegmentParams::default(),
    )
    .unwrap();
    let scalars = noisy.scalars();
    for &value in &scalars {
        assert!(value > 0.3 && value <= 1.0, "noise flatness {}", value);
    }
    let mean = scalars.iter().sum::<f64>() / scalars.len() as f64;
    assert!(mean > 0.45, "mean noise flatness {}", mean);
}

#[test]
fn test_flatness_of_silence_is_zero() {
    let series = analyze_tonality(&mono(silence(3000)), &SegmentParams::default()).unwrap();
    assert!(series.scalars().iter().all(|&v| v == 0.0));
}

/// Smooth signals sit near dimension 1, white noise near 2.
#[test]
fn test_complexity_of_tone_and_noise() {
    let params = ComplexityParams::default();

    let smooth = analyze_complexity(&mono(sine(50.0, RATE, 3.0, 0.8)), &params).unwrap();
    let smooth_overall = smooth.overall.expect("overall dimension");
    assert!(smooth_overall < 1.2, "sine dimension {}", smooth_overall);

    let rough = analyze_complexity(&mono(noise(RATE as usize * 3, 0.8, 5)), &params).unwrap();
    let rough_overall = rough.overall.expect("overall dimension");
    assert!(rough_overall > 1.8, "noise dimension {}", rough_overall);

    assert_eq!(rough.values.len(), 30);
    for (s, r) in smooth.scalars().iter().zip(rough.scalars()) {
        assert!(r > *s);
    }
}

/// Segments shorter than k_max + 1 samples cannot be measured.
#[test]
fn test_complexity_of_short_signal_is_degenerate() {
    let waveform = mono(noise(200, 0.5, 8));
    assert!(matches!(
        analyze_complexity(&waveform, &ComplexityParams::default()),
        Err(AudioError::DegenerateSignal(_))
    ));
}

/// A constant signal has zero entropy; noise spreads over many bins.
#[test]
fn test_entropy_of_constant_and_noise() {
    let constant = analyze_entropy(&mono(vec![0.25; 3000]), &EntropyParams::default()).unwrap();
    assert!(constant.scalars().iter().all(|&v| v == 0.0));
    assert_eq!(constant.overall, Some(0.0));

    let noisy = analyze_entropy(
        &mono(noise(RATE as usize * 3, 0.8, 17)),
        &EntropyParams::default(),
    )
    .unwrap();
    assert!(noisy.scalars().iter().all(|&v| v > 5.0 && v <= 6.0 + 1e-9));
    let overall = noisy.overall.unwrap();
    assert!(overall > 5.9 && overall <= 6.0 + 1e-9, "overall entropy {}", overall);
}

/// A 400Hz tone crosses zero twice per cycle: 0.1 crossings per sample at 8kHz.
#[test]
fn test_zero_crossing_rate_of_tone() {
    let waveform = mono(sine_with_phase(400.0, RATE, 3.0, 0.8, 0.3));
    let series = analyze_zero_crossings(&waveform, &SegmentParams::default()).unwrap();

    assert_eq!(series.values.len(), 30);
    for value in series.scalars() {
        assert!((value - 0.1).abs() < 0.01, "zcr {}", value);
    }
}

#[test]
fn test_zero_crossing_rate_of_silence() {
    let series =
        analyze_zero_crossings(&mono(silence(3000)), &SegmentParams::default()).unwrap();
    assert!(series.scalars().iter().all(|&v| v == 0.0));
}

/// Fewer samples than segments leaves empty segments.
#[test]
fn test_segment_analyzers_reject_tiny_signals() {
    let waveform = mono(noise(20, 0.5, 2));
    let params = SegmentParams::default();

    assert!(matches!(
        analyze_envelope(&waveform, &params),
        Err(AudioError::DegenerateSignal(_))
    ));
    assert!(matches!(
        analyze_tonality(&waveform, &params),
        Err(AudioError::DegenerateSignal(_))
    ));
    assert!(matches!(
        analyze_zero_crossings(&waveform, &params),
        Err(AudioError::DegenerateSignal(_))
    ));
    assert!(matches!(
        analyze_entropy(&waveform, &EntropyParams::default()),
        Err(AudioError::DegenerateSignal(_))
    ));
}
