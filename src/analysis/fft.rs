use rustfft::{num_complex::Complex, FftPlanner};

/// Floor applied to power values before taking logarithms.
pub const POWER_EPSILON: f64 = 1e-12;

/// Performs a forward FFT on real-valued samples.
///
/// The output has the same length as the input and is not normalized.
pub fn forward(samples: &[f64]) -> Vec<Complex<f64>> {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(samples.len());

    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    buffer
}

/// Squared magnitude of every FFT component.
pub fn power_spectrum(samples: &[f64]) -> Vec<f64> {
    forward(samples).iter().map(|c| c.norm_sqr()).collect()
}

/// Frequency in Hz of each FFT component.
///
/// Components past the midpoint carry negative frequencies, in the order
/// the transform returns them.
pub fn frequencies(len: usize, sample_rate: u32) -> Vec<f64> {
    let step = sample_rate as f64 / len as f64;
    let positive = (len + 1) / 2;
    (0..len)
        .map(|k| {
            if k < positive {
                k as f64 * step
            } else {
                (k as f64 - len as f64) * step
            }
        })
        .collect()
}

/// Linear autocorrelation for lags `0..len`.
///
/// `r[k] = sum_i x[i] * x[i + k]`, computed through a zero-padded FFT so it
/// stays fast for long segments.
pub fn autocorrelation(samples: &[f64]) -> Vec<f64> {
    let len = samples.len();
    if len == 0 {
        return Vec::new();
    }

    let padded = (2 * len - 1).next_power_of_two();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(padded);
    let ifft = planner.plan_fft_inverse(padded);

    let mut buffer = vec![Complex::new(0.0, 0.0); padded];
    for (slot, &x) in buffer.iter_mut().zip(samples) {
        *slot = Complex::new(x, 0.0);
    }

    fft.process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex::new(c.norm_sqr(), 0.0);
    }
    ifft.process(&mut buffer);

    buffer[..len].iter().map(|c| c.re / padded as f64).collect()
}

/// Analytic signal of a real input via the Hilbert transform.
///
/// The positive-frequency half of the spectrum is doubled, the negative
/// half zeroed, and the result transformed back. Its magnitude is the
/// instantaneous amplitude envelope.
pub fn analytic_signal(samples: &[f64]) -> Vec<Complex<f64>> {
    let len = samples.len();
    if len == 0 {
        return Vec::new();
    }

    let mut spectrum = forward(samples);

    let half = len / 2;
    for (k, c) in spectrum.iter_mut().enumerate() {
        let gain = if k == 0 || (len % 2 == 0 && k == half) {
            1.0
        } else if k < (len + 1) / 2 {
            2.0
        } else {
            0.0
        };
        *c *= gain;
    }

    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(len);
    ifft.process(&mut spectrum);

    let scale = 1.0 / len as f64;
    spectrum.iter().map(|&c| c * scale).collect()
}
