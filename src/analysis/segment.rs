use crate::audio::AudioError;
use std::ops::Range;

/// Splits `len` samples into `count` contiguous ranges as evenly as possible.
///
/// The first `len % count` ranges are one sample longer than the rest, so
/// lengths never differ by more than one. Ranges may be empty when
/// `len < count`.
pub fn split_even(len: usize, count: usize) -> Vec<Range<usize>> {
    if count == 0 {
        return Vec::new();
    }

    let base = len / count;
    let extra = len % count;
    let mut ranges = Vec::with_capacity(count);
    let mut start = 0;

    for i in 0..count {
        let size = base + usize::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }

    ranges
}

/// Splits a signal into `count` near-equal segments, rejecting empty ones.
pub fn split_segments(len: usize, count: usize) -> Result<Vec<Range<usize>>, AudioError> {
    if len < count {
        return Err(AudioError::DegenerateSignal(format!(
            "Cannot split {} samples into {} non-empty segments",
            len, count
        )));
    }
    Ok(split_even(len, count))
}

/// Formats a sample range as a time label, e.g. `0.00-0.50s`.
pub fn time_label(range: &Range<usize>, offset: usize, sample_rate: u32) -> String {
    let rate = sample_rate as f64;
    format!(
        "{:.2}-{:.2}s",
        (offset + range.start) as f64 / rate,
        (offset + range.end) as f64 / rate
    )
}

/// Equal-length time windows over an analysis interval.
///
/// Windows are `len / count` samples long. Samples left over by the
/// integer division at the end of the interval are not covered.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSegmentation {
    /// First sample of the interval in the source waveform
    pub start_sample: usize,
    /// Samples per window
    pub window_len: usize,
    /// Number of windows
    pub count: usize,
    pub sample_rate: u32,
}

impl TimeSegmentation {
    /// Segments `len` samples starting at `start_sample` into `count` windows.
    ///
    /// # Errors
    /// * If `count` is zero
    /// * If the interval is too short to give every window a sample
    pub fn new(
        start_sample: usize,
        len: usize,
        count: usize,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        if count == 0 {
            return Err(AudioError::InvalidParams(
                "Time segment count must be at least 1".to_string(),
            ));
        }
        let window_len = len / count;
        if window_len == 0 {
            return Err(AudioError::DegenerateSignal(format!(
                "Interval of {} samples is too short for {} time windows",
                len, count
            )));
        }

        Ok(TimeSegmentation {
            start_sample,
            window_len,
            count,
            sample_rate,
        })
    }

    /// Sample range of window `index`, relative to the interval start.
    pub fn window(&self, index: usize) -> Range<usize> {
        let start = index * self.window_len;
        start..start + self.window_len
    }

    pub fn windows(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.count).map(move |i| self.window(i))
    }

    pub fn label(&self, index: usize) -> String {
        time_label(&self.window(index), self.start_sample, self.sample_rate)
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.count).map(|i| self.label(i)).collect()
    }
}

/// Equal-width frequency bins spanning `[lo, hi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyBinning {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

impl FrequencyBinning {
    pub fn new(lo: f64, hi: f64, count: usize) -> Result<Self, AudioError> {
        if count == 0 {
            return Err(AudioError::InvalidParams(
                "Frequency bin count must be at least 1".to_string(),
            ));
        }
        if lo < 0.0 || lo >= hi {
            return Err(AudioError::InvalidParams(format!(
                "Invalid frequency range {}-{}Hz",
                lo, hi
            )));
        }
        Ok(FrequencyBinning { lo, hi, count })
    }

    pub fn width(&self) -> f64 {
        (self.hi - self.lo) / self.count as f64
    }

    /// Bin edges, `count + 1` values from `lo` to `hi`.
    pub fn edges(&self) -> Vec<f64> {
        let width = self.width();
        (0..=self.count)
            .map(|i| {
                if i == self.count {
                    self.hi
                } else {
                    self.lo + width * i as f64
                }
            })
            .collect()
    }

    /// Bin holding `freq`. Edges are half-open, so `hi` itself falls outside.
    pub fn index_of(&self, freq: f64) -> Option<usize> {
        if freq < self.lo || freq >= self.hi {
            return None;
        }
        let index = ((freq - self.lo) / self.width()).floor() as usize;
        Some(index.min(self.count - 1))
    }

    pub fn label(&self, index: usize) -> String {
        let edges = self.edges();
        format!("{}-{}Hz", edges[index] as i64, edges[index + 1] as i64)
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.count).map(|i| self.label(i)).collect()
    }
}
