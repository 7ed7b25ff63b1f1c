//! Rolling energy tracking for spotting loud events across recordings.

use super::spectrogram::Spectrogram;
use crate::table::{Cell, Table, ToTable};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LEN: usize = 5;
pub const DEFAULT_THRESHOLD: f64 = 1.2;

/// Mean over time windows of the summed band power.
///
/// With a single frequency bin this is the mean raw power per window.
pub fn average_energy(spectrogram: &Spectrogram) -> f64 {
    if spectrogram.power.is_empty() {
        return 0.0;
    }
    let total: f64 = spectrogram
        .power
        .iter()
        .map(|row| row.iter().sum::<f64>())
        .sum();
    total / spectrogram.power.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyObservation {
    pub energy: f64,
    /// New energy relative to the mean of the earlier history
    pub ratio: f64,
    pub spike: bool,
}

/// Compares each new energy reading with a short rolling history.
#[derive(Debug, Clone)]
pub struct EnergyMonitor {
    history: VecDeque<f64>,
    history_len: usize,
    threshold: f64,
}

impl Default for EnergyMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN, DEFAULT_THRESHOLD)
    }
}

impl EnergyMonitor {
    /// `history_len` is clamped to at least 1.
    pub fn new(history_len: usize, threshold: f64) -> Self {
        let history_len = history_len.max(1);
        EnergyMonitor {
            history: VecDeque::with_capacity(history_len),
            history_len,
            threshold,
        }
    }

    /// Records `energy` and reports how it compares with earlier readings.
    ///
    /// The history keeps at most `history_len` readings including the new
    /// one. The ratio is 1 when there is no earlier reading or their mean
    /// is 0.
    pub fn observe(&mut self, energy: f64) -> EnergyObservation {
        self.history.push_back(energy);
        while self.history.len() > self.history_len {
            self.history.pop_front();
        }

        let earlier = self.history.len() - 1;
        let previous_mean = if earlier == 0 {
            0.0
        } else {
            self.history.iter().take(earlier).sum::<f64>() / earlier as f64
        };

        let ratio = if previous_mean > 0.0 {
            energy / previous_mean
        } else {
            1.0
        };

        if ratio > self.threshold {
            tracing::info!("Energy spike: ratio {:.2} over threshold {:.2}", ratio, self.threshold);
        }

        EnergyObservation {
            energy,
            ratio,
            spike: ratio > self.threshold,
        }
    }

    pub fn history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }
}

/// Observations for a sequence of labelled recordings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergyLog {
    pub entries: Vec<(String, EnergyObservation)>,
}

impl ToTable for EnergyLog {
    fn to_table(&self) -> Table {
        let mut table = Table::new(
            "File",
            vec!["Energy".to_string(), "Ratio".to_string(), "Spike".to_string()],
        );
        for (label, obs) in &self.entries {
            table.push_row(
                label.clone(),
                vec![
                    Cell::Float(obs.energy),
                    Cell::Float(obs.ratio),
                    Cell::Text(if obs.spike { "yes" } else { "no" }.to_string()),
                ],
            );
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_has_unit_ratio() {
        let mut monitor = EnergyMonitor::default();
        let obs = monitor.observe(10.0);
        assert_eq!(obs.ratio, 1.0);
        assert!(!obs.spike);
    }

    #[test]
    fn spike_is_relative_to_earlier_mean() {
        let mut monitor = EnergyMonitor::new(5, 1.2);
        monitor.observe(1.0);
        monitor.observe(1.0);
        let obs = monitor.observe(3.0);
        assert!((obs.ratio - 3.0).abs() < 1e-12);
        assert!(obs.spike);

        // 1, 1, 3 averages to 5/3
        let obs = monitor.observe(1.5);
        assert!((obs.ratio - 0.9).abs() < 1e-12);
        assert!(!obs.spike);
    }

    #[test]
    fn history_is_bounded() {
        let mut monitor = EnergyMonitor::new(3, 1.2);
        for e in [1.0, 2.0, 3.0, 4.0, 5.0] {
            monitor.observe(e);
        }
        assert_eq!(monitor.history().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
    }
}
