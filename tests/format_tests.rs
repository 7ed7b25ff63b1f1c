// Output formatting tests
//
// These tests check the delimited text produced for each kind of result:
// - Header layout and fixed-precision values
// - Aggregate rows (Overall, Decay Rate)
// - Custom precision and delimiter
// - Quoting of fields that contain the delimiter

use ambient_probe::analysis::{
    compute_spectrogram, EnergyLog, EnergyMonitor, EnvelopeReport, Peak, PeriodicityReport,
    SegmentPeaks, SegmentSeries, SegmentValue, SpectrogramParams,
};
use ambient_probe::audio::Waveform;
use ambient_probe::table::{Cell, Table};
use ambient_probe::Formatter;

use test_utils::{parse_csv, sine, RATE};

fn series(name: &str, values: &[f64]) -> SegmentSeries {
    SegmentSeries::new(
        name,
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| SegmentValue {
                label: format!("{}.00-{}.00s", i, i + 1),
                value,
            })
            .collect(),
    )
}

/// Spectrogram output has a Time column followed by one column per band.
#[test]
fn test_spectrogram_csv_layout() {
    let waveform = Waveform::mono(sine(440.0, RATE, 3.0, 0.8), RATE).unwrap();
    let params = SpectrogramParams {
        freq_bins: 3,
        ..Default::default()
    };
    let spectrogram = compute_spectrogram(&waveform, &params).unwrap();

    let output = Formatter::default().render(&spectrogram);
    assert!(output.ends_with('\n'));

    let rows = parse_csv(&output);
    assert_eq!(rows[0], vec!["Time", "0-666Hz", "666-1333Hz", "1333-2000Hz"]);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1][0], "0.00-0.60s");

    for row in &rows[1..] {
        assert_eq!(row.len(), 4);
        for field in &row[1..] {
            let (_, decimals) = field.split_once('.').expect("fixed-point value");
            assert_eq!(decimals.len(), 3);
            assert!(field.parse::<f64>().unwrap() >= 0.0);
        }
        // The tone sits in the lowest band
        assert_eq!(row[1], "1.000");
    }
}

#[test]
fn test_series_with_overall_row() {
    let result = series("Entropy", &[1.0, 2.5]).with_overall(3.14159);
    let output = Formatter::default().render(&result);

    assert_eq!(
        output,
        "Segment,Entropy\n0.00-1.00s,1.000\n1.00-2.00s,2.500\nOverall,3.142\n"
    );
}

#[test]
fn test_series_without_overall_row() {
    let output = Formatter::default().render(&series("ZCR", &[0.1]));
    assert_eq!(output, "Segment,ZCR\n0.00-1.00s,0.100\n");
}

/// The decay rate keeps its own precision regardless of the formatter's.
#[test]
fn test_envelope_decay_row() {
    let report = EnvelopeReport {
        series: series("Envelope", &[0.5, 0.25]),
        decay_rate: 0.000012345,
    };

    let output = Formatter::new(2, ',').render(&report);
    let rows = parse_csv(&output);
    assert_eq!(rows[0], vec!["Segment", "Envelope"]);
    assert_eq!(rows[1], vec!["0.00-1.00s", "0.50"]);
    assert_eq!(rows[3], vec!["Decay Rate", "0.000012345"]);
}

#[test]
fn test_periodicity_layout() {
    let report = PeriodicityReport {
        sample_rate: 8000,
        segments: vec![SegmentPeaks {
            label: "0.00-0.10s".to_string(),
            peaks: vec![
                Peak {
                    lag: 20,
                    strength: 0.975,
                },
                Peak {
                    lag: 40,
                    strength: -0.5,
                },
            ],
        }],
    };

    let output = Formatter::default().render(&report);
    assert_eq!(
        output,
        "Segment,Lag,Lag (s),Strength\n\
         0.00-0.10s,20,0.002500,0.975\n\
         0.00-0.10s,40,0.005000,-0.500\n"
    );
}

#[test]
fn test_custom_precision_and_delimiter() {
    let result = series("Flatness", &[0.123456]);

    let output = Formatter::new(5, ';').render(&result);
    assert_eq!(output, "Segment;Flatness\n0.00-1.00s;0.12346\n");

    let output = Formatter::new(0, '\t').render(&result);
    assert_eq!(output, "Segment\tFlatness\n0.00-1.00s\t0\n");
}

/// Fields containing the delimiter or quotes are quoted.
#[test]
fn test_fields_are_quoted_when_needed() {
    let mut table = Table::new("File", vec!["Note".to_string()]);
    table.push_row("a,b.wav", vec![Cell::Text("say \"hi\"".to_string())]);
    table.push_row("plain.wav", vec![Cell::Int(-3)]);

    let output = Formatter::default().format(&table);
    assert_eq!(
        output,
        "File,Note\n\"a,b.wav\",\"say \"\"hi\"\"\"\nplain.wav,-3\n"
    );

    // Commas are fine once they are no longer the delimiter
    let output = Formatter::new(3, ';').format(&table);
    assert!(output.contains("a,b.wav;\"say"));
}

#[test]
fn test_energy_log_layout() {
    let mut monitor = EnergyMonitor::new(5, 1.2);
    let mut log = EnergyLog::default();
    for (name, energy) in [("quiet.wav", 1.0), ("loud.wav", 4.0)] {
        log.entries.push((name.to_string(), monitor.observe(energy)));
    }

    let output = Formatter::default().render(&log);
    assert_eq!(
        output,
        "File,Energy,Ratio,Spike\nquiet.wav,1.000,1.000,no\nloud.wav,4.000,4.000,yes\n"
    );
}
