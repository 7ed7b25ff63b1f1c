use crate::table::{Cell, Table, ToTable};

/// Label used for whole-signal aggregates.
pub const OVERALL_LABEL: &str = "Overall";

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentValue {
    pub label: String,
    pub value: f64,
}

/// One scalar per segment, optionally followed by a whole-signal value.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSeries {
    /// Name of the measured quantity, used as the value column header
    pub name: String,
    pub values: Vec<SegmentValue>,
    pub overall: Option<f64>,
}

impl SegmentSeries {
    pub fn new<S: Into<String>>(name: S, values: Vec<SegmentValue>) -> Self {
        SegmentSeries {
            name: name.into(),
            values,
            overall: None,
        }
    }

    pub fn with_overall(mut self, overall: f64) -> Self {
        self.overall = Some(overall);
        self
    }

    /// Segment values without labels.
    pub fn scalars(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.value).collect()
    }
}

impl ToTable for SegmentSeries {
    fn to_table(&self) -> Table {
        let mut table = Table::new("Segment", vec![self.name.clone()]);
        for value in &self.values {
            table.push_row(value.label.clone(), vec![Cell::Float(value.value)]);
        }
        if let Some(overall) = self.overall {
            table.push_row(OVERALL_LABEL, vec![Cell::Float(overall)]);
        }
        table
    }
}
