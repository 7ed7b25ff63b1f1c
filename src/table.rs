//! Structured analysis results.
//!
//! Every analyzer produces a [`Table`]: a header, and rows made of a text
//! label followed by typed cells. Tables are serialized to text by
//! [`crate::format::Formatter`].

/// A single value in a result table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Formatted with the formatter's fixed precision
    Float(f64),
    /// Formatted with its own fixed precision
    Precise(f64, usize),
    Int(i64),
    Text(String),
}

/// One table row: a label (time range, segment or aggregate name) and cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Header of the label column
    pub label_header: String,
    /// Headers of the value columns
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new<S: Into<String>>(label_header: S, columns: Vec<String>) -> Self {
        Table {
            label_header: label_header.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, label: S, cells: Vec<Cell>) {
        self.rows.push(Row {
            label: label.into(),
            cells,
        });
    }

    /// Full header line: label header followed by the value columns.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(self.label_header.as_str())
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }
}

/// Results that can be laid out as a [`Table`].
pub trait ToTable {
    fn to_table(&self) -> Table;
}
