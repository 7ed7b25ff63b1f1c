//! Delimited text serialization of result tables.
//!
//! This is the only representation that leaves the toolkit: a header line,
//! then one line per row, values at a fixed number of decimal places.

use crate::table::{Cell, Table, ToTable};

/// Decimal places used when nothing else is configured.
pub const DEFAULT_PRECISION: usize = 3;
pub const DEFAULT_DELIMITER: char = ',';

/// Serializes tables as delimited text.
#[derive(Debug, Clone, PartialEq)]
pub struct Formatter {
    pub precision: usize,
    pub delimiter: char,
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter {
            precision: DEFAULT_PRECISION,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Formatter {
    pub fn new(precision: usize, delimiter: char) -> Self {
        Formatter {
            precision,
            delimiter,
        }
    }

    /// Formats a table. Output always ends with a newline.
    pub fn format(&self, table: &Table) -> String {
        let mut out = String::new();

        let header: Vec<String> = table.header().into_iter().map(|h| self.escape(h)).collect();
        self.push_line(&mut out, &header);

        for row in &table.rows {
            let fields: Vec<String> = std::iter::once(self.escape(&row.label))
                .chain(row.cells.iter().map(|cell| self.format_cell(cell)))
                .collect();
            self.push_line(&mut out, &fields);
        }

        out
    }

    /// Formats any result that converts to a table.
    pub fn render<T: ToTable + ?Sized>(&self, result: &T) -> String {
        self.format(&result.to_table())
    }

    fn push_line(&self, out: &mut String, fields: &[String]) {
        let delimiter = self.delimiter.to_string();
        out.push_str(&fields.join(&delimiter));
        out.push('\n');
    }

    fn format_cell(&self, cell: &Cell) -> String {
        match cell {
            Cell::Float(value) => format_fixed(*value, self.precision),
            Cell::Precise(value, precision) => format_fixed(*value, *precision),
            Cell::Int(value) => value.to_string(),
            Cell::Text(text) => self.escape(text),
        }
    }

    /// Quotes a field that contains the delimiter, a quote or a line break.
    fn escape(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

fn format_fixed(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    // Avoid "-0.000" for values that round to zero
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_is_printed_without_sign() {
        assert_eq!(format_fixed(-0.0001, 3), "0.000");
        assert_eq!(format_fixed(-0.5, 3), "-0.500");
        assert_eq!(format_fixed(2.0, 0), "2");
    }
}
