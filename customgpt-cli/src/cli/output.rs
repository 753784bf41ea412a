//! Rendering command results: grid tables, pretty JSON and id lists

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Grid table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// One id per line
    IdOnly,
}

/// Decide whether output should be coloured and apply it globally
pub fn configure_color(no_color: bool) {
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Pretty JSON for any serializable value
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to format JSON output")
}

/// Convert a JSON value to a table cell
pub fn json_value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Format an optional counter; whole numbers print without a fraction
pub fn stat_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => v.to_string(),
        None => "N/A".to_string(),
    }
}

pub fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Plain grid table
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row; missing cells render empty, extra cells are dropped
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a table from an array of JSON objects, columns taken from the first one
    pub fn from_json_rows(items: &[Value]) -> Self {
        let headers: Vec<String> = match items.first() {
            Some(Value::Object(first)) => first.keys().cloned().collect(),
            _ => vec!["value".to_string()],
        };
        let mut table = Self::new(headers.clone());
        for item in items {
            let row = match item {
                Value::Object(obj) => headers
                    .iter()
                    .map(|h| json_value_to_string(obj.get(h).unwrap_or(&Value::Null)))
                    .collect(),
                other => vec![json_value_to_string(other)],
            };
            table.push_row(row);
        }
        table
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| cell_width(&row[i]))
                    .chain(std::iter::once(cell_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule = |fill: char| {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&fill.to_string().repeat(width + 2));
                line.push('+');
            }
            line
        };
        let line = |cells: &[String], header: bool| {
            let mut out = String::from("|");
            for (cell, width) in cells.iter().zip(&widths) {
                let padding = " ".repeat(width - cell_width(cell));
                let text = cell.replace('\n', " ");
                if header {
                    out.push_str(&format!(" {}{} |", text.bold().cyan(), padding));
                } else {
                    out.push_str(&format!(" {}{} |", text, padding));
                }
            }
            out
        };

        let mut out = vec![rule('-'), line(&self.headers, true), rule('=')];
        for row in &self.rows {
            out.push(line(row, false));
            out.push(rule('-'));
        }
        if self.rows.is_empty() {
            out.pop();
            out.push(rule('-'));
        }
        out.join("\n")
    }
}

fn cell_width(text: &str) -> usize {
    UnicodeWidthStr::width(text.replace('\n', " ").as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain(table: &Table) -> String {
        colored::control::set_override(false);
        table.render()
    }

    #[test]
    fn test_grid_layout() {
        let mut table = Table::new(["ID", "Name"]);
        table.push_row(vec!["1".into(), "ChatBot".into()]);
        table.push_row(vec!["22".into(), "Ünïcode".into()]);

        let expected = "\
+----+---------+
| ID | Name    |
+====+=========+
| 1  | ChatBot |
+----+---------+
| 22 | Ünïcode |
+----+---------+";
        assert_eq!(plain(&table), expected);
    }

    #[test]
    fn test_wide_characters_are_measured_by_display_width() {
        let mut table = Table::new(["Name"]);
        table.push_row(vec!["日本".into()]);
        let rendered = plain(&table);
        assert!(rendered.contains("| 日本 |"));
        assert!(rendered.starts_with("+------+"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec!["x".into()]);
        assert!(plain(&table).contains("| x |   |"));
    }

    #[test]
    fn test_from_json_rows() {
        let table = Table::from_json_rows(&[
            json!({ "id": 1, "name": "a", "active": true }),
            json!({ "id": 2, "name": null }),
        ]);
        let rendered = plain(&table);
        // serde_json maps iterate in key order
        assert!(rendered.contains("| active | id | name |"));
        assert!(rendered.contains("|        | 2  |      |"));
    }

    #[test]
    fn test_stat_cells() {
        assert_eq!(stat_cell(Some(15.0)), "15");
        assert_eq!(stat_cell(Some(0.5)), "0.5");
        assert_eq!(stat_cell(None), "N/A");
    }
}
