/// Results Grid Module for sqlzoo
///
/// Renders canonical rows as an aligned text table for interactive output and
/// exports them as CSV, JSON or Markdown.
use crate::core::db::CanonicalRow;
use crate::core::{Result, SqlzooError};

/// Tabular view of one result set.
#[derive(Debug, Clone)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    source: Vec<CanonicalRow>,
}

impl ResultsGrid {
    /// Builds a grid from a result set; headers come from the first row.
    pub fn from_rows(rows: &[CanonicalRow]) -> Self {
        let headers = rows
            .first()
            .map(|row| row.columns().map(String::from).collect())
            .unwrap_or_default();
        let cells = rows
            .iter()
            .map(|row| row.values().map(|value| value.to_string()).collect())
            .collect();
        ResultsGrid {
            headers,
            rows: cells,
            source: rows.to_vec(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// Renders the grid as an aligned table with a header separator.
    pub fn render(&self) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let widths = self.column_widths();
        let pad_line = |cells: &[String]| -> String {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            padded.join(" | ").trim_end().to_string()
        };

        let mut output = String::new();
        output.push_str(&pad_line(&self.headers[..]));
        output.push('\n');
        let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&underline.join("-+-"));
        output.push('\n');
        for row in &self.rows {
            output.push_str(&pad_line(&row[..]));
            output.push('\n');
        }
        output
    }

    /// Exports the grid data to a specified format.
    /// Supported formats: CSV, JSON, Markdown.
    pub fn export(&self, format: &str) -> Result<String> {
        match format.to_lowercase().as_str() {
            "csv" => Ok(self.export_to_csv()),
            "json" => self.export_to_json(),
            "markdown" => Ok(self.export_to_markdown()),
            _ => Err(SqlzooError::Output(format!(
                "Unsupported export format: '{}'. Supported formats: csv, json, markdown",
                format
            ))),
        }
    }

    fn export_to_csv(&self) -> String {
        let mut output = String::new();
        if !self.headers.is_empty() {
            output.push_str(&csv_line(&self.headers));
            output.push('\n');
        }
        for row in &self.rows {
            output.push_str(&csv_line(row));
            output.push('\n');
        }
        output
    }

    // Typed values, so numbers stay numbers and NULL stays null.
    fn export_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.source)?)
    }

    fn export_to_markdown(&self) -> String {
        let mut output = String::new();
        if !self.headers.is_empty() {
            output.push_str(&format!("| {} |\n", self.headers.join(" | ")));
            let underline: Vec<String> = self.headers.iter().map(|h| "-".repeat(h.len().max(3))).collect();
            output.push_str(&format!("| {} |\n", underline.join(" | ")));
        }
        for row in &self.rows {
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        output
    }
}

fn csv_line(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| {
            if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
