//! Pairing parsed rows with column names for display.

use crate::constants::TABULAR_SUBTYPE;
use crate::errors::{AppError, AppResult};
use crate::models::{CatalogEntry, ResourceType, Row};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a table is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::InvalidInput(format!(
                "Unknown output format '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

/// Column headers plus the rows to show under them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TabularData {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Uses every field name seen in `rows`, in order of first appearance, as the columns.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for name in rows.iter().flat_map(|row| row.names()) {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
        Self { columns, rows }
    }

    /// Renders an aligned plain-text table; missing values are left blank.
    pub fn render_text(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| {
                self.rows
                    .iter()
                    .map(|row| row.value(column).map_or(0, |v| v.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(column.chars().count())
            })
            .collect();

        let format_line = |cells: Vec<&str>| -> String {
            let line = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ");
            line.trim_end().to_string()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format_line(self.columns.iter().map(String::as_str).collect()));
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in &self.rows {
            lines.push(format_line(
                self.columns
                    .iter()
                    .map(|column| row.value(column).unwrap_or(""))
                    .collect(),
            ));
        }
        lines.join("\n")
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => self.to_json(),
        }
    }
}

/// Whether a catalog resource should be shown as a table.
///
/// True for any resource whose subtype is `tabular`, and for a map whose layers are
/// all tabular. A map without layers is not tabular.
pub fn is_tabular(entry: &CatalogEntry) -> bool {
    if entry.subtype.as_deref() == Some(TABULAR_SUBTYPE) {
        return true;
    }
    match entry.resource_type {
        ResourceType::Map => {
            !entry.datasets.is_empty()
                && entry
                    .datasets
                    .iter()
                    .all(|dataset| dataset.subtype.as_deref() == Some(TABULAR_SUBTYPE))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, Option<&str>)]) -> Row {
        let mut row = Row::new();
        for (name, value) in fields {
            row.insert(name.to_string(), value.map(str::to_string));
        }
        row
    }

    #[test]
    fn test_from_rows_unions_columns_in_first_seen_order() {
        let table = TabularData::from_rows(vec![
            row(&[("id", Some("1")), ("name", Some("a"))]),
            row(&[("id", Some("2")), ("length", Some("3.5"))]),
        ]);
        assert_eq!(table.columns, vec!["id", "name", "length"]);
    }

    #[test]
    fn test_render_text_aligns_columns() {
        let table = TabularData::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                row(&[("id", Some("1")), ("name", Some("Main St"))]),
                row(&[("id", Some("22")), ("name", None)]),
            ],
        );

        let expected = "id | name\n---+--------\n1  | Main St\n22 |";
        assert_eq!(table.render_text(), expected);
    }

    #[test]
    fn test_render_text_without_columns_is_empty() {
        let table = TabularData::default();
        assert_eq!(table.render_text(), "");
    }

    #[test]
    fn test_to_json_keeps_row_order_and_nulls() {
        let table = TabularData::new(
            vec!["id".to_string()],
            vec![row(&[("id", Some("1")), ("geom", None)])],
        );
        let value: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
        assert_eq!(value["columns"][0], "id");
        assert_eq!(value["rows"][0]["id"], "1");
        assert!(value["rows"][0]["geom"].is_null());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!(" JSON ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_is_tabular_by_subtype() {
        let entry = CatalogEntry::dataset("geonode:census", "census", Some("tabular"));
        assert!(is_tabular(&entry));

        let vector = CatalogEntry::dataset("geonode:roads", "roads", Some("vector"));
        assert!(!is_tabular(&vector));

        let no_subtype = CatalogEntry::dataset("geonode:roads", "roads", None);
        assert!(!is_tabular(&no_subtype));
    }

    #[test]
    fn test_is_tabular_map_requires_all_layers_tabular() {
        let all_tabular = CatalogEntry::map(
            "map-1",
            "stats",
            vec![
                CatalogEntry::dataset("geonode:a", "a", Some("tabular")),
                CatalogEntry::dataset("geonode:b", "b", Some("tabular")),
            ],
        );
        assert!(is_tabular(&all_tabular));

        let mixed = CatalogEntry::map(
            "map-2",
            "mixed",
            vec![
                CatalogEntry::dataset("geonode:a", "a", Some("tabular")),
                CatalogEntry::dataset("geonode:roads", "roads", Some("vector")),
            ],
        );
        assert!(!is_tabular(&mixed));
    }

    #[test]
    fn test_is_tabular_empty_map_is_false() {
        let empty = CatalogEntry::map("map-3", "empty", Vec::new());
        assert!(!is_tabular(&empty));
    }

    #[test]
    fn test_is_tabular_document_is_false() {
        let mut doc = CatalogEntry::dataset("doc-1", "report", None);
        doc.resource_type = ResourceType::Document;
        assert!(!is_tabular(&doc));
    }
}
