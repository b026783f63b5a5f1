//! CSV rendering of the dataset data matrix.

use csv::WriterBuilder;
use pangaea_core::{DataTable, Dataset, ExportLog};
use serde_json::Value as JsonValue;
use std::borrow::Cow;

use crate::error::ExportResult;

/// Renders the dataset payload as CSV text.
///
/// Header row of column names, one line per row, no index column. On any
/// fault an error is logged and the empty string is returned.
pub fn serialize_tabular_data(dataset: &Dataset, log: &mut ExportLog) -> String {
    match write_csv(&dataset.data) {
        Ok(csv) => csv,
        Err(e) => {
            log.error(format!("Frictionless CSV creation failed: {e}"));
            String::new()
        }
    }
}

fn write_csv(table: &DataTable) -> ExportResult<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    if !table.columns.is_empty() {
        writer.write_record(&table.columns)?;
    }

    for row in &table.rows {
        let cells: Vec<Cow<'_, str>> = row.iter().map(cell_text).collect();
        writer.write_record(cells.iter().map(|cell| cell.as_bytes()))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn cell_text(value: &JsonValue) -> Cow<'_, str> {
    match value {
        JsonValue::Null => Cow::Borrowed(""),
        JsonValue::String(text) => Cow::Borrowed(text),
        JsonValue::Bool(true) => Cow::Borrowed("true"),
        JsonValue::Bool(false) => Cow::Borrowed("false"),
        JsonValue::Number(number) => Cow::Owned(number.to_string()),
        nested => Cow::Owned(nested.to_string()),
    }
}
