//! Flattening fetched records into a CSV file.

use std::path::Path;

use airtable_client::Record;
use indexmap::IndexSet;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{PipelineError, Result};

/// Column name for the injected record identifier.
const ID_COLUMN: &str = "id";

/// A real field named `id` is emitted under this name so the record
/// identifier always owns the `id` column.
const ID_COLLISION_COLUMN: &str = "id_";

/// A CSV serialization of a fetched table, held in a named temporary
/// file that is deleted when this value drops.
pub struct ExportedCsv {
    file: NamedTempFile,
    row_count: usize,
}

impl ExportedCsv {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

fn export_err(e: impl std::error::Error + Send + Sync + 'static) -> PipelineError {
    PipelineError::Export(Box::new(e))
}

/// Render a field value as a CSV cell.
///
/// Scalars render bare (strings as-is, numbers and bools via their
/// canonical form, null as empty); arrays and objects as compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        composite => composite.to_string(),
    }
}

/// Flatten records into a rectangular CSV: one row per record, one
/// column per field observed anywhere in the batch plus the identifier
/// column, header first.
///
/// Columns appear in first-seen order with `id` appended last. Rows
/// missing a field serialize that cell blank, so heterogeneous field
/// sets still produce well-formed output. Zero records yield a
/// header-only file with just the `id` column.
pub fn export_csv(records: &[Record]) -> Result<ExportedCsv> {
    let mut columns: IndexSet<String> = IndexSet::new();
    for record in records {
        for name in record.fields.keys() {
            if name == ID_COLUMN {
                columns.insert(ID_COLLISION_COLUMN.to_string());
            } else {
                columns.insert(name.clone());
            }
        }
    }
    columns.insert(ID_COLUMN.to_string());

    let file = NamedTempFile::new().map_err(export_err)?;
    let mut writer = csv::Writer::from_writer(&file);

    writer
        .write_record(columns.iter())
        .map_err(export_err)?;

    for record in records {
        let row = columns.iter().map(|column| match column.as_str() {
            ID_COLUMN => record.id.clone(),
            // A genuine `id_` field also lands here; the renamed `id`
            // field wins when both are present.
            ID_COLLISION_COLUMN => record
                .fields
                .get(ID_COLUMN)
                .or_else(|| record.fields.get(ID_COLLISION_COLUMN))
                .map(render_value)
                .unwrap_or_default(),
            name => record.fields.get(name).map(render_value).unwrap_or_default(),
        });
        writer.write_record(row).map_err(export_err)?;
    }

    writer.flush().map_err(export_err)?;
    drop(writer);

    tracing::debug!(
        rows = records.len(),
        columns = columns.len(),
        path = %file.path().display(),
        "Exported records to CSV"
    );

    Ok(ExportedCsv {
        file,
        row_count: records.len(),
    })
}
