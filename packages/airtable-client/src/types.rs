use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A single record from an Airtable table.
///
/// Field values are dynamically typed: Airtable returns whatever the
/// column type dictates (string, number, bool, arrays for attachments
/// and linked records), so they are kept as raw JSON values.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Build a record from an id and field pairs. Mostly useful in tests.
    pub fn new(
        id: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        Self {
            id: id.into(),
            created_time: None,
            fields: fields.into_iter().collect(),
        }
    }
}

/// One page of a list-records response.
///
/// The `offset` cursor is present only when more pages follow.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRecordsPage {
    pub records: Vec<Record>,
    pub offset: Option<String>,
}
