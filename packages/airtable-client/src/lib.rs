//! Pure Airtable Web API client.
//!
//! A minimal client for the Airtable REST API. Supports listing all
//! records of a table, transparently following the API's `offset`
//! pagination cursor across however many pages the table spans.
//!
//! # Example
//!
//! ```rust,ignore
//! use airtable_client::AirtableClient;
//!
//! let client = AirtableClient::new("patXXXX".into());
//!
//! let records = client.list_all("appABC123", "tblXYZ789").await?;
//! for record in &records {
//!     println!("{} has {} fields", record.id, record.fields.len());
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{AirtableError, Result};
pub use types::{ListRecordsPage, Record};

const BASE_URL: &str = "https://api.airtable.com/v0";

pub struct AirtableClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl AirtableClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the API origin. Used by tests to point at a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch one page of records, optionally resuming from an offset cursor.
    pub async fn list_page(
        &self,
        base_id: &str,
        table_id: &str,
        offset: Option<&str>,
    ) -> Result<ListRecordsPage> {
        let url = format!("{}/{}/{}", self.base_url, base_id, table_id);
        let mut req = self.client.get(&url).bearer_auth(&self.token);
        if let Some(cursor) = offset {
            req = req.query(&[("offset", cursor)]);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AirtableError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let page: ListRecordsPage = resp.json().await?;
        Ok(page)
    }

    /// List every record of a table, following offset cursors until the
    /// API stops returning one. Records are concatenated in API order.
    ///
    /// Tables beyond the API's listing limits (in practice around 100
    /// records per request) are paged through, but very large tables are
    /// better served by filtered views than by this call.
    pub async fn list_all(&self, base_id: &str, table_id: &str) -> Result<Vec<Record>> {
        tracing::info!(base_id, table_id, "Listing Airtable records");

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let page = self
                .list_page(base_id, table_id, offset.as_deref())
                .await?;
            tracing::debug!(
                page_len = page.records.len(),
                has_more = page.offset.is_some(),
                "Fetched records page"
            );
            records.extend(page.records);
            match page.offset {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }

        tracing::info!(count = records.len(), "Fetched all records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record_json(id: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "createdTime": "2024-03-01T12:00:00.000Z",
            "fields": {"Name": name}
        })
    }

    #[tokio::test]
    async fn list_all_follows_offset_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/appX/tblY"))
            .and(header("Authorization", "Bearer pat-test"))
            .and(query_param("offset", "cur1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [record_json("rec2", "B")]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/appX/tblY"))
            .and(header("Authorization", "Bearer pat-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [record_json("rec1", "A")],
                "offset": "cur1"
            })))
            .mount(&server)
            .await;

        let client = AirtableClient::new("pat-test".into()).with_base_url(server.uri());
        let records = client.list_all("appX", "tblY").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "rec1");
        assert_eq!(records[1].id, "rec2");
        assert_eq!(records[1].fields["Name"], "B");
    }

    #[tokio::test]
    async fn list_all_surfaces_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/appX/tblY"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"error":{"type":"AUTHENTICATION_REQUIRED"}}"#),
            )
            .mount(&server)
            .await;

        let client = AirtableClient::new("bad".into()).with_base_url(server.uri());
        let err = client.list_all("appX", "tblY").await.unwrap_err();

        match err {
            AirtableError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("AUTHENTICATION_REQUIRED"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_table_yields_no_records() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/appX/tblY"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"records": []})),
            )
            .mount(&server)
            .await;

        let client = AirtableClient::new("pat-test".into()).with_base_url(server.uri());
        let records = client.list_all("appX", "tblY").await.unwrap();
        assert!(records.is_empty());
    }
}
