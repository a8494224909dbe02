//! Airtable REST client for the bookings table.
//!
//! Implements [`BookingStore`] on top of the Airtable v0 API:
//! single-record reads, single-record creates and status-filtered listing
//! that follows the `offset` cursor until the last page.

use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use slotbook_common::{BookingStore, BoxFuture, StoreError, StoreRecord};
use slotbook_config::AirtableConfig;
use tracing::{debug, info, warn};

/// One page of a list call.
#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    records: Vec<StoreRecord>,
    #[serde(default)]
    offset: Option<String>,
}

/// Client for one Airtable table.
#[derive(Debug, Clone)]
pub struct AirtableStore {
    client: Client,
    table_url: Url,
    token: String,
}

impl AirtableStore {
    /// Builds a store for `{api_url}/{base_id}/{table_name}`.
    ///
    /// Fails when the base id or token is missing or the API url does not
    /// parse.
    pub fn new(client: Client, config: &AirtableConfig) -> Result<Self, StoreError> {
        if !config.has_credentials() {
            return Err(StoreError::Config(
                "Airtable base id and token must be set".to_string(),
            ));
        }

        let mut table_url = Url::parse(&config.api_url)
            .map_err(|e| StoreError::Config(format!("Invalid Airtable api_url: {}", e)))?;
        table_url
            .path_segments_mut()
            .map_err(|_| StoreError::Config("Airtable api_url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&config.base_id)
            .push(&config.table_name);

        info!("Airtable store configured for table {}", config.table_name);
        Ok(Self {
            client,
            table_url,
            token: config.token.clone(),
        })
    }

    fn record_url(&self, record_id: &str) -> Result<Url, StoreError> {
        let mut url = self.table_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Config("Airtable api_url cannot be a base".to_string()))?
            .push(record_id);
        Ok(url)
    }

    async fn fetch_record(&self, record_id: &str) -> Result<StoreRecord, StoreError> {
        let url = self.record_url(record_id)?;
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(record_id.to_string()));
        }
        parse_json(ensure_success(response).await?).await
    }

    async fn insert_record(&self, fields: Map<String, Value>) -> Result<StoreRecord, StoreError> {
        debug!("POST {}", self.table_url);
        let response = self
            .client
            .post(self.table_url.clone())
            .bearer_auth(&self.token)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        let record: StoreRecord = parse_json(ensure_success(response).await?).await?;
        info!("created record {}", record.id);
        Ok(record)
    }

    async fn fetch_by_status(&self, status: &str) -> Result<Vec<StoreRecord>, StoreError> {
        let formula = status_formula(status);
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.table_url.clone())
                .bearer_auth(&self.token)
                .query(&[("filterByFormula", formula.as_str())]);
            if let Some(cursor) = offset.as_deref() {
                request = request.query(&[("offset", cursor)]);
            }

            let page: ListPage = parse_json(ensure_success(request.send().await?).await?).await?;
            debug!(
                "listed {} '{}' records (more pages: {})",
                page.records.len(),
                status,
                page.offset.is_some()
            );
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }
        Ok(records)
    }
}

impl BookingStore for AirtableStore {
    fn get_record(&self, record_id: &str) -> BoxFuture<'_, StoreRecord, StoreError> {
        let record_id = record_id.to_string();
        Box::pin(async move { self.fetch_record(&record_id).await })
    }

    fn create_record(&self, fields: Map<String, Value>) -> BoxFuture<'_, StoreRecord, StoreError> {
        Box::pin(async move { self.insert_record(fields).await })
    }

    fn list_by_status(&self, status: &str) -> BoxFuture<'_, Vec<StoreRecord>, StoreError> {
        let status = status.to_string();
        Box::pin(async move { self.fetch_by_status(&status).await })
    }
}

/// `{Status} = '<status>'` with the value escaped for a formula string literal.
pub fn status_formula(status: &str) -> String {
    let escaped = status.replace('\\', "\\\\").replace('\'', "\\'");
    format!("{{Status}} = '{}'", escaped)
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!("Airtable answered {}: {}", status, body);
    Err(StoreError::Remote {
        status: status.as_u16(),
        body,
    })
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
