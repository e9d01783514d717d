//! Azure Cosmos DB (SQL API) client for the aggregate container
//!
//! Talks to the REST API directly: queries are POSTed as
//! `application/query+json` and signed with the account master key.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use serde::Deserialize;
use sha2::Sha256;
use shared::SensorAggregateRecord;
use std::time::Duration;

use crate::config::CosmosConfig;
use crate::store::{AggregateQuery, AggregateStore, QuerySpec, StoreError};

const API_VERSION: &str = "2018-12-31";
const CONTINUATION_HEADER: &str = "x-ms-continuation";

type HmacSha256 = Hmac<Sha256>;

/// Cosmos DB container client
#[derive(Clone)]
pub struct CosmosStore {
    client: Client,
    endpoint: String,
    key: Vec<u8>,
    database: String,
    container: String,
    partition_by_location: bool,
}

/// One page of query results
#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "Documents")]
    documents: Vec<SensorAggregateRecord>,
}

impl CosmosStore {
    /// Create a client from configuration. Fails if the key is not valid base64.
    pub fn new(config: &CosmosConfig) -> Result<Self, StoreError> {
        let key = STANDARD
            .decode(config.key.trim())
            .map_err(|e| StoreError::Credentials(format!("account key is not base64: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key,
            database: config.database.clone(),
            container: config.container.clone(),
            partition_by_location: config.partition_by_location,
        })
    }

    fn resource_link(&self) -> String {
        format!("dbs/{}/colls/{}", self.database, self.container)
    }

    fn headers(
        &self,
        partition_key: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<HeaderMap, StoreError> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let signature =
            master_key_signature(&self.key, "post", "docs", &self.resource_link(), &date)?;
        let token = urlencoding::encode(&format!("type=master&ver=1.0&sig={}", signature)).into_owned();

        let mut headers = HeaderMap::new();
        headers.insert("authorization", header_value(&token)?);
        headers.insert("x-ms-date", header_value(&date)?);
        headers.insert("x-ms-version", HeaderValue::from_static(API_VERSION));
        headers.insert("x-ms-documentdb-isquery", HeaderValue::from_static("True"));
        headers.insert(
            "x-ms-documentdb-query-enablecrosspartition",
            HeaderValue::from_static("True"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/query+json"),
        );
        if let Some(partition_key) = partition_key {
            let value = serde_json::to_string(&[partition_key])
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            headers.insert("x-ms-documentdb-partitionkey", header_value(&value)?);
        }
        if let Some(continuation) = continuation {
            headers.insert(CONTINUATION_HEADER, header_value(continuation)?);
        }
        Ok(headers)
    }

    /// Run a query and follow continuation tokens until every page is read
    async fn fetch_all(
        &self,
        spec: &QuerySpec,
        partition_key: Option<&str>,
    ) -> Result<Vec<SensorAggregateRecord>, StoreError> {
        let url = format!("{}/{}/docs", self.endpoint, self.resource_link());
        let body = serde_json::to_vec(spec).map_err(|e| StoreError::Decode(e.to_string()))?;

        let mut documents = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .post(&url)
                .headers(self.headers(partition_key, continuation.as_deref())?)
                .body(body.clone())
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(StoreError::Status { status, body });
            }

            continuation = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let page: QueryPage = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            documents.extend(page.documents);

            if continuation.is_none() {
                break;
            }
        }

        Ok(documents)
    }
}

#[async_trait]
impl AggregateStore for CosmosStore {
    async fn query(
        &self,
        query: &AggregateQuery,
    ) -> Result<Vec<SensorAggregateRecord>, StoreError> {
        let partition_key = self
            .partition_by_location
            .then(|| query.location().name);

        tracing::debug!(
            sensor_id = query.location().id,
            container = %self.container,
            "Querying aggregates"
        );

        self.fetch_all(&query.to_spec(), partition_key).await
    }

    fn kind(&self) -> &'static str {
        "cosmos"
    }
}

/// Sign a request with the account master key.
///
/// The string to sign is `verb`, resource type, resource link and date, each
/// newline-terminated, followed by an empty line. Verb, type and date are
/// lowercased; the link is not.
pub fn master_key_signature(
    key: &[u8],
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> Result<String, StoreError> {
    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StoreError::Credentials(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn header_value(value: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(value)
        .map_err(|e| StoreError::Credentials(format!("invalid header value: {}", e)))
}
