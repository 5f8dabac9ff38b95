//! Pinecone REST client.

use super::{IndexStats, MetadataValue, ScoredMatch, VectorIndex};
use crate::error::{Result, VidlibError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

const API_VERSION: &str = "2024-07";

/// Connection to a single Pinecone index.
pub struct PineconeIndex {
    client: Client,
    host: Url,
    index_name: String,
}

impl PineconeIndex {
    /// Resolve the index host through the control plane and verify the connection.
    ///
    /// Any failure here means the index is unavailable.
    pub async fn connect(
        api_key: &str,
        index_name: &str,
        control_plane_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Api-Key",
            HeaderValue::from_str(api_key.trim())
                .map_err(|_| VidlibError::Config("invalid Pinecone API key".to_string()))?,
        );
        headers.insert("X-Pinecone-API-Version", HeaderValue::from_static(API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let indexes_url = format!("{}/indexes", control_plane_url.trim_end_matches('/'));
        let response = client
            .get(&indexes_url)
            .send()
            .await
            .map_err(|e| VidlibError::IndexUnavailable(format!("listing indexes: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidlibError::IndexUnavailable(format!(
                "listing indexes returned {}: {}",
                status, body
            )));
        }

        let list: ListIndexesResponse = response
            .json()
            .await
            .map_err(|e| VidlibError::IndexUnavailable(format!("listing indexes: {}", e)))?;

        let host = list
            .indexes
            .into_iter()
            .find(|idx| idx.name == index_name)
            .map(|idx| idx.host)
            .ok_or_else(|| {
                VidlibError::IndexUnavailable(format!("index '{}' not found", index_name))
            })?;

        let index = Self {
            client,
            host: host_url(&host)?,
            index_name: index_name.to_string(),
        };

        let stats = index
            .stats()
            .await
            .map_err(|e| VidlibError::IndexUnavailable(e.to_string()))?;
        info!(
            index = %index.index_name,
            host = %index.host,
            total_vectors = stats.total_vectors,
            dimension = stats.dimension,
            "Connected to Pinecone"
        );

        Ok(index)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.host
            .join(path)
            .map_err(|e| VidlibError::Config(format!("invalid Pinecone host: {}", e)))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    #[instrument(skip(self, vector), fields(index = %self.index_name))]
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };

        let response = self
            .client
            .post(self.endpoint("query")?)
            .json(&request)
            .send()
            .await
            .map_err(|e| VidlibError::SearchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidlibError::SearchFailed(format!(
                "Pinecone returned {}: {}",
                status, body
            )));
        }

        let payload: QueryResponse = response
            .json()
            .await
            .map_err(|e| VidlibError::SearchFailed(format!("decoding matches: {}", e)))?;

        debug!("Pinecone returned {} matches", payload.matches.len());
        Ok(payload.into_matches())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let response = self
            .client
            .post(self.endpoint("describe_index_stats")?)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidlibError::Provider(format!(
                "describe_index_stats returned {}: {}",
                status, body
            )));
        }

        let stats: DescribeStatsResponse = response.json().await?;
        Ok(IndexStats {
            index_name: self.index_name.clone(),
            total_vectors: stats.total_vector_count,
            dimension: stats.dimension,
        })
    }

    fn name(&self) -> &str {
        &self.index_name
    }
}

/// Index hosts are reported without a scheme.
fn host_url(host: &str) -> Result<Url> {
    let raw = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    Url::parse(&raw).map_err(|e| VidlibError::IndexUnavailable(format!("bad host {}: {}", host, e)))
}

#[derive(Debug, Deserialize)]
struct ListIndexesResponse {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
    host: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<HashMap<String, MetadataValue>>,
}

impl QueryResponse {
    fn into_matches(self) -> Vec<ScoredMatch> {
        self.matches
            .into_iter()
            .map(|m| ScoredMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeStatsResponse {
    #[serde(default)]
    dimension: u32,
    #[serde(default)]
    total_vector_count: u64,
}
