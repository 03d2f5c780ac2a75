pub mod models;

use std::collections::HashMap;

use async_trait::async_trait;
use common::{Config, TrackerError, TrackerResult};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use models::{
    SearchEnvelope, SearchPayload, StatusEnvelope, SummarizePaper, SummarizeRequest, SummaryItem,
};
pub use models::{
    CacheStats, FieldPresence, PaperRecord, QuarterlyAggregate, SearchRequest, SearchResult,
    SortBy, TopicAnalysis,
};

/// The remote tracker service as seen by the controller.
#[async_trait]
pub trait PaperApi: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> TrackerResult<SearchResult>;

    /// Maps arxiv_id to generated summary. Papers the service skipped are missing.
    async fn summarize(
        &self,
        papers: &[PaperRecord],
        max_length: u32,
    ) -> TrackerResult<HashMap<String, String>>;

    async fn cache_stats(&self) -> TrackerResult<CacheStats>;

    async fn clear_cache(&self) -> TrackerResult<()>;

    async fn get_paper(&self, arxiv_id: &str) -> TrackerResult<PaperRecord>;
}

#[derive(Clone)]
pub struct TrackerClient {
    client: Client,
    base_url: String,
}

impl TrackerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> TrackerResult<Self> {
        let client = Client::builder().timeout(config.api.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Old-style ids such as `cs/0112017` stay a single, encoded path segment.
    fn paper_url(&self, arxiv_id: &str) -> TrackerResult<Url> {
        let invalid = || TrackerError::Validation(format!("invalid base URL: {}", self.base_url));
        let mut url = Url::parse(&self.endpoint("paper")).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(arxiv_id);
        Ok(url)
    }

    async fn checked(response: Response) -> TrackerResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(TrackerError::Status { status, body })
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> TrackerResult<T> {
        let text = Self::checked(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PaperApi for TrackerClient {
    async fn search(&self, request: &SearchRequest) -> TrackerResult<SearchResult> {
        let url = self.endpoint("search");
        info!("Searching {} for {:?} (max {})", url, request.query, request.max_results);

        let response = self
            .client
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await?;
        let envelope: SearchEnvelope = Self::decode(response).await?;

        if envelope.status != "success" {
            return Err(TrackerError::Api(
                envelope.message.unwrap_or_else(|| "Search failed".to_string()),
            ));
        }

        let (papers, analysis) = match envelope.data {
            Some(SearchPayload::List(papers)) => (papers, None),
            Some(SearchPayload::Bundle(bundle)) => (
                bundle.papers,
                Some(TopicAnalysis {
                    trajectory_summary: bundle.trajectory_summary,
                    quarterly_data: bundle.quarterly_data,
                }),
            ),
            None => {
                return Err(TrackerError::Api(
                    envelope.message.unwrap_or_else(|| "Search failed".to_string()),
                ))
            }
        };

        info!(
            "Search returned {} papers (from cache: {})",
            papers.len(),
            envelope.from_cache.unwrap_or(false)
        );

        Ok(SearchResult {
            papers,
            from_cache: envelope.from_cache.unwrap_or(false),
            sort_by: envelope.sort_by,
            analysis,
        })
    }

    async fn summarize(
        &self,
        papers: &[PaperRecord],
        max_length: u32,
    ) -> TrackerResult<HashMap<String, String>> {
        let body = SummarizeRequest {
            papers: papers
                .iter()
                .map(|p| SummarizePaper {
                    arxiv_id: &p.arxiv_id,
                    title: &p.title,
                    summary: &p.summary,
                })
                .collect(),
            max_length,
        };

        let response = self
            .client
            .post(self.endpoint("summarize"))
            .json(&body)
            .send()
            .await?;
        let envelope: StatusEnvelope<Vec<SummaryItem>> = Self::decode(response).await?;

        let summaries: HashMap<String, String> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| match item.summary {
                Some(summary) if !summary.trim().is_empty() => Some((item.arxiv_id, summary)),
                _ => None,
            })
            .collect();

        debug!("Received {} AI summaries for {} papers", summaries.len(), papers.len());
        Ok(summaries)
    }

    async fn cache_stats(&self) -> TrackerResult<CacheStats> {
        let response = self.client.get(self.endpoint("cache/stats")).send().await?;
        let envelope: StatusEnvelope<CacheStats> = Self::decode(response).await?;

        match (envelope.status.as_str(), envelope.data) {
            ("success", Some(stats)) => Ok(stats),
            _ => Err(TrackerError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| "Cache statistics unavailable".to_string()),
            )),
        }
    }

    async fn clear_cache(&self) -> TrackerResult<()> {
        let response = self.client.post(self.endpoint("cache/clear")).send().await?;
        Self::checked(response).await?;
        info!("Remote search cache cleared");
        Ok(())
    }

    async fn get_paper(&self, arxiv_id: &str) -> TrackerResult<PaperRecord> {
        let url = self.paper_url(arxiv_id.trim())?;
        let response = self.client.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            warn!("Paper {} not found", arxiv_id);
            return Err(TrackerError::Api(format!("Paper not found: {arxiv_id}")));
        }

        let envelope: StatusEnvelope<PaperRecord> = Self::decode(response).await?;
        match (envelope.status.as_str(), envelope.data) {
            ("success", Some(paper)) => Ok(paper),
            _ => Err(TrackerError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| format!("Paper not found: {arxiv_id}")),
            )),
        }
    }
}
