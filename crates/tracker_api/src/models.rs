use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A field that the API may omit, send as `null`, or fill in.
///
/// Use with `#[serde(default)]` so that a missing key decodes to `Absent`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldPresence<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> FieldPresence<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldPresence::Absent)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            FieldPresence::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for FieldPresence<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldPresence::Value(v),
            None => FieldPresence::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldPresence<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(FieldPresence::from)
    }
}

impl<T: Serialize> Serialize for FieldPresence<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldPresence::Value(v) => serializer.serialize_some(v),
            FieldPresence::Absent | FieldPresence::Null => serializer.serialize_none(),
        }
    }
}

/// One search hit. Covers every field any version of the search API has sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub arxiv_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pdf_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccf_grade: Option<String>,
    #[serde(default, skip_serializing_if = "FieldPresence::is_absent")]
    pub citation_count: FieldPresence<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Date,
    Authority,
    Relevance,
    #[serde(other)]
    Other,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Authority => "authority",
            SortBy::Relevance => "relevance",
            SortBy::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub enable_authority: bool,
    pub sort_by: SortBy,
}

impl SearchRequest {
    pub fn new(query: &str, max_results: u32, enable_authority: bool) -> Self {
        Self {
            query: query.to_string(),
            max_results,
            enable_authority,
            sort_by: if enable_authority { SortBy::Authority } else { SortBy::Date },
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("max_results", self.max_results.to_string()),
            ("enable_authority", self.enable_authority.to_string()),
            ("sort_by", self.sort_by.as_str().to_string()),
        ]
    }
}

/// Trajectory text and quarterly aggregates from the analysis-enabled API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicAnalysis {
    pub trajectory_summary: FieldPresence<String>,
    /// Left undecoded; see [`QuarterlyAggregate::from_value`].
    pub quarterly_data: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub papers: Vec<PaperRecord>,
    pub from_cache: bool,
    pub sort_by: Option<SortBy>,
    pub analysis: Option<TopicAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyAggregate {
    pub quarter: String,
    pub paper_count: u64,
    #[serde(default)]
    pub top_venues: Vec<String>,
    #[serde(default)]
    pub sample_titles: Vec<String>,
}

impl QuarterlyAggregate {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        QuarterlyAggregate::deserialize(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub total_size_mb: f64,
}

// Wire envelopes.

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<SearchPayload>,
    #[serde(default)]
    pub from_cache: Option<bool>,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SearchPayload {
    Bundle(SearchBundle),
    List(Vec<PaperRecord>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBundle {
    pub papers: Vec<PaperRecord>,
    #[serde(default)]
    pub trajectory_summary: FieldPresence<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub quarterly_data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusEnvelope<T> {
    #[serde(default)]
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummarizeRequest<'a> {
    pub papers: Vec<SummarizePaper<'a>>,
    pub max_length: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummarizePaper<'a> {
    pub arxiv_id: &'a str,
    pub title: &'a str,
    pub summary: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryItem {
    pub arxiv_id: String,
    #[serde(default)]
    pub summary: Option<String>,
}
