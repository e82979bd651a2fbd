//! # pythia-client
//!
//! Blocking client for the computational-knowledge API.
//!
//! One query in, one structured answer out: `search` issues the HTTP
//! call and decodes the JSON answer into pods (named result sections),
//! each carrying plaintext subpods. The [`KnowledgeSource`] trait is the
//! seam the harness runs against, so tests can substitute a scripted
//! source for the live service.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the API application id
pub const APP_ID_ENV: &str = "WOLFRAM_APP_ID";

const DEFAULT_BASE_URL: &str = "https://api.wolframalpha.com/v2/query";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from the knowledge API client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API app id not configured (set {APP_ID_ENV})")]
    MissingAppId,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Query was not understood by the service: {0}")]
    QueryFailed(String),
    #[error("No '{primary}' pod in the answer (fallback '{fallback}' also absent)")]
    PodMissing { primary: String, fallback: String },
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API application id (falls back to [`APP_ID_ENV`])
    pub app_id: Option<String>,
    /// Query endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the app id explicitly
    pub fn with_app_id(mut self, app_id: &str) -> Self {
        self.app_id = Some(app_id.to_string());
        self
    }

    /// Set the query endpoint
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn resolve_app_id(&self) -> ClientResult<String> {
        if let Some(ref id) = self.app_id {
            return Ok(id.clone());
        }
        std::env::var(APP_ID_ENV).map_err(|_| ClientError::MissingAppId)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct QueryResponse {
    queryresult: QueryResult,
}

/// Decoded answer: a set of named pods
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub pods: Vec<Pod>,
}

/// A named section of the answer
#[derive(Debug, Clone, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subpods: Vec<Subpod>,
}

/// One result within a pod
#[derive(Debug, Clone, Deserialize)]
pub struct Subpod {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub plaintext: String,
}

impl QueryResult {
    /// Find a pod by title
    pub fn pod(&self, title: &str) -> Option<&Pod> {
        self.pods.iter().find(|pod| pod.title == title)
    }
}

impl Pod {
    /// Plaintext content of every subpod, in order
    pub fn plaintexts(&self) -> Vec<&str> {
        self.subpods.iter().map(|s| s.plaintext.as_str()).collect()
    }
}

/// Pod lookup with the documented fallback: try `primary`, then
/// `fallback`, then fail. Returns the subpod plaintexts.
pub fn pod_plaintext(
    result: &QueryResult,
    primary: &str,
    fallback: &str,
) -> ClientResult<Vec<String>> {
    result
        .pod(primary)
        .or_else(|| result.pod(fallback))
        .map(|pod| pod.plaintexts().iter().map(|s| s.to_string()).collect())
        .ok_or_else(|| ClientError::PodMissing {
            primary: primary.to_string(),
            fallback: fallback.to_string(),
        })
}

// ============================================================================
// Client
// ============================================================================

/// Anything the harness can ask questions of
pub trait KnowledgeSource {
    /// Submit a natural-language query and return the decoded answer
    fn search(&self, query: &str) -> ClientResult<QueryResult>;
}

/// Live HTTP client for the knowledge API
pub struct WolframClient {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl WolframClient {
    /// Build a client from configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    /// Build a client with default configuration (app id from env)
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::default())
    }
}

impl KnowledgeSource for WolframClient {
    fn search(&self, query: &str) -> ClientResult<QueryResult> {
        let app_id = self.config.resolve_app_id()?;
        debug!(query, "querying knowledge API");

        let response: QueryResponse = self
            .http
            .get(&self.config.base_url)
            .query(&[("input", query), ("appid", app_id.as_str()), ("output", "json")])
            .send()?
            .error_for_status()?
            .json()?;

        let result = response.queryresult;
        if !result.success {
            return Err(ClientError::QueryFailed(query.to_string()));
        }
        debug!(pods = result.pods.len(), "answer decoded");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> QueryResult {
        let raw = r#"{
            "queryresult": {
                "success": true,
                "pods": [
                    {
                        "title": "Input",
                        "subpods": [{"title": "", "plaintext": "solve x^2 - 4 = 0"}]
                    },
                    {
                        "title": "Solutions",
                        "subpods": [
                            {"title": "", "plaintext": "x = -2"},
                            {"title": "", "plaintext": "x = 2"}
                        ]
                    }
                ]
            }
        }"#;
        let response: QueryResponse = serde_json::from_str(raw).unwrap();
        response.queryresult
    }

    #[test]
    fn test_decode_and_pod_lookup() {
        let result = sample_result();
        assert!(result.success);
        let pod = result.pod("Solutions").unwrap();
        assert_eq!(pod.plaintexts(), vec!["x = -2", "x = 2"]);
        assert!(result.pod("Complex solutions").is_none());
    }

    #[test]
    fn test_pod_plaintext_primary() {
        let result = sample_result();
        let texts = pod_plaintext(&result, "Solutions", "Complex solutions").unwrap();
        assert_eq!(texts, vec!["x = -2", "x = 2"]);
    }

    #[test]
    fn test_pod_plaintext_fallback() {
        let result = sample_result();
        // Primary absent, fallback present
        let texts = pod_plaintext(&result, "Complex solutions", "Solutions").unwrap();
        assert_eq!(texts.len(), 2);
    }

    #[test]
    fn test_pod_plaintext_missing_both() {
        let result = sample_result();
        assert!(matches!(
            pod_plaintext(&result, "Result", "Exact result"),
            Err(ClientError::PodMissing { .. })
        ));
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let raw = r#"{"queryresult": {"success": false}}"#;
        let response: QueryResponse = serde_json::from_str(raw).unwrap();
        assert!(!response.queryresult.success);
        assert!(response.queryresult.pods.is_empty());
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::new()
            .with_app_id("DEMO")
            .with_base_url("http://localhost:9999/query")
            .with_timeout_secs(5);
        assert_eq!(config.app_id.as_deref(), Some("DEMO"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.resolve_app_id().unwrap(), "DEMO");
    }
}
