use std::time::Duration;

use board_core::analysis::{AnalysisResult, ScoreKind};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DEPTH: u32 = 15;

/// Body sent to the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub fen: String,
    pub depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEvaluation {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
}

/// Body returned by the analysis endpoint on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub evaluation: WireEvaluation,
    pub best_move: String,
    #[serde(default)]
    pub pv: Vec<String>,
    pub depth: u32,
}

impl From<AnalysisResponse> for AnalysisResult {
    fn from(resp: AnalysisResponse) -> Self {
        AnalysisResult {
            score_kind: ScoreKind::from_wire(&resp.evaluation.kind),
            score_value: resp.evaluation.value,
            best_move: resp.best_move,
            principal_variation: resp.pv,
            search_depth: resp.depth,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),
}

/// Client for the remote position evaluation service.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .user_agent("FenViewer/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Evaluate `fen` to `depth` plies. One attempt, no retries.
    /// Any non-2xx status is a failure; its body is not inspected.
    pub async fn request_analysis(
        &self,
        fen: &str,
        depth: u32,
    ) -> Result<AnalysisResult, AnalysisError> {
        let body = AnalysisRequest {
            fen: fen.to_string(),
            depth,
        };

        let resp = self.client.post(&self.endpoint).json(&body).send().await?;

        if !resp.status().is_success() {
            return Err(AnalysisError::Status(resp.status()));
        }

        let parsed: AnalysisResponse = resp.json().await?;
        Ok(parsed.into())
    }
}
