//! JSON-over-HTTP adapter for the LLM collaborator service.
//!
//! The service exposes two endpoints:
//!
//! - `POST {base}/keywords` with a [`JobDescription`], answering a [`KeywordBundle`]
//! - `POST {base}/analysis` with a [`ScoringRequest`], answering a [`CandidateAnalysis`]
//!
//! Answers are normalized before they are returned: keyword lists are
//! trimmed to their caps and fit scores clamped to `0..=100`.

use crate::error::LlmError;
use crate::{CandidateScorer, KeywordExtractor, ScoringRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use scout_model::{CandidateAnalysis, JobDescription, KeywordBundle};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Client for the collaborator service.
pub struct HttpLlmClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLlmClient {
    /// Create a client for the service at `base_url`
    /// (e.g. `"http://localhost:8000/llm"`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Using LLM service at {}", base_url);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Building LLM service HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Base URL of the service this client talks to.
    pub fn service_address(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, LlmError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl KeywordExtractor for HttpLlmClient {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn extract_keywords(&self, job: &JobDescription) -> Result<KeywordBundle, LlmError> {
        let bundle: KeywordBundle = self.post("/keywords", job).await?;
        let bundle = bundle.normalized();
        if bundle.is_empty() {
            return Err(LlmError::InvalidResponse("empty keyword bundle".into()));
        }
        debug!(?bundle, "Extracted keywords");
        Ok(bundle)
    }
}

#[async_trait]
impl CandidateScorer for HttpLlmClient {
    #[instrument(skip(self, request), fields(username = %request.profile.username))]
    async fn score_candidate(
        &self,
        request: &ScoringRequest,
    ) -> Result<CandidateAnalysis, LlmError> {
        let analysis: CandidateAnalysis = self.post("/analysis", request).await?;
        Ok(clamp_analysis(analysis))
    }
}

pub(crate) fn clamp_analysis(mut analysis: CandidateAnalysis) -> CandidateAnalysis {
    analysis.fit_score = analysis.fit_score.min(100);
    analysis
}
