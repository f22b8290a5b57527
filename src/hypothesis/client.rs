//! HTTP client for the causal estimation server

use super::notify::{Notice, Notifier};
use super::types::{
    CausalContext, EstimateInput, HypothesisTestRequest, HypothesisTestResult, ParamForm,
    ServiceEnvelope,
};
use super::CausalServerConfig;
use crate::error::{ExploreError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const ERROR_TITLE: &str = "HypothesisTest Error";
const SCHEMA_REJECTED_TITLE: &str = "Failed to get HypothesisTest param schema";

/// Forwards hypothesis test requests to the estimation server.
///
/// Server-side failures (non-2xx status or `success: false`) are reported to
/// the notifier and returned as errors. Transport failures are returned
/// without a notice.
pub struct HypothesisTestClient {
    http: reqwest::Client,
    config: CausalServerConfig,
    notifier: Arc<dyn Notifier>,
}

impl HypothesisTestClient {
    pub fn new(config: CausalServerConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            notifier,
        })
    }

    pub fn config(&self) -> &CausalServerConfig {
        &self.config
    }

    /// Fetch the estimation parameter form. `None` when the server is
    /// marked inactive.
    pub async fn fetch_param_schema(&self) -> Result<Option<ParamForm>> {
        if !self.config.server_active {
            debug!("Causal server inactive, skipping param schema request");
            return Ok(None);
        }

        let url = self.config.endpoint("v0.1/form/estimate");
        debug!(url = %url, "Fetching hypothesis test param schema");
        let response = self.http.get(&url).send().await?;

        self.unwrap_response(response, SCHEMA_REJECTED_TITLE)
            .await
            .map(Some)
    }

    /// Run an estimation. `None` when no session is configured.
    pub async fn estimate(
        &self,
        input: &EstimateInput,
        context: CausalContext<'_>,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Option<HypothesisTestResult>> {
        let Some(session_id) = self.config.session_id.as_deref() else {
            debug!("No causal session, skipping estimation");
            return Ok(None);
        };

        let payload = HypothesisTestRequest::new(input, context, params);
        let url = self.config.endpoint(&format!("v0.1/{}/estimate/calc", session_id));
        info!(
            url = %url,
            outcome = %input.outcome,
            rows = context.data.len(),
            confounders = input.confounders.len(),
            "Requesting hypothesis test estimation"
        );

        let response = self.http.post(&url).json(&payload).send().await?;

        self.unwrap_response(response, ERROR_TITLE).await.map(Some)
    }

    async fn unwrap_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        rejected_title: &str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            self.notifier.notify(Notice::error(ERROR_TITLE, status_text.clone()));
            return Err(ExploreError::ServiceStatus {
                status: status.as_u16(),
                status_text,
            });
        }

        let envelope: ServiceEnvelope<T> = response.json().await?;
        envelope.into_result().map_err(|message| {
            self.notifier.notify(Notice::error(rejected_title, message.clone()));
            ExploreError::ServiceRejected(message)
        })
    }
}

impl std::fmt::Debug for HypothesisTestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HypothesisTestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
