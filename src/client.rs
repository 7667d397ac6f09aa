//! HTTP client for the recommendation service
//!
//! [`RecommendationClient`] is the seam the form controller depends on;
//! [`HttpRecommendationClient`] is the reqwest implementation used by the
//! binary.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ApiSettings;
use crate::error::{FitPlanError, TransportError};
use crate::plan::Plan;
use crate::profile::ProfileModel;

const RECOMMENDATIONS_PATH: &str = "/api/recommendations";
const HEALTH_PATH: &str = "/health";

/// Something that turns a profile into a plan
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn recommend(&self, profile: &ProfileModel) -> Result<Plan, TransportError>;
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// reqwest-backed recommendation client
#[derive(Debug, Clone)]
pub struct HttpRecommendationClient {
    http_client: Client,
    base_url: String,
}

impl HttpRecommendationClient {
    /// Create a client for `settings.base_url`, which must already be resolved
    pub fn new(settings: &ApiSettings) -> Result<Self, FitPlanError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| {
                FitPlanError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Call `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let url = self.endpoint(HEALTH_PATH);
        debug!(url = %url, "Checking recommendation service");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| network_error(&url, e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl RecommendationClient for HttpRecommendationClient {
    async fn recommend(&self, profile: &ProfileModel) -> Result<Plan, TransportError> {
        let url = self.endpoint(RECOMMENDATIONS_PATH);
        info!(url = %url, goal = %profile.goal, "Requesting recommendations");

        let response = self
            .http_client
            .post(&url)
            .json(profile)
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| network_error(&url, e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Recommendation request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        let plan: Plan = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Recommendation response did not match the plan schema");
            TransportError::Malformed(e.to_string())
        })?;

        info!(
            days = plan.training.len(),
            exercises = plan.exercise_count(),
            "Recommendations received"
        );
        Ok(plan)
    }
}

fn network_error(url: &str, error: reqwest::Error) -> TransportError {
    TransportError::Network {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"detail": "text"}` and the list form
/// `{"detail": [{"msg": "..."}, ...]}` used for request validation failures.
pub fn extract_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: Value,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail": "rules engine failed"}"#).as_deref(),
            Some("rules engine failed")
        );
    }

    #[test]
    fn test_extract_detail_list() {
        let body = r#"{"detail": [{"loc": ["body", "age"], "msg": "ensure this value is greater than 0"},
                                  {"loc": ["body", "weight_kg"], "msg": "field required"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("ensure this value is greater than 0; field required")
        );
    }

    #[test]
    fn test_extract_detail_missing() {
        assert!(extract_detail("Internal Server Error").is_none());
        assert!(extract_detail(r#"{"detail": ""}"#).is_none());
        assert!(extract_detail(r#"{"error": "nope"}"#).is_none());
    }

    #[test]
    fn test_base_url_trimmed() {
        let settings = ApiSettings {
            base_url: "http://localhost:8000/".to_string(),
            ..ApiSettings::default()
        };
        let client = HttpRecommendationClient::new(&settings).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint(RECOMMENDATIONS_PATH),
            "http://localhost:8000/api/recommendations"
        );
    }
}
