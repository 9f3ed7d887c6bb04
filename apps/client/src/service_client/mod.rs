/// Service Client: the single point of entry for all calls to the evaluation service.
///
/// No other module issues HTTP requests. Every call is attempted exactly once:
/// a failed evaluation is reported to the user, who resubmits if they want to.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ActivityLevel, EvaluationBundle, EvaluationRequest, MealPlan};

const EVALUATE_PATH: &str = "/evaluate-all";
const MEAL_PLAN_PATH: &str = "/generate-mealplan";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The two operations the external service offers.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    async fn evaluate_all(
        &self,
        request: &EvaluationRequest,
        activity: ActivityLevel,
    ) -> Result<EvaluationBundle, ServiceError>;

    async fn generate_meal_plan(
        &self,
        request: &EvaluationRequest,
        activity: ActivityLevel,
    ) -> Result<MealPlan, ServiceError>;
}

/// FastAPI reports failures as `{"detail": ...}`; the detail may be a string or a list.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    detail: serde_json::Value,
}

/// HTTP implementation of `EvaluationService`.
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `request` as JSON with `actividad` in the query string and decodes the body as `T`.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &EvaluationRequest,
        activity: ActivityLevel,
    ) -> Result<T, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, actividad = activity.as_query(), "Calling evaluation service");

        let response = self
            .client
            .post(&url)
            .query(&[("actividad", activity.as_query())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Evaluation service returned {} for {}", status, path);
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|e| match e.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or(body);
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let decoded = serde_json::from_str(&body)?;
        debug!(%url, bytes = body.len(), "Evaluation service call succeeded");
        Ok(decoded)
    }
}

#[async_trait]
impl EvaluationService for ServiceClient {
    async fn evaluate_all(
        &self,
        request: &EvaluationRequest,
        activity: ActivityLevel,
    ) -> Result<EvaluationBundle, ServiceError> {
        self.post_json(EVALUATE_PATH, request, activity).await
    }

    async fn generate_meal_plan(
        &self,
        request: &EvaluationRequest,
        activity: ActivityLevel,
    ) -> Result<MealPlan, ServiceError> {
        self.post_json(MEAL_PLAN_PATH, request, activity).await
    }
}
