//! Optimization engine HTTP adapter.
//!
//! The engine is an external service exposing `POST /optimize` and
//! `GET /locations/{city}`. Everything the orchestrator needs sits behind
//! [`PlannerBackend`] so tests can substitute a scripted backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ItineraryResult, Location, Pace};

const SUCCESS_STATUS: &str = "success";
const FALLBACK_ERROR: &str = "optimization request failed";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug)]
pub enum EngineError {
    /// Network unreachable or a non-JSON body.
    Transport(reqwest::Error),
    /// The engine answered but declined the request.
    Rejected(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Transport(err)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Transport(err) => write!(f, "engine unreachable: {}", err),
            EngineError::Rejected(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Transport(err) => Some(err),
            EngineError::Rejected(_) => None,
        }
    }
}

/// The calls the orchestrator makes against the engine.
pub trait PlannerBackend {
    fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResponse, EngineError>;

    /// Selectable-location catalog for a city.
    fn locations(&self, city: &str) -> Result<Vec<Location>, EngineError>;
}

/// Tuning knobs forwarded verbatim to the engine's solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmParams {
    pub population_size: u32,
    pub generations: u32,
    pub mutation_rate: f64,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            mutation_rate: 0.1,
        }
    }
}

/// Body of `POST /optimize`.
///
/// `interests` is always present (the engine defaults it but the client
/// has always sent an explicit list); `start_point_id` serializes as
/// `null` when unset; `algorithm_params` is omitted entirely when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub city: String,
    pub budget: f64,
    pub start_time: u32,
    pub end_time: u32,
    pub interests: Vec<String>,
    pub pace: Pace,
    pub start_point_id: Option<u32>,
    pub must_visit_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_params: Option<AlgorithmParams>,
}

/// Envelope of `POST /optimize`.
///
/// Validation failures arrive without a `status` field at all, and
/// `detail` comes in both list-of-objects and bare-string shapes, so both
/// fields stay loose here.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: Option<ItineraryResult>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl OptimizeResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// Best-available human-readable error: `message`, else the first
    /// `detail[].msg`, else a generic fallback.
    pub fn error_message(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
        if let Some(msg) = self
            .detail
            .as_ref()
            .and_then(|detail| detail.get(0))
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
        {
            return msg.to_string();
        }
        FALLBACK_ERROR.to_string()
    }

    /// Resolve the envelope into an itinerary or a semantic failure.
    ///
    /// A "success" with no result body counts as a failure rather than a
    /// panic path.
    pub fn into_result(self) -> Result<ItineraryResult, EngineError> {
        if !self.is_success() {
            return Err(EngineError::Rejected(self.error_message()));
        }
        match self.result {
            Some(result) => Ok(result),
            None => Err(EngineError::Rejected(FALLBACK_ERROR.to_string())),
        }
    }
}

/// Blocking HTTP client for the engine.
#[derive(Debug, Clone)]
pub struct EngineClient {
    config: EngineConfig,
    client: reqwest::blocking::Client,
}

impl EngineClient {
    pub fn new(config: EngineConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl PlannerBackend for EngineClient {
    fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResponse, EngineError> {
        let url = format!("{}/optimize", self.config.base_url);
        tracing::debug!("optimize request for {} -> {}", request.city, url);

        // Semantic rejections arrive as JSON on non-2xx statuses too, so
        // the body is parsed regardless of status code.
        let response = self.client.post(url).json(request).send()?;
        Ok(response.json::<OptimizeResponse>()?)
    }

    fn locations(&self, city: &str) -> Result<Vec<Location>, EngineError> {
        let url = format!("{}/locations/{}", self.config.base_url, city);
        tracing::debug!("catalog fetch for {} -> {}", city, url);

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())?;
        Ok(response.json::<Vec<Location>>()?)
    }
}
