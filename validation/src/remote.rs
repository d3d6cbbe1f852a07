//! Program validator client.
//!
//! The finished library is POSTed as JSON-LD to an external validation
//! service. The service is often offline, so every transport or decoding
//! failure degrades to [`ValidatorOutcome::Unavailable`].

use std::time::Duration;

use kairos_sdf::LibraryDocument;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Public program validator endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://validation.kairos.nextcentury.com/json-ld/ksf/validate";
/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Reason reported when the validator does not answer within the timeout.
const TIMED_OUT: &str = "Program validator is unavailable, so schema might not validate";

/// Media type of the request body.
const JSON_LD: &str = "application/ld+json";

/// Remote validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteValidatorConfig {
    /// Validation endpoint URL.
    pub endpoint: String,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    /// Whether the finished library is sent at all.
    pub enabled: bool,
}

impl Default for RemoteValidatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            enabled: false,
        }
    }
}

/// Errors constructing the validator client.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The endpoint is empty.
    #[error("validator endpoint is empty")]
    EmptyEndpoint,
    /// The HTTP client could not be built.
    #[error("failed to initialize HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Findings returned by the validator service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidatorReport {
    /// Errors found in the library.
    #[serde(rename = "errorsList", default)]
    pub errors: Vec<Value>,
    /// Warnings found in the library.
    #[serde(rename = "warningsList", default)]
    pub warnings: Vec<Value>,
}

impl ValidatorReport {
    /// Errors followed by warnings, each rendered as one line.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .map(|message| match message {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect()
    }

    /// Returns true if the service reported nothing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Result of one validation request.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorOutcome {
    /// The service answered.
    Report(ValidatorReport),
    /// The service could not be reached or answered with something unreadable.
    Unavailable(String),
}

/// Blocking client for the program validator.
#[derive(Debug, Clone)]
pub struct RemoteValidator {
    endpoint: String,
    http_client: reqwest::blocking::Client,
}

impl RemoteValidator {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::EmptyEndpoint`] if no endpoint is configured,
    /// or [`ValidatorError::Client`] if the HTTP client cannot be initialized.
    pub fn new(config: &RemoteValidatorConfig) -> Result<Self, ValidatorError> {
        if config.endpoint.trim().is_empty() {
            return Err(ValidatorError::EmptyEndpoint);
        }
        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            http_client,
        })
    }

    /// Endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `library` to the service.
    #[must_use]
    pub fn validate(&self, library: &LibraryDocument) -> ValidatorOutcome {
        let body = match serde_json::to_vec(library) {
            Ok(body) => body,
            Err(error) => return unavailable(format!("failed to encode library: {error}")),
        };
        tracing::info!(endpoint = %self.endpoint, bytes = body.len(), "sending library to program validator");
        let response = match self
            .http_client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, JSON_LD)
            .body(body)
            .send()
        {
            Ok(response) => response,
            Err(error) if error.is_timeout() => return unavailable(TIMED_OUT),
            Err(error) => return unavailable(format!("program validator unreachable: {error}")),
        };
        match response.json::<ValidatorReport>() {
            Ok(report) => {
                tracing::debug!(
                    errors = report.errors.len(),
                    warnings = report.warnings.len(),
                    "program validator answered"
                );
                ValidatorOutcome::Report(report)
            }
            Err(error) => unavailable(format!("unreadable program validator response: {error}")),
        }
    }
}

fn unavailable(reason: impl Into<String>) -> ValidatorOutcome {
    let reason = reason.into();
    tracing::warn!("{reason}");
    ValidatorOutcome::Unavailable(reason)
}
