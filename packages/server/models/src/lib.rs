#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the outbreak map server.
//!
//! Analysis results are returned as the spread model types directly; this
//! crate only holds the query parameters and the health and error
//! envelopes. Numeric parameters arrive as strings so the handlers can
//! report malformed values with the API's own error body.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Query parameters for `/api/spread/analyze` and
/// `/api/spread/districts/{district}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadQueryParams {
    /// Disease name, matched case-insensitively.
    pub disease: Option<String>,
    /// Analysis window in days (`7..=365`, default 30).
    pub days: Option<String>,
}

/// Query parameters for `/api/spread/compare`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareQueryParams {
    /// Comma-separated disease names.
    pub diseases: Option<String>,
    /// Analysis window in days (`7..=365`, default 30).
    pub days: Option<String>,
}

impl CompareQueryParams {
    /// Splits `diseases` on commas, trimming and dropping blanks.
    #[must_use]
    pub fn disease_list(&self) -> Vec<String> {
        self.diseases
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Query parameters for `/api/spread/routes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQueryParams {
    /// Disease name, matched case-insensitively.
    pub disease: Option<String>,
    /// Only keep routes leaving this district (case-insensitive).
    pub origin: Option<String>,
    /// Analysis window in days (`7..=365`, default 30).
    pub days: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// City of the loaded district registry.
    pub city: String,
    /// Number of districts in the registry.
    pub districts: usize,
}

/// Machine-readable error code of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    MissingParameter,
    InvalidParameter,
    NoData,
    NotFound,
    InsufficientData,
    AnalysisError,
}

impl ApiErrorCode {
    /// HTTP status code used for this error.
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::MissingParameter | Self::InvalidParameter | Self::InsufficientData => 400,
            Self::NoData | Self::NotFound => 404,
            Self::AnalysisError => 500,
        }
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Short human-readable message.
    pub error: String,
    /// Machine-readable code.
    pub code: ApiErrorCode,
    /// Underlying cause, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
