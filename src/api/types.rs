//! Wire types for the HTTP layer.

use axum::Json;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::endpoints::EndpointDefinition;
use crate::sim::types::{Method, ResponseDescriptor};

/// Registry entry as listed by `GET /_sim/endpoints`.
///
/// The default body is embedded as JSON rather than as a string.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    pub id: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub description: &'static str,
    pub example_path: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_body: Option<Value>,
    pub latency_ms: u64,
}

impl From<&EndpointDefinition> for EndpointRecord {
    fn from(d: &EndpointDefinition) -> Self {
        Self {
            id: d.id(),
            method: d.method,
            path: d.path_template,
            description: d.description,
            example_path: d.default_path,
            example_body: d.default_body.and_then(|b| serde_json::from_str(b).ok()),
            latency_ms: d.latency_ms,
        }
    }
}

/// Simulated response converted into an HTTP response.
///
/// Descriptor headers are copied; those that are not valid HTTP header
/// names or values are dropped. The elapsed time travels in
/// `X-Sim-Elapsed-Ms`.
pub struct SimResponse(pub ResponseDescriptor);

pub const ELAPSED_HEADER: &str = "x-sim-elapsed-ms";

impl IntoResponse for SimResponse {
    fn into_response(self) -> Response {
        let descriptor = self.0;
        let status =
            StatusCode::from_u16(descriptor.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = match descriptor.body {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        };

        let headers = response.headers_mut();
        for (name, value) in &descriptor.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }
        if let Some(ms) = descriptor.elapsed_ms {
            headers.insert(ELAPSED_HEADER, HeaderValue::from(ms));
        }
        response
    }
}
