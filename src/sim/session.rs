//! Scripted sequences of calls run against one simulator.
//!
//! A session file is TOML with one `[[call]]` table per request:
//!
//! ```toml
//! [[call]]
//! endpoint = "create-deal"
//! body = '{"name":"Test Co","originator":"Acme"}'
//! expect_status = 201
//!
//! [[call]]
//! endpoint = "list-deals"
//! query = [{ key = "originator", value = "Acme" }]
//! ```
//!
//! `query` and `headers` are arrays of `{ key, value }` rows, applied in
//! order; a key may repeat.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::composer::RequestComposer;
use super::path::PathError;
use super::simulator::{SimError, Simulator};
use super::types::{KeyValue, RequestDescriptor, ResponseDescriptor};
use crate::store::DealStore;

/// Ordered list of calls parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    #[serde(default, rename = "call")]
    pub calls: Vec<ScriptedCall>,
}

/// One call in a session. Omitted fields fall back to the endpoint defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedCall {
    /// Endpoint id, e.g. `"get-deal"`.
    pub endpoint: String,
    pub path: Option<String>,
    #[serde(default)]
    pub query: Vec<KeyValue>,
    #[serde(default)]
    pub headers: Vec<KeyValue>,
    pub body: Option<String>,
    /// Status the call must return for the session to pass.
    pub expect_status: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot read session \"{path}\": {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid session TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("call {index}: unknown endpoint \"{id}\"")]
    UnknownEndpoint { index: usize, id: String },
    #[error("call {index}: {source}")]
    Compose { index: usize, source: PathError },
    #[error("call {index}: {source}")]
    Simulate { index: usize, source: SimError },
}

impl SessionScript {
    /// Parses a session from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a session from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Parse` on invalid TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self, SessionError> {
        Ok(toml::from_str(s)?)
    }
}

/// Result of one scripted call.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    /// Zero-based position in the script.
    pub index: usize,
    pub endpoint: String,
    pub request: RequestDescriptor,
    pub response: ResponseDescriptor,
    pub expected_status: Option<u16>,
}

impl CallOutcome {
    /// `true` unless an expected status was given and not met.
    pub fn passed(&self) -> bool {
        self.expected_status
            .is_none_or(|expected| expected == self.response.status)
    }
}

/// Runs every call of `script` in order against `simulator`.
///
/// Calls share the simulator's store, so a deal created early in the script
/// is visible to later calls. A status mismatch does not stop the session;
/// check [`CallOutcome::passed`].
///
/// # Errors
///
/// Stops at the first call naming an unknown endpoint or carrying a path
/// that does not fit its endpoint's template.
pub async fn run_session<S: DealStore>(
    simulator: &Simulator<S>,
    script: &SessionScript,
) -> Result<Vec<CallOutcome>, SessionError> {
    let mut outcomes = Vec::with_capacity(script.calls.len());

    for (index, call) in script.calls.iter().enumerate() {
        let definition = simulator.registry().get(&call.endpoint).ok_or_else(|| {
            SessionError::UnknownEndpoint {
                index,
                id: call.endpoint.clone(),
            }
        })?;

        let mut composer = RequestComposer::for_endpoint(definition);
        if let Some(path) = &call.path {
            composer = composer.path(path);
        }
        for row in &call.query {
            composer = composer.query(&row.key, row.value.as_str());
        }
        for row in &call.headers {
            composer = composer.header(&row.key, row.value.as_str());
        }
        if let Some(body) = &call.body {
            composer = composer.body(body);
        }
        let request = composer
            .compose()
            .map_err(|source| SessionError::Compose { index, source })?;

        let response = simulator
            .simulate(&call.endpoint, &request)
            .await
            .map_err(|source| SessionError::Simulate { index, source })?;

        outcomes.push(CallOutcome {
            index,
            endpoint: call.endpoint.clone(),
            request,
            response,
            expected_status: call.expect_status,
        });
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    info!(calls = outcomes.len(), failed, "session finished");
    Ok(outcomes)
}
