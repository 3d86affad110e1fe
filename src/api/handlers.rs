//! Request handlers for the HTTP front end.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{self, HeaderMap, Uri};
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{EndpointRecord, SimResponse};
use crate::endpoints::ResolveError;
use crate::sim::composer::RequestComposer;
use crate::sim::types::{Method, ResponseDescriptor};

/// Lists the endpoint registry.
///
/// `GET /_sim/endpoints` → 200 + `Vec<EndpointRecord>` JSON
pub async fn list_endpoints(State(state): State<Arc<AppState>>) -> Json<Vec<EndpointRecord>> {
    Json(
        state
            .simulator
            .registry()
            .iter()
            .map(EndpointRecord::from)
            .collect(),
    )
}

/// Resolves any other request against the registry and simulates it.
///
/// Query pairs arrive percent-decoded; every header with a UTF-8 value is
/// forwarded; an empty body counts as no body.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: http::Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    body: String,
) -> impl IntoResponse {
    let simulator = &state.simulator;
    let path = uri.path();

    let Ok(sim_method) = method.as_str().parse::<Method>() else {
        return SimResponse(ResponseDescriptor::error(
            405,
            format!("Method {method} is not supported"),
        ));
    };

    let resolved = match simulator.registry().resolve(sim_method, path) {
        Ok(resolved) => resolved,
        Err(err @ ResolveError::NotFound { .. }) => {
            return SimResponse(ResponseDescriptor::error(404, err.to_string()));
        }
        Err(ResolveError::MethodNotAllowed {
            method,
            path,
            allowed,
        }) => {
            let allow = allowed
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return SimResponse(
                ResponseDescriptor::error(405, format!("{method} is not allowed on {path}"))
                    .with_header("Allow", allow),
            );
        }
    };

    let mut composer = RequestComposer::for_endpoint(resolved.definition)
        .path(path)
        .without_body();
    for (key, value) in query {
        composer = composer.query(key, value);
    }
    for (name, value) in &headers {
        if let Ok(value) = value.to_str() {
            composer = composer.header(name.as_str(), value);
        }
    }
    if !body.is_empty() {
        composer = composer.body(body);
    }

    let request = match composer.compose() {
        Ok(request) => request,
        Err(err) => return SimResponse(ResponseDescriptor::error(404, err.to_string())),
    };

    match simulator.simulate(resolved.definition.id(), &request).await {
        Ok(response) => SimResponse(response),
        Err(err) => {
            warn!(error = %err, "simulation failed");
            SimResponse(ResponseDescriptor::error(500, err.to_string()))
        }
    }
}
