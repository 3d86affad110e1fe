//! Static endpoint registry.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::{DEALS_PATH, Endpoint, FACILITIES_PATH};
use crate::sim::path::match_path;
use crate::sim::types::Method;

/// Registry entry pairing a method and path template with its handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefinition {
    pub endpoint: Endpoint,
    pub method: Method,
    /// Path with `{name}` parameter segments.
    pub path_template: &'static str,
    pub description: &'static str,
    /// Concrete example path used to pre-fill a request.
    pub default_path: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_body: Option<&'static str>,
    /// Artificial network latency applied by default.
    pub latency_ms: u64,
}

impl EndpointDefinition {
    pub fn id(&self) -> &'static str {
        self.endpoint.id()
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Endpoint {
    /// The registry definition of this endpoint.
    pub fn definition(self) -> EndpointDefinition {
        match self {
            Self::ListDeals => EndpointDefinition {
                endpoint: self,
                method: Method::Get,
                path_template: DEALS_PATH,
                description: "List deals, optionally filtered by ?originator=",
                default_path: DEALS_PATH,
                default_body: None,
                latency_ms: 400,
            },
            Self::GetDeal => EndpointDefinition {
                endpoint: self,
                method: Method::Get,
                path_template: "/api/v1/deals/{dealId}",
                description: "Fetch a single deal by id",
                default_path: "/api/v1/deals/D001",
                default_body: None,
                latency_ms: 300,
            },
            Self::CreateDeal => EndpointDefinition {
                endpoint: self,
                method: Method::Post,
                path_template: DEALS_PATH,
                description: "Create a deal (name and originator required)",
                default_path: DEALS_PATH,
                default_body: Some(
                    r#"{"name":"Atlas Auto Loans 2024-2","originator":"FinCorp","amount":7500000,"currency":"USD"}"#,
                ),
                latency_ms: 600,
            },
            Self::UpdateDeal => EndpointDefinition {
                endpoint: self,
                method: Method::Put,
                path_template: "/api/v1/deals/{dealId}",
                description: "Merge fields into an existing deal",
                default_path: "/api/v1/deals/D002",
                default_body: Some(r#"{"status":"Approved"}"#),
                latency_ms: 500,
            },
            Self::DeleteDeal => EndpointDefinition {
                endpoint: self,
                method: Method::Delete,
                path_template: "/api/v1/deals/{dealId}",
                description: "Delete a deal",
                default_path: "/api/v1/deals/D003",
                default_body: None,
                latency_ms: 400,
            },
            Self::ListFacilities => EndpointDefinition {
                endpoint: self,
                method: Method::Get,
                path_template: FACILITIES_PATH,
                description: "List credit facilities with covenants",
                default_path: FACILITIES_PATH,
                default_body: None,
                latency_ms: 350,
            },
        }
    }
}

/// A registry match for a concrete method and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub definition: &'a EndpointDefinition,
    pub path_params: BTreeMap<String, String>,
}

/// Why a method and path did not resolve to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no endpoint matches {method} {path}")]
    NotFound { method: Method, path: String },
    #[error("{method} is not allowed on {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },
}

/// Ordered list of endpoint definitions.
#[derive(Debug, Clone)]
pub struct Registry {
    definitions: Vec<EndpointDefinition>,
}

impl Registry {
    /// The lending-platform endpoints in display order.
    pub fn standard() -> Self {
        Self {
            definitions: Endpoint::ALL.into_iter().map(Endpoint::definition).collect(),
        }
    }

    /// Looks up a definition by endpoint id.
    pub fn get(&self, id: &str) -> Option<&EndpointDefinition> {
        self.definitions.iter().find(|d| d.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Finds the first definition whose method and template match.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::MethodNotAllowed` when some template matches
    /// `path` under a different method, otherwise `ResolveError::NotFound`.
    pub fn resolve(&self, method: Method, path: &str) -> Result<Resolved<'_>, ResolveError> {
        let mut allowed = Vec::new();
        for definition in &self.definitions {
            let Ok(path_params) = match_path(definition.path_template, path) else {
                continue;
            };
            if definition.method == method {
                return Ok(Resolved {
                    definition,
                    path_params,
                });
            }
            if !allowed.contains(&definition.method) {
                allowed.push(definition.method);
            }
        }

        if allowed.is_empty() {
            Err(ResolveError::NotFound {
                method,
                path: path.to_string(),
            })
        } else {
            Err(ResolveError::MethodNotAllowed {
                method,
                path: path.to_string(),
                allowed,
            })
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
