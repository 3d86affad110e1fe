//! Builds request descriptors from user-edited request fields.

use super::path::{PathError, match_path};
use super::types::{KeyValue, RequestDescriptor};
use crate::endpoints::EndpointDefinition;

const CONTENT_TYPE: &str = "Content-Type";

/// Incremental builder for a [`RequestDescriptor`] targeting one endpoint.
///
/// Starts from the endpoint's default path and body, the way the explorer
/// pre-fills its form.
///
/// # Examples
///
/// ```
/// use lending_api_sim::endpoints::Registry;
/// use lending_api_sim::sim::composer::RequestComposer;
///
/// let registry = Registry::standard();
/// let def = registry.get("get-deal").unwrap();
/// let request = RequestComposer::for_endpoint(def)
///     .path("/api/v1/deals/D004")
///     .compose()
///     .unwrap();
/// assert_eq!(request.path_param("dealId"), Some("D004"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestComposer<'a> {
    definition: &'a EndpointDefinition,
    path: String,
    query: Vec<KeyValue>,
    headers: Vec<KeyValue>,
    body: Option<String>,
}

impl<'a> RequestComposer<'a> {
    /// Starts a request pre-filled from `definition`.
    pub fn for_endpoint(definition: &'a EndpointDefinition) -> Self {
        Self {
            definition,
            path: definition.default_path.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: definition.default_body.map(str::to_string),
        }
    }

    /// Replaces the concrete path. A `?a=b` suffix becomes query rows,
    /// percent-decoded with `+` read as a space.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Appends a query row; rows with a blank key are skipped.
    pub fn query(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        push_row(&mut self.query, key.as_ref(), value.into());
        self
    }

    /// Appends a header row; rows with a blank key are skipped.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        push_row(&mut self.headers, key.as_ref(), value.into());
        self
    }

    /// Replaces the body text.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Drops the body, including a pre-filled default.
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Extracts path parameters and produces the descriptor.
    ///
    /// A body without an explicit `Content-Type` row gets
    /// `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns a `PathError` when the edited path no longer fits the
    /// endpoint's template.
    pub fn compose(self) -> Result<RequestDescriptor, PathError> {
        let (path, inline_query) = match self.path.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (self.path.clone(), None),
        };

        let path_params = match_path(self.definition.path_template, &path)?;

        let mut query = Vec::new();
        if let Some(raw) = inline_query {
            for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
                push_row(&mut query, &key, value.into_owned());
            }
        }
        query.extend(self.query);

        let mut headers = self.headers;
        if self.body.is_some() && !headers.iter().any(|h| h.key.eq_ignore_ascii_case(CONTENT_TYPE))
        {
            headers.push(KeyValue::new(CONTENT_TYPE, "application/json"));
        }

        Ok(RequestDescriptor {
            method: self.definition.method,
            path,
            path_params,
            query,
            headers,
            body: self.body,
        })
    }
}

fn push_row(rows: &mut Vec<KeyValue>, key: &str, value: String) {
    let key = key.trim();
    if !key.is_empty() {
        rows.push(KeyValue::new(key, value));
    }
}
