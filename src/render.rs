//! Human-readable rendering of simulated responses.

use std::fmt;

use serde_json::Value;

use crate::sim::types::ResponseDescriptor;

/// A response together with its pretty-printed body.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResponse {
    /// The response with `size_bytes` filled in.
    pub response: ResponseDescriptor,
    pub body: String,
}

/// Pretty-prints the body of `response` and records its byte size.
pub fn render(response: &ResponseDescriptor) -> RenderedResponse {
    let body = response.body.as_ref().map(render_body).unwrap_or_default();
    let mut response = response.clone();
    response.size_bytes = Some(body.len());
    RenderedResponse { response, body }
}

/// Renders one JSON body value.
///
/// Objects and arrays use two-space indentation. A string whose first
/// character is `{` or `[` is parsed and re-indented, or kept verbatim if it
/// does not parse.
/// Other strings are printed without quotes; `null` renders as nothing.
pub fn render_body(body: &Value) -> String {
    match body {
        Value::Null => String::new(),
        Value::Object(_) | Value::Array(_) => pretty(body),
        Value::String(text) => {
            if text.starts_with('{') || text.starts_with('[') {
                match serde_json::from_str::<Value>(text) {
                    Ok(parsed) => pretty(&parsed),
                    Err(_) => text.clone(),
                }
            } else {
                text.clone()
            }
        }
        Value::Bool(_) | Value::Number(_) => body.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    // serde_json's pretty printer indents with two spaces.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

impl fmt::Display for RenderedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.response;
        write!(f, "HTTP {} {}", r.status, r.status_text)?;
        match (r.elapsed_ms, r.size_bytes) {
            (Some(ms), Some(bytes)) => writeln!(f, "  ({ms} ms, {bytes} B)")?,
            (None, Some(bytes)) => writeln!(f, "  ({bytes} B)")?,
            _ => writeln!(f)?,
        }
        for (name, value) in &r.headers {
            writeln!(f, "{name}: {value}")?;
        }
        writeln!(f)?;
        if !self.body.is_empty() {
            writeln!(f, "{}", self.body)?;
        }
        Ok(())
    }
}
