//! Path-template matching and parameter extraction.
//!
//! Templates mark parameters with `{name}` segments. Matching is strict:
//! segment counts must agree, literal segments must be equal, and captured
//! values must be non-empty. A single trailing `/` is ignored on both sides.

use std::collections::BTreeMap;

/// Why a concrete path does not fit a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path `{path}` has {actual} segments, template `{template}` expects {expected}")]
    SegmentCount {
        template: String,
        path: String,
        expected: usize,
        actual: usize,
    },
    #[error("segment {index} of `{path}` is `{actual}`, template expects `{expected}`")]
    LiteralMismatch {
        path: String,
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("path parameter `{name}` is empty in `{path}`")]
    EmptyParameter { name: String, path: String },
}

fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    trimmed.split('/').collect()
}

fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Matches `path` against `template` and extracts the parameters.
///
/// # Errors
///
/// Returns a `PathError` describing the first incompatibility found.
///
/// # Examples
///
/// ```
/// use lending_api_sim::sim::path::match_path;
///
/// let params = match_path("/api/v1/deals/{dealId}", "/api/v1/deals/D001").unwrap();
/// assert_eq!(params.get("dealId").map(String::as_str), Some("D001"));
/// ```
pub fn match_path(template: &str, path: &str) -> Result<BTreeMap<String, String>, PathError> {
    let expected = segments(template);
    let actual = segments(path);

    if expected.len() != actual.len() {
        return Err(PathError::SegmentCount {
            template: template.to_string(),
            path: path.to_string(),
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    let mut params = BTreeMap::new();
    for (index, (tpl, seg)) in expected.iter().zip(&actual).enumerate() {
        match param_name(tpl) {
            Some(name) => {
                if seg.is_empty() {
                    return Err(PathError::EmptyParameter {
                        name: name.to_string(),
                        path: path.to_string(),
                    });
                }
                params.insert(name.to_string(), (*seg).to_string());
            }
            None if tpl == seg => {}
            None => {
                return Err(PathError::LiteralMismatch {
                    path: path.to_string(),
                    index,
                    expected: (*tpl).to_string(),
                    actual: (*seg).to_string(),
                });
            }
        }
    }

    Ok(params)
}
