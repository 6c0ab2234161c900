//! RAG query validation
//!
//! Turns an untyped JSON request body into a validated [`RagQuery`].

use crate::{KbGateError, Result};
use serde_json::Value;

/// Top-K used when the request does not specify one
pub const DEFAULT_TOP_K: u8 = 5;

/// Smallest accepted top-K
pub const MIN_TOP_K: u8 = 1;

/// Largest accepted top-K
pub const MAX_TOP_K: u8 = 20;

pub const MISSING_QUERY_MESSAGE: &str = "Missing 'query' in body";

/// A validated query request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagQuery {
    /// Trimmed, non-empty user query
    pub query: String,
    /// Number of candidates to ask for
    pub top_k: u8,
}

impl RagQuery {
    /// Create a query, validating both fields
    pub fn new(query: impl AsRef<str>, top_k: Option<i64>) -> Result<Self> {
        let query = query.as_ref().trim();
        if query.is_empty() {
            return Err(KbGateError::Validation(MISSING_QUERY_MESSAGE.to_string()));
        }

        let top_k = match top_k {
            None => DEFAULT_TOP_K,
            Some(k) => validate_top_k(k)?,
        };

        Ok(Self {
            query: query.to_string(),
            top_k,
        })
    }

    /// Validate a JSON request body.
    ///
    /// `query` may be a string, number or boolean; anything else counts as
    /// missing. `top` may be an integer (whole-valued floats such as `5.0`
    /// included) or a string holding one.
    pub fn from_json(body: &Value) -> Result<Self> {
        let query = match body.get("query") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        };

        // Query is checked first so an empty query wins over a bad top.
        if query.trim().is_empty() {
            return Err(KbGateError::Validation(MISSING_QUERY_MESSAGE.to_string()));
        }

        let top_k = match body.get("top") {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_top(value)?),
        };

        Self::new(query, top_k)
    }
}

fn parse_top(value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(invalid_top)
}

fn validate_top_k(k: i64) -> Result<u8> {
    if (i64::from(MIN_TOP_K)..=i64::from(MAX_TOP_K)).contains(&k) {
        Ok(k as u8)
    } else {
        Err(invalid_top())
    }
}

fn invalid_top() -> KbGateError {
    KbGateError::Validation(format!(
        "Invalid 'top': must be an integer between {MIN_TOP_K} and {MAX_TOP_K}"
    ))
}
