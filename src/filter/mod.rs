//! Free-text search parsing.
//!
//! Turns the search-bar string into structured predicates. The grammar
//! is deliberately tiny: a `method="VALUE"` clause and a `status=N` /
//! `status!=N` clause. Anything else in the text contributes nothing,
//! so parsing never fails. Boolean connectives (`and`, `or`) are
//! accepted as literal text but not evaluated; extracted predicates
//! always apply together.

use regex::Regex;
use std::sync::OnceLock;

fn method_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"method="([^"]+)""#).expect("valid regex"))
}

fn status_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"status(!=|=)(\d+)").expect("valid regex"))
}

/// Comparison operator for a status predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOp {
    Eq,
    Ne,
}

/// A single condition over the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPredicate {
    pub op: StatusOp,
    pub value: u16,
}

/// Structured predicates extracted from a search string.
///
/// At most one predicate per key is honored; when the text contains
/// several clauses for the same key, the leftmost wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    /// Exact-match method filter, case preserved from input
    pub method: Option<String>,
    /// Equality or inequality filter over the status code
    pub status: Option<StatusPredicate>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.method.is_none() && self.status.is_none()
    }
}

/// Parse a free-text search string into a [`FilterSet`].
///
/// Malformed clauses (e.g. a status value that does not fit a status
/// code) are dropped silently; the worst case is an empty result, which
/// clears any active filters when applied.
pub fn parse(text: &str) -> FilterSet {
    let text = text.trim();
    if text.is_empty() {
        return FilterSet::default();
    }

    let method = method_pattern()
        .captures(text)
        .map(|caps| caps[1].to_string());

    let status = status_pattern().captures(text).and_then(|caps| {
        let op = match &caps[1] {
            "!=" => StatusOp::Ne,
            _ => StatusOp::Eq,
        };
        // Values beyond u16 cannot be status codes; treat as malformed.
        caps[2].parse::<u16>().ok().map(|value| StatusPredicate { op, value })
    });

    FilterSet { method, status }
}
