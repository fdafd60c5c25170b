//! Query shape and length guard.
//!
//! Validation runs before normalization and before any matcher. A failure
//! is a caller error: it is returned as [`InvalidQuery`] and never reaches
//! the matching pipeline.

use serde::Serialize;
use thiserror::Error;

/// Maximum query length, in characters, measured before trimming.
pub const MAX_QUERY_CHARS: usize = 500;

/// A raw query as received from a transport, before any checks.
///
/// Transports map their own payloads into this shape so the rules below
/// stay independent of JSON, CLI arguments, or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryInput<'a> {
    /// No value was supplied (absent field, JSON `null`).
    Missing,
    /// A textual value.
    Text(&'a str),
    /// A value of some other type (number, object, array, boolean).
    NonText,
}

impl<'a> QueryInput<'a> {
    /// Classify an optional JSON value, e.g. the `message` field of a
    /// request body.
    pub fn from_json(value: Option<&'a serde_json::Value>) -> Self {
        match value {
            None | Some(serde_json::Value::Null) => Self::Missing,
            Some(serde_json::Value::String(s)) => Self::Text(s),
            Some(_) => Self::NonText,
        }
    }
}

impl<'a> From<&'a str> for QueryInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for QueryInput<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Self::Missing, Self::Text)
    }
}

/// Why a query was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidQueryReason {
    Missing,
    EmptyOrWrongType,
    TooLong,
}

impl InvalidQueryReason {
    /// Stable machine-readable code, as exposed by the HTTP API.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "MISSING_MESSAGE",
            Self::EmptyOrWrongType => "INVALID_MESSAGE",
            Self::TooLong => "MESSAGE_TOO_LONG",
        }
    }
}

/// A rejected query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidQuery {
    #[error("message is required")]
    Missing,
    #[error("message must be a non-empty string")]
    EmptyOrWrongType,
    #[error("message too long: {chars} characters (max {max})", max = MAX_QUERY_CHARS)]
    TooLong { chars: usize },
}

impl InvalidQuery {
    pub fn reason(&self) -> InvalidQueryReason {
        match self {
            Self::Missing => InvalidQueryReason::Missing,
            Self::EmptyOrWrongType => InvalidQueryReason::EmptyOrWrongType,
            Self::TooLong { .. } => InvalidQueryReason::TooLong,
        }
    }
}

/// Apply the validation rules in order and return the accepted text.
///
/// 1. Missing → [`InvalidQuery::Missing`].
/// 2. Non-text, or text that trims to nothing → [`InvalidQuery::EmptyOrWrongType`].
/// 3. More than [`MAX_QUERY_CHARS`] characters → [`InvalidQuery::TooLong`].
pub fn validate<'a>(input: QueryInput<'a>) -> Result<&'a str, InvalidQuery> {
    let text = match input {
        QueryInput::Missing => return Err(InvalidQuery::Missing),
        QueryInput::NonText => return Err(InvalidQuery::EmptyOrWrongType),
        QueryInput::Text(text) => text,
    };

    if text.trim().is_empty() {
        return Err(InvalidQuery::EmptyOrWrongType);
    }

    let chars = text.chars().count();
    if chars > MAX_QUERY_CHARS {
        return Err(InvalidQuery::TooLong { chars });
    }

    Ok(text)
}
