//! Error taxonomy for the fetch pipeline.
//!
//! # Design
//! Each stage owns its error type: `TransportError` means no decodable
//! response was obtained, `DecodeError` means a response arrived but could
//! not be read as the requested shape. `FetchError` is what callers of
//! `MealDbClient` see; it wraps the stage errors without altering them, so
//! a forced `TransportError::Timeout` comes out as exactly that.

use thiserror::Error;

/// Maximum number of body characters kept in `FetchError::Http`.
const BODY_SNIPPET_LIMIT: usize = 256;

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// DNS, connect, TLS or read failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out")]
    Timeout,

    /// The request could not be formed (bad URL, unbound path parameter,
    /// invalid header), or its response body exceeded the size limit.
    /// Never worth repeating.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A response was received but could not be read as the requested target.
///
/// `path` is the rendered coding path of the offending value, e.g.
/// `$.meals[0].strMeal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing key `{key}` at {path}")]
    MissingKey { path: String, key: String },

    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The body is not JSON, or is JSON with no usable content.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Errors returned by `MealDbClient` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The server answered with a non-2xx status. `body` is truncated.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl FetchError {
    pub(crate) fn http(status: u16, body: &str) -> Self {
        FetchError::Http {
            status,
            body: snippet(body, BODY_SNIPPET_LIMIT),
        }
    }
}

/// Errors raised while assembling a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL `{0}` cannot carry a path")]
    NotABase(String),

    #[error("invalid timeout `{0}`: expected a whole number of milliseconds")]
    InvalidTimeout(String),
}

/// Keep the first `limit` characters of `s`, marking the cut with an ellipsis.
fn snippet(s: &str, limit: usize) -> String {
    const ELLIPSIS: &str = "…";
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        let mut out = s.chars().take(limit).collect::<String>();
        out.push_str(ELLIPSIS);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_is_wrapped_unchanged() {
        let err: FetchError = TransportError::Timeout.into();
        assert_eq!(err, FetchError::Transport(TransportError::Timeout));
        assert_eq!(err.to_string(), "request timed out");
    }

    #[test]
    fn decode_error_display_names_path() {
        let err = DecodeError::TypeMismatch {
            path: "$.meals[0].idMeal".to_string(),
            expected: "string",
            found: "number",
        };
        assert_eq!(
            err.to_string(),
            "type mismatch at $.meals[0].idMeal: expected string, found number"
        );
    }

    #[test]
    fn http_error_truncates_body() {
        let body = "x".repeat(BODY_SNIPPET_LIMIT + 10);
        let FetchError::Http { status, body } = FetchError::http(502, &body) else {
            panic!("expected Http variant");
        };
        assert_eq!(status, 502);
        assert_eq!(body.chars().count(), BODY_SNIPPET_LIMIT + 1);
        assert!(body.ends_with('…'));
    }

    #[test]
    fn short_body_is_kept_whole() {
        assert_eq!(snippet("not found", 16), "not found");
    }
}
