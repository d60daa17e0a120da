//! Client request parsing.
//!
//! Only the first line of the client's bytes is meaningful to the proxy:
//! `<method> <request-uri> <protocol>`. The request-uri must be in absolute
//! form (`http://host/path`) for a forward proxy to know where to connect.

use thiserror::Error;

/// Why a client request could not be parsed.
///
/// A malformed request fails the connection cleanly; no partially-parsed
/// field is ever acted on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The request line held fewer than the three expected tokens.
    #[error("request line has fewer than three tokens")]
    IncompleteRequestLine,

    /// The request target did not start with the literal `http://` scheme.
    #[error("request target {0:?} is not an absolute http:// url")]
    UnsupportedTarget(String),

    /// The request target had no hostname between the scheme and the path.
    #[error("request target {0:?} has an empty hostname")]
    EmptyHostname(String),
}

/// The three tokens of the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    pub request_uri: String,
    pub protocol: String,
}

impl ParsedRequest {
    /// Parse the request line out of a raw request buffer.
    ///
    /// Headers and body in the buffer are ignored; only the first three
    /// whitespace-delimited tokens of the first line matter. Non-UTF-8 bytes
    /// are replaced rather than rejected since the tokens we act on (method,
    /// uri) are ASCII in any request we accept.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(raw);
        let line = text.lines().next().unwrap_or("");
        let mut tokens = line.split_whitespace();

        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(method), Some(request_uri), Some(protocol)) => Ok(Self {
                method: method.to_string(),
                request_uri: request_uri.to_string(),
                protocol: protocol.to_string(),
            }),
            _ => Err(ParseError::IncompleteRequestLine),
        }
    }
}

/// Hostname and path extracted from an absolute request-uri.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTarget {
    pub hostname: String,
    pub path: String,
}

impl ParsedTarget {
    /// Split an absolute `http://` request-uri into hostname and path.
    ///
    /// The hostname is everything up to the next `/`; the path defaults to
    /// `/` when absent. Ports are not parsed: a `host:8080` authority stays
    /// part of the hostname, where the exact-match allowlist will refuse it.
    pub fn from_request_uri(request_uri: &str) -> Result<Self, ParseError> {
        let rest = request_uri
            .strip_prefix("http://")
            .ok_or_else(|| ParseError::UnsupportedTarget(request_uri.to_string()))?;

        let (hostname, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        if hostname.is_empty() {
            return Err(ParseError::EmptyHostname(request_uri.to_string()));
        }

        Ok(Self {
            hostname: hostname.to_string(),
            path: path.to_string(),
        })
    }
}
