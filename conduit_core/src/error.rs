use crate::types::JsonKind;
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD as B64;
use http::{HeaderMap, StatusCode};
use std::error::Error;
use thiserror::Error;

pub type FxError = Box<dyn Error + Send + Sync>;

/// Failure taxonomy of the pipeline. Every variant is terminal: nothing is
/// retried and nothing is folded into a default response.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConduitError {
    #[error("malformed url: cannot resolve {path:?} against base {base:?}: {source}")]
    MalformedUrl {
        base: Option<String>,
        path: String,
        source: url::ParseError,
    },

    #[error("transport: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("[{}] [{endpoint}] request failed: {reason}", .status.as_u16())]
    HttpStatus {
        status: StatusCode,
        endpoint: String,
        reason: String,
        /// Bounded diagnostic preview of the response body.
        body: String,
    },

    #[error("[{}] [{endpoint}] request failed: missing content type", .status.as_u16())]
    MissingContentType { status: StatusCode, endpoint: String },

    #[error(
        "[{}] [{endpoint}] request failed: unsupported content type, expected application/json, got {content_type}",
        .status.as_u16()
    )]
    UnsupportedContentType {
        status: StatusCode,
        endpoint: String,
        content_type: String,
    },

    #[error("[{}] [{endpoint}] request failed: body is not valid json: {source}", .status.as_u16())]
    Decode {
        status: StatusCode,
        endpoint: String,
        source: FxError,
    },

    #[error(
        "[{}] [{endpoint}] request failed: expected a json object, got {kind}",
        .status.as_u16()
    )]
    InvalidShape {
        status: StatusCode,
        endpoint: String,
        kind: JsonKind,
    },

    #[error("request transform failed: {source}")]
    RequestTransform { source: FxError },

    #[error("response transform failed (endpoint={endpoint}): {source}")]
    ResponseTransform { endpoint: String, source: FxError },
}

impl ConduitError {
    /// Status the failing response carried, when one was received at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ConduitError::HttpStatus { status, .. }
            | ConduitError::MissingContentType { status, .. }
            | ConduitError::UnsupportedContentType { status, .. }
            | ConduitError::Decode { status, .. }
            | ConduitError::InvalidShape { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Resolved endpoint of the failing call, when known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ConduitError::HttpStatus { endpoint, .. }
            | ConduitError::MissingContentType { endpoint, .. }
            | ConduitError::UnsupportedContentType { endpoint, .. }
            | ConduitError::Decode { endpoint, .. }
            | ConduitError::InvalidShape { endpoint, .. }
            | ConduitError::ResponseTransform { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}

pub fn body_as_text(headers: &HeaderMap, body: &bytes::Bytes, full_len: Option<usize>) -> String {
    const MAX: usize = 8 * 1024;
    let ct = headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let slice = if body.len() > MAX {
        &body[..MAX]
    } else {
        &body[..]
    };
    let total_len = full_len.unwrap_or(body.len());
    if ct.starts_with("application/json") || ct.starts_with("text/") {
        match std::str::from_utf8(slice) {
            Ok(s) => {
                if total_len > slice.len() {
                    format!("{}...", s)
                } else {
                    s.to_owned()
                }
            }
            Err(_) => format!("<non-utf8-text; {} bytes>", slice.len()),
        }
    } else {
        let b64 = B64.encode(slice);
        format!(
            "<non-text; {} bytes; base64:{}{}>",
            total_len,
            &b64[..b64.len().min(1024)],
            if b64.len() > 1024 { "..." } else { "" }
        )
    }
}
