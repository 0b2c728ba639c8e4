use crate::debug::{DebugLevel, DebugSink};
use crate::error::{ConduitError, body_as_text};
use crate::response::ConduitResponse;
use crate::transport::{TransportBody, TransportError, TransportResponse};
use crate::types::JsonKind;
use http::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

const PREVIEW_MAX: usize = 8 * 1024;

/// Ordered short-circuit validation of one transport result. The first
/// failing check wins; the order is load-bearing (callers rely on getting
/// the most specific applicable failure) and must not change:
/// status -> content-type presence -> content-type match -> decode -> shape.
pub(crate) async fn validate(
    endpoint: &Url,
    mut resp: TransportResponse,
    dbg: DebugLevel,
    sink: &dyn DebugSink,
) -> Result<ConduitResponse, ConduitError> {
    let status = resp.status;
    let endpoint_str = endpoint.as_str();

    if dbg.is_verbose() {
        sink.response_status(dbg, status, endpoint_str, status.is_success());
    }
    if dbg.is_very_verbose() {
        sink.response_headers(dbg, &resp.headers);
    }

    // The transport's own success indicator is authoritative.
    if !status.is_success() {
        let full_len = resp.content_length.map(|n| n as usize);
        // Diagnostic read only; a failed read folds into the same failure.
        let preview = match read_body_preview(resp.body.as_mut(), PREVIEW_MAX).await {
            Ok(bytes) => body_as_text(&resp.headers, &bytes, full_len),
            Err(_) => "<diagnostic body read failed>".to_string(),
        };
        if dbg.is_very_verbose() {
            sink.response_body_preview(dbg, &preview);
        }
        return Err(ConduitError::HttpStatus {
            status,
            endpoint: endpoint_str.to_string(),
            reason: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
            body: preview,
        });
    }

    let content_type = match resp.headers.get(CONTENT_TYPE) {
        None => {
            return Err(ConduitError::MissingContentType {
                status,
                endpoint: endpoint_str.to_string(),
            });
        }
        Some(value) => value.to_str().unwrap_or("<non-utf8>").to_string(),
    };
    if !content_type.contains("application/json") {
        return Err(ConduitError::UnsupportedContentType {
            status,
            endpoint: endpoint_str.to_string(),
            content_type,
        });
    }

    let bytes = read_body_all(resp.body.as_mut()).await?;
    let data: Value = serde_json::from_slice(&bytes).map_err(|e| ConduitError::Decode {
        status,
        endpoint: endpoint_str.to_string(),
        source: Box::new(e),
    })?;

    match &data {
        Value::Object(_) => {}
        other => {
            return Err(ConduitError::InvalidShape {
                status,
                endpoint: endpoint_str.to_string(),
                kind: JsonKind::of(other),
            });
        }
    }

    Ok(ConduitResponse {
        data,
        headers: resp.headers,
    })
}

async fn read_body_preview(
    body: &mut dyn TransportBody,
    max: usize,
) -> Result<bytes::Bytes, TransportError> {
    let mut buf = bytes::BytesMut::with_capacity(max.min(8 * 1024));
    while buf.len() < max {
        match body.next_chunk().await? {
            Some(chunk) => {
                let remaining = max - buf.len();
                if chunk.len() <= remaining {
                    buf.extend_from_slice(&chunk);
                } else {
                    buf.extend_from_slice(&chunk[..remaining]);
                    break;
                }
            }
            None => break,
        }
    }
    Ok(buf.freeze())
}

async fn read_body_all(body: &mut dyn TransportBody) -> Result<bytes::Bytes, TransportError> {
    let mut buf = bytes::BytesMut::with_capacity(8 * 1024);
    while let Some(chunk) = body.next_chunk().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
