use crate::request::ResolvedRequest;
use crate::response::ConduitResponse;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
#[derive(Default)]
pub enum DebugLevel {
    #[default]
    None = 0,
    V = 1,
    VV = 2,
}

impl DebugLevel {
    #[inline]
    pub fn is_enabled(self) -> bool {
        self != DebugLevel::None
    }

    #[inline]
    pub fn is_verbose(self) -> bool {
        self >= DebugLevel::V
    }

    #[inline]
    pub fn is_very_verbose(self) -> bool {
        self >= DebugLevel::VV
    }
}

impl From<bool> for DebugLevel {
    fn from(enabled: bool) -> Self {
        if enabled { DebugLevel::V } else { DebugLevel::None }
    }
}

impl core::fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DebugLevel::None => f.write_str("none"),
            DebugLevel::V => f.write_str("v"),
            DebugLevel::VV => f.write_str("vv"),
        }
    }
}

/// Side channel for pipeline diagnostics. No contract on format; the only
/// behavior relied upon is that sensitive header values never reach the
/// sink output un-redacted (see `header_value_for_debug`).
pub trait DebugSink: Send + Sync + 'static {
    fn resolved_request(&self, dbg: DebugLevel, req: &ResolvedRequest);
    fn request_start(&self, dbg: DebugLevel, method: &Method, url: &str);
    fn request_headers(&self, dbg: DebugLevel, headers: &HeaderMap);
    fn request_body(&self, dbg: DebugLevel, body: &Bytes);

    fn response_status(&self, dbg: DebugLevel, status: StatusCode, url: &str, ok: bool);
    fn response_headers(&self, dbg: DebugLevel, headers: &HeaderMap);
    fn response_body_preview(&self, dbg: DebugLevel, preview: &str);
    fn response_before_transform(&self, dbg: DebugLevel, resp: &ConduitResponse);
}

#[derive(Default)]
pub struct NoopDebugSink;
impl DebugSink for NoopDebugSink {
    #[inline]
    fn resolved_request(&self, _: DebugLevel, _: &ResolvedRequest) {}
    #[inline]
    fn request_start(&self, _: DebugLevel, _: &Method, _: &str) {}
    #[inline]
    fn request_headers(&self, _: DebugLevel, _: &HeaderMap) {}
    #[inline]
    fn request_body(&self, _: DebugLevel, _: &Bytes) {}
    #[inline]
    fn response_status(&self, _: DebugLevel, _: StatusCode, _: &str, _: bool) {}
    #[inline]
    fn response_headers(&self, _: DebugLevel, _: &HeaderMap) {}
    #[inline]
    fn response_body_preview(&self, _: DebugLevel, _: &str) {}
    #[inline]
    fn response_before_transform(&self, _: DebugLevel, _: &ConduitResponse) {}
}

pub struct StderrDebugSink;
impl DebugSink for StderrDebugSink {
    fn resolved_request(&self, dbg: DebugLevel, req: &ResolvedRequest) {
        eprintln!(
            "[conduit:{}] resolved {} {} (base={:?})",
            dbg, req.method, req.path, req.base_url
        );
        if let Some(params) = &req.params {
            for (k, v) in params.iter() {
                eprintln!("  param {}={}", k, v);
            }
        }
        if let Some(headers) = &req.headers {
            for (k, v) in headers.iter() {
                eprintln!("  header {}: {}", k, header_value_for_debug(k, v));
            }
        }
        if let Some(body) = &req.body {
            eprintln!("  body: {}", truncate_for_debug(&body.to_string(), MAX_BODY_CHARS));
        }
    }

    fn request_start(&self, dbg: DebugLevel, method: &Method, url: &str) {
        eprintln!("[conduit:{}] -> {} {}", dbg, method, url);
    }

    fn request_headers(&self, dbg: DebugLevel, headers: &HeaderMap) {
        eprintln!("[conduit:{}] request headers:", dbg);
        for (k, v) in headers.iter() {
            eprintln!("  {}: {}", k, header_value_for_debug(k, v));
        }
    }

    fn request_body(&self, dbg: DebugLevel, body: &Bytes) {
        let preview = truncate_for_debug(&String::from_utf8_lossy(body), MAX_BODY_CHARS);
        eprintln!(
            "[conduit:{}] request body ({} bytes): {}",
            dbg,
            body.len(),
            preview
        );
    }

    fn response_status(&self, dbg: DebugLevel, status: StatusCode, url: &str, ok: bool) {
        if ok {
            eprintln!("[conduit:{}] <- {} {} (ok)", dbg, status.as_u16(), url);
        } else {
            eprintln!("[conduit:{}] <- {} {} (error)", dbg, status.as_u16(), url);
        }
    }

    fn response_headers(&self, dbg: DebugLevel, headers: &HeaderMap) {
        eprintln!("[conduit:{}] response headers:", dbg);
        for (k, v) in headers.iter() {
            eprintln!("  {}: {}", k, header_value_for_debug(k, v));
        }
    }

    fn response_body_preview(&self, dbg: DebugLevel, preview: &str) {
        eprintln!("[conduit:{}] response body preview: {}", dbg, preview);
    }

    fn response_before_transform(&self, dbg: DebugLevel, resp: &ConduitResponse) {
        eprintln!(
            "[conduit:{}] response before transform: {}",
            dbg,
            truncate_for_debug(&resp.data.to_string(), MAX_BODY_CHARS)
        );
    }
}

const MAX_BODY_CHARS: usize = 32 * 1024;

fn is_sensitive_header_name(name: &HeaderName) -> bool {
    // HeaderName::as_str() is normalized to lowercase.
    let n = name.as_str();
    matches!(n, "authorization" | "proxy-authorization" | "cookie" | "set-cookie")
        // Common vendor patterns
        || n.contains("token")
        || n.contains("secret")
        || n.contains("api-key")
        || n.contains("apikey")
        || n.ends_with("-key")
}

pub(crate) fn header_value_for_debug(name: &HeaderName, value: &HeaderValue) -> String {
    if is_sensitive_header_name(name) {
        "<redacted>".to_string()
    } else {
        value.to_str().unwrap_or("<non-utf8>").to_string()
    }
}

pub(crate) fn truncate_for_debug(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let mut it = s.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        match it.next() {
            Some(c) => out.push(c),
            None => return out,
        }
    }
    if it.next().is_some() {
        out.push('…');
    }
    out
}
