use crate::debug::DebugLevel;
use crate::types::{ParamMap, ParamValue};
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use serde_json::Value;

/// Instance-level defaults, bound once when the pipeline is created and
/// never mutated by a call. Every field defaults to absent rather than to
/// an empty mapping, so the merge can tell "not set" from "set empty".
#[derive(Clone, Debug, Default)]
pub struct ConduitConfig {
    pub base_url: Option<String>,
    pub headers: Option<HeaderMap>,
    pub params: Option<ParamMap>,
    pub body: Option<Value>,
    pub debug: Option<DebugLevel>,
}

impl ConduitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = Some(base.into());
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.get_or_insert_with(HeaderMap::new).insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.get_or_insert_with(ParamMap::new).set(key, value);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn debug(mut self, level: DebugLevel) -> Self {
        self.debug = Some(level);
        self
    }
}

/// Per-call overrides, same mergeable shape as [`ConduitConfig`]. Hooks and
/// the transport are fixed per instance and intentionally absent here.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    pub base_url: Option<String>,
    pub headers: Option<HeaderMap>,
    pub params: Option<ParamMap>,
    pub body: Option<Value>,
    pub debug: Option<DebugLevel>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = Some(base.into());
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.get_or_insert_with(HeaderMap::new).insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.get_or_insert_with(ParamMap::new).set(key, value);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn debug(mut self, level: DebugLevel) -> Self {
        self.debug = Some(level);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http::header::ACCEPT;
    use serde_json::json;

    #[test]
    fn unset_fields_stay_absent() {
        let cfg = ConduitConfig::new().base_url("https://api.example.com");
        assert!(cfg.headers.is_none());
        assert!(cfg.params.is_none());
        assert!(cfg.body.is_none());
        assert!(cfg.debug.is_none());
    }

    #[test]
    fn builders_accumulate() {
        let opts = CallOptions::new()
            .header(ACCEPT, http::HeaderValue::from_static("application/json"))
            .param("page", 2)
            .body(json!({"k": true}));
        assert_eq!(opts.headers.as_ref().map(|h| h.len()), Some(1));
        assert_eq!(opts.params.as_ref().map(|p| p.len()), Some(1));
        assert_eq!(opts.body, Some(json!({"k": true})));
    }
}
