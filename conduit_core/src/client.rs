use crate::config::{CallOptions, ConduitConfig};
use crate::debug::{DebugSink, StderrDebugSink};
use crate::endpoint;
use crate::error::ConduitError;
use crate::hooks::{IdentityHook, RequestHook, ResponseHook};
use crate::merge;
use crate::request::{PendingRequest, ResolvedRequest};
use crate::response::ConduitResponse;
use crate::transport::{BuiltRequest, ReqwestTransport, Transport};
use crate::validate;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// The pipeline instance: immutable defaults, the two transform hooks, and
/// the injected transport. Every facade call merges its options over the
/// shared config, runs the request hook, builds the endpoint, issues
/// exactly one transport call, validates and decodes the result, and runs
/// the response hook. All methods take `&self`; concurrent calls through
/// one instance are independent.
pub struct Conduit<T: Transport = ReqwestTransport> {
    config: ConduitConfig,
    transport: T,
    on_request: Arc<dyn RequestHook>,
    on_response: Arc<dyn ResponseHook>,
    sink: Arc<dyn DebugSink>,
}

impl Conduit<ReqwestTransport> {
    pub fn new(config: ConduitConfig) -> Self {
        Self::with_reqwest_client(config, reqwest::Client::new())
    }

    pub fn with_reqwest_client(config: ConduitConfig, client: reqwest::Client) -> Self {
        Self::with_transport(config, ReqwestTransport::new(client))
    }
}

impl<T: Transport> Conduit<T> {
    pub fn with_transport(config: ConduitConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            on_request: Arc::new(IdentityHook),
            on_response: Arc::new(IdentityHook),
            sink: Arc::new(StderrDebugSink),
        }
    }

    pub fn with_request_hook(mut self, hook: impl RequestHook) -> Self {
        self.on_request = Arc::new(hook);
        self
    }

    pub fn with_response_hook(mut self, hook: impl ResponseHook) -> Self {
        self.on_response = Arc::new(hook);
        self
    }

    pub fn with_debug_sink(mut self, sink: impl DebugSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    #[inline]
    pub fn config(&self) -> &ConduitConfig {
        &self.config
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn get(&self, path: impl Into<String>) -> PendingRequest<'_, T> {
        PendingRequest::new(self, Method::GET, path.into(), None)
    }

    #[inline]
    pub fn post(&self, path: impl Into<String>, body: Value) -> PendingRequest<'_, T> {
        PendingRequest::new(self, Method::POST, path.into(), Some(body))
    }

    #[inline]
    pub fn put(&self, path: impl Into<String>, body: Value) -> PendingRequest<'_, T> {
        PendingRequest::new(self, Method::PUT, path.into(), Some(body))
    }

    #[inline]
    pub fn patch(&self, path: impl Into<String>, body: Value) -> PendingRequest<'_, T> {
        PendingRequest::new(self, Method::PATCH, path.into(), Some(body))
    }

    /// DELETE carries no body by default; attach one with
    /// [`PendingRequest::body`] where the server expects it.
    #[inline]
    pub fn delete(&self, path: impl Into<String>) -> PendingRequest<'_, T> {
        PendingRequest::new(self, Method::DELETE, path.into(), None)
    }

    pub(crate) async fn execute(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
        options: CallOptions,
    ) -> Result<ConduitResponse, ConduitError> {
        let resolved = merge::resolve(&self.config, options, method, path, body);
        if resolved.debug.is_very_verbose() {
            self.sink.resolved_request(resolved.debug, &resolved);
        }

        // The hook's result fully replaces the resolved request, debug
        // level included.
        let resolved = self
            .on_request
            .on_request(resolved)
            .await
            .map_err(|source| ConduitError::RequestTransform { source })?;
        let dbg = resolved.debug;

        let url = endpoint::build_endpoint(
            resolved.base_url.as_deref(),
            &resolved.path,
            resolved.params.as_ref(),
        )?;
        let built = build_transport_request(&resolved, url);

        if dbg.is_verbose() {
            self.sink.request_start(dbg, &built.method, built.url.as_str());
        }
        if dbg.is_very_verbose() {
            self.sink.request_headers(dbg, &built.headers);
            if let Some(body) = built.body.as_ref() {
                self.sink.request_body(dbg, body);
            }
        }

        let resp = self.transport.send(&built).await?;
        let response = validate::validate(&built.url, resp, dbg, self.sink.as_ref()).await?;

        if dbg.is_very_verbose() {
            self.sink.response_before_transform(dbg, &response);
        }

        let endpoint = built.url.as_str().to_string();
        self.on_response
            .on_response(response)
            .await
            .map_err(|source| ConduitError::ResponseTransform { endpoint, source })
    }
}

/// JSON defaults overlaid with the resolved headers; resolved headers win
/// per key. The body, when present, is the compact JSON serialization of
/// the resolved body value.
fn build_transport_request(resolved: &ResolvedRequest, url: Url) -> BuiltRequest {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(resolved_headers) = &resolved.headers {
        for (name, value) in resolved_headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }

    let body = resolved
        .body
        .as_ref()
        .map(|v| Bytes::from(v.to_string().into_bytes()));

    BuiltRequest {
        method: resolved.method.clone(),
        url,
        headers,
        body,
    }
}
