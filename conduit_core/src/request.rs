use crate::client::Conduit;
use crate::config::CallOptions;
use crate::debug::DebugLevel;
use crate::error::ConduitError;
use crate::response::ConduitResponse;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{ParamMap, ParamValue};
use core::future::IntoFuture;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde_json::Value;

/// The fully merged, ready-to-dispatch request description.
///
/// Method and path are always present; every other field stays `None`
/// unless something set it, so a request hook can tell "not set" from
/// "set empty". A hook receives this by value and its return value fully
/// replaces it.
#[derive(Clone, Debug)]
pub struct ResolvedRequest {
    pub method: Method,
    pub path: String,
    pub base_url: Option<String>,
    pub headers: Option<HeaderMap>,
    pub params: Option<ParamMap>,
    pub body: Option<Value>,
    pub debug: DebugLevel,
}

/// One call through the pipeline, not yet dispatched. Verb and path are
/// fixed by the facade method that created it; per-call overrides
/// accumulate here and are merged with the instance defaults on execute.
pub struct PendingRequest<'a, T: Transport = ReqwestTransport> {
    client: &'a Conduit<T>,
    method: Method,
    path: String,
    body: Option<Value>,
    options: CallOptions,
}

impl<'a, T: Transport> PendingRequest<'a, T> {
    #[inline]
    pub(crate) fn new(
        client: &'a Conduit<T>,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Self {
        Self {
            client,
            method,
            path,
            body,
            options: CallOptions::new(),
        }
    }

    /// Replace the per-call overrides wholesale.
    #[inline]
    pub fn options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        self.options.base_url = Some(base.into());
        self
    }

    #[inline]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.options = self.options.header(name, value);
        self
    }

    #[inline]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.options = self.options.param(key, value);
        self
    }

    /// Body for this call. For POST/PUT/PATCH this overwrites the facade's
    /// positional body; for DELETE it is the only way to attach one.
    #[inline]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[inline]
    pub fn debug_level(mut self, level: DebugLevel) -> Self {
        self.options.debug = Some(level);
        self
    }

    pub async fn execute(self) -> Result<ConduitResponse, ConduitError> {
        self.client
            .execute(self.method, self.path, self.body, self.options)
            .await
    }
}

impl<'a, T: Transport> IntoFuture for PendingRequest<'a, T> {
    type Output = Result<ConduitResponse, ConduitError>;
    type IntoFuture = std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.execute().await })
    }
}
