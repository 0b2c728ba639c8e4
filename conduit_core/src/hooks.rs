use crate::error::FxError;
use crate::request::ResolvedRequest;
use crate::response::ConduitResponse;
use std::future::{Future, ready};
use std::pin::Pin;

pub type HookFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FxError>> + Send + 'a>>;

/// Invoked exactly once per call with the fully merged request, after the
/// merge and before URL building. The return value fully replaces the
/// resolved request; the pipeline does not re-validate what the hook did.
pub trait RequestHook: Send + Sync + 'static {
    fn on_request(&self, request: ResolvedRequest) -> HookFuture<'_, ResolvedRequest>;
}

/// Invoked exactly once, on the success path only, with the validated and
/// decoded response. Its return value is what the caller receives.
pub trait ResponseHook: Send + Sync + 'static {
    fn on_response(&self, response: ConduitResponse) -> HookFuture<'_, ConduitResponse>;
}

/// Pass-through default for both hook seams.
#[derive(Default)]
pub struct IdentityHook;

impl RequestHook for IdentityHook {
    fn on_request(&self, request: ResolvedRequest) -> HookFuture<'_, ResolvedRequest> {
        Box::pin(ready(Ok(request)))
    }
}

impl ResponseHook for IdentityHook {
    fn on_response(&self, response: ConduitResponse) -> HookFuture<'_, ConduitResponse> {
        Box::pin(ready(Ok(response)))
    }
}

impl<F> RequestHook for F
where
    F: Fn(ResolvedRequest) -> Result<ResolvedRequest, FxError> + Send + Sync + 'static,
{
    fn on_request(&self, request: ResolvedRequest) -> HookFuture<'_, ResolvedRequest> {
        Box::pin(ready(self(request)))
    }
}

impl<F> ResponseHook for F
where
    F: Fn(ConduitResponse) -> Result<ConduitResponse, FxError> + Send + Sync + 'static,
{
    fn on_response(&self, response: ConduitResponse) -> HookFuture<'_, ConduitResponse> {
        Box::pin(ready(self(response)))
    }
}
