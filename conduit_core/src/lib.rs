mod client;
mod config;
mod debug;
mod endpoint;
pub mod error;
mod hooks;
mod merge;
mod request;
mod response;
pub mod transport;
mod types;
mod validate;

pub mod prelude {
    pub use crate::client::Conduit;
    pub use crate::config::{CallOptions, ConduitConfig};
    pub use crate::debug::{DebugLevel, DebugSink, NoopDebugSink, StderrDebugSink};
    pub use crate::error::{ConduitError, FxError};
    pub use crate::hooks::{HookFuture, IdentityHook, RequestHook, ResponseHook};
    pub use crate::merge::deep_merge;
    pub use crate::request::{PendingRequest, ResolvedRequest};
    pub use crate::response::ConduitResponse;
    pub use crate::transport::{ReqwestTransport, Transport};
    pub use crate::types::{JsonKind, ParamMap, ParamValue};
}
