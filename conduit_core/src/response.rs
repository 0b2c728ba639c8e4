use http::header::AsHeaderName;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Output of a successful call: the decoded body (always a non-null JSON
/// object once validation passed) and the response headers carried through
/// unchanged. Built once per call, handed to the response hook, returned.
#[derive(Clone, Debug)]
pub struct ConduitResponse {
    pub data: Value,
    pub headers: HeaderMap,
}

impl ConduitResponse {
    /// Header lookup by name, UTF-8 values only.
    pub fn header(&self, name: impl AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decode `data` into a typed model.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}
