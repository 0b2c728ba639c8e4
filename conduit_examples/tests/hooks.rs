use conduit_core::prelude::*;
use conduit_test_support::*;
use http::{HeaderValue, StatusCode};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn base() -> ConduitConfig {
    ConduitConfig::new().base_url("https://api.example.com")
}

#[tokio::test]
async fn request_hook_result_fully_replaces_the_request() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let hook = |mut req: ResolvedRequest| -> Result<ResolvedRequest, FxError> {
        req.path = "/rewritten".to_string();
        let headers = req.headers.get_or_insert_with(http::HeaderMap::new);
        headers.insert("x-trace", HeaderValue::from_static("t-1"));
        Ok(req)
    };
    let api = Conduit::with_transport(base(), transport).with_request_hook(hook);

    api.get("/original").await.unwrap();

    let recorded = handle.recorded();
    assert_request(&recorded[0])
        .path("/rewritten")
        .header("x-trace", "t-1");
    handle.finish();
}

struct Renamer;

impl RequestHook for Renamer {
    fn on_request(&self, mut request: ResolvedRequest) -> HookFuture<'_, ResolvedRequest> {
        Box::pin(async move {
            request.path = "/async-renamed".to_string();
            Ok(request)
        })
    }
}

#[tokio::test]
async fn request_hook_may_suspend() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let api = Conduit::with_transport(base(), transport).with_request_hook(Renamer);

    api.get("/original").await.unwrap();

    assert_request(&handle.recorded()[0]).path("/async-renamed");
    handle.finish();
}

#[tokio::test]
async fn response_hook_runs_once_on_success_and_its_value_is_returned() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({"id": 1}))))
        .build();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let hook = move |mut resp: ConduitResponse| -> Result<ConduitResponse, FxError> {
        seen.fetch_add(1, Ordering::SeqCst);
        resp.data["transformed"] = json!(true);
        Ok(resp)
    };
    let api = Conduit::with_transport(base(), transport).with_response_hook(hook);

    let resp = api.get("/todos/1").await.unwrap();
    assert_eq!(resp.data, json!({"id": 1, "transformed": true}));
    assert_eq!(count.load(Ordering::SeqCst), 1);
    handle.finish();
}

#[tokio::test]
async fn response_hook_never_runs_on_failure() {
    let (transport, handle) = mock()
        .reply(MockReply::status(StatusCode::NOT_FOUND))
        .build();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let hook = move |resp: ConduitResponse| -> Result<ConduitResponse, FxError> {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(resp)
    };
    let api = Conduit::with_transport(base(), transport).with_response_hook(hook);

    let err = api.get("/todos/1").await.unwrap_err();
    assert!(matches!(err, ConduitError::HttpStatus { .. }));
    assert_eq!(count.load(Ordering::SeqCst), 0);
    handle.finish();
}

#[tokio::test]
async fn request_hook_failure_propagates_as_request_transform() {
    let (transport, handle) = mock().build();
    let hook = |_req: ResolvedRequest| -> Result<ResolvedRequest, FxError> {
        Err("auth token expired".into())
    };
    let api = Conduit::with_transport(base(), transport).with_request_hook(hook);

    let err = api.get("/todos").await.unwrap_err();
    match err {
        ConduitError::RequestTransform { source } => {
            assert_eq!(source.to_string(), "auth token expired");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Failed before URL building; the transport was never called.
    handle.assert_recorded_len(0);
    handle.finish();
}

#[tokio::test]
async fn response_hook_failure_propagates_as_response_transform() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let hook = |_resp: ConduitResponse| -> Result<ConduitResponse, FxError> {
        Err("schema drift".into())
    };
    let api = Conduit::with_transport(base(), transport).with_response_hook(hook);

    let err = api.get("/todos").await.unwrap_err();
    match err {
        ConduitError::ResponseTransform { endpoint, source } => {
            assert_eq!(endpoint, "https://api.example.com/todos");
            assert_eq!(source.to_string(), "schema drift");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    handle.finish();
}
