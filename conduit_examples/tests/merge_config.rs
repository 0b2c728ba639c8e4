use conduit_core::prelude::*;
use conduit_test_support::*;
use http::HeaderValue;
use http::header::{AUTHORIZATION, USER_AGENT};
use serde_json::json;

#[tokio::test]
async fn call_params_override_defaults_key_by_key() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let api = Conduit::with_transport(
        ConduitConfig::new()
            .base_url("https://api.example.com")
            .param("page", 1)
            .param("limit", 20),
        transport,
    );

    api.get("/todos")
        .param("page", 3)
        .param("active", true)
        .await
        .unwrap();

    let recorded = handle.recorded();
    assert_request(&recorded[0]).query_is("page=3&limit=20&active=true");
    handle.finish();
}

#[tokio::test]
async fn call_headers_override_defaults_per_key_and_keep_the_rest() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let api = Conduit::with_transport(
        ConduitConfig::new()
            .base_url("https://api.example.com")
            .header(USER_AGENT, HeaderValue::from_static("conduit/1"))
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer default")),
        transport,
    );

    api.get("/todos")
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer call"))
        .await
        .unwrap();

    let recorded = handle.recorded();
    assert_request(&recorded[0])
        .header(USER_AGENT, "conduit/1")
        .header(AUTHORIZATION, "Bearer call");
    handle.finish();
}

#[tokio::test]
async fn default_body_deep_merges_under_the_call_body() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let api = Conduit::with_transport(
        ConduitConfig::new()
            .base_url("https://api.example.com")
            .body(json!({"meta": {"client": "conduit", "v": 1}})),
        transport,
    );

    api.post("/todos", json!({"meta": {"v": 2}, "name": "a"}))
        .await
        .unwrap();

    let recorded = handle.recorded();
    assert_request(&recorded[0]).body_json(&json!({
        "meta": {"client": "conduit", "v": 2},
        "name": "a"
    }));
    handle.finish();
}

#[tokio::test]
async fn per_call_base_url_wins() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let api = Conduit::with_transport(
        ConduitConfig::new().base_url("https://api.example.com"),
        transport,
    );

    api.get("/todos")
        .base_url("https://staging.example.net")
        .await
        .unwrap();

    let recorded = handle.recorded();
    assert_request(&recorded[0]).host("staging.example.net");
    handle.finish();
}

#[tokio::test]
async fn options_struct_is_equivalent_to_builder_setters() {
    let (transport, handle) = mock()
        .reply(MockReply::ok_json(json_bytes(&json!({}))))
        .build();
    let api = Conduit::with_transport(
        ConduitConfig::new().base_url("https://api.example.com"),
        transport,
    );

    let opts = CallOptions::new()
        .param("q", "x")
        .header(USER_AGENT, HeaderValue::from_static("other/2"));
    api.get("/search").options(opts).await.unwrap();

    let recorded = handle.recorded();
    assert_request(&recorded[0])
        .query_is("q=x")
        .header(USER_AGENT, "other/2");
    handle.finish();
}
