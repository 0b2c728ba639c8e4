use crate::config::{CallOptions, ConduitConfig};
use crate::request::ResolvedRequest;
use crate::types::ParamMap;
use http::{HeaderMap, Method};
use serde_json::Value;

/// Right-biased resolution of instance defaults and per-call overrides into
/// one [`ResolvedRequest`]. Pure: the defaults are cloned, never mutated,
/// and the same defaults can be resolved any number of times.
///
/// Precedence for the body slot: `options.body` beats the facade's
/// positional `body`, and the winner is deep-merged over the instance
/// default body.
pub(crate) fn resolve(
    defaults: &ConduitConfig,
    options: CallOptions,
    method: Method,
    path: String,
    body: Option<Value>,
) -> ResolvedRequest {
    let call_body = options.body.or(body);
    ResolvedRequest {
        method,
        path,
        base_url: options.base_url.or_else(|| defaults.base_url.clone()),
        headers: merge_headers(defaults.headers.as_ref(), options.headers),
        params: merge_params(defaults.params.as_ref(), options.params),
        body: merge_body(defaults.body.as_ref(), call_body),
        debug: options.debug.or(defaults.debug).unwrap_or_default(),
    }
}

/// Key-by-key merge; override values win per key. A side that is absent
/// contributes nothing, and two absent sides stay absent (no empty map is
/// materialized).
fn merge_headers(defaults: Option<&HeaderMap>, overrides: Option<HeaderMap>) -> Option<HeaderMap> {
    match (defaults, overrides) {
        (None, None) => None,
        (Some(d), None) => Some(d.clone()),
        (None, Some(o)) => Some(o),
        (Some(d), Some(o)) => {
            let mut merged = d.clone();
            for (name, value) in o.iter() {
                merged.insert(name.clone(), value.clone());
            }
            Some(merged)
        }
    }
}

/// Same rule over the ordered param map: merged output keeps the defaults'
/// insertion order, override keys replace in place, new keys append.
fn merge_params(defaults: Option<&ParamMap>, overrides: Option<ParamMap>) -> Option<ParamMap> {
    match (defaults, overrides) {
        (None, None) => None,
        (Some(d), None) => Some(d.clone()),
        (None, Some(o)) => Some(o),
        (Some(d), Some(o)) => {
            let mut merged = d.clone();
            for (key, value) in o.iter() {
                merged.set(key, value.clone());
            }
            Some(merged)
        }
    }
}

fn merge_body(defaults: Option<&Value>, call: Option<Value>) -> Option<Value> {
    match (defaults, call) {
        (None, None) => None,
        (Some(d), None) => Some(d.clone()),
        (None, Some(c)) => Some(c),
        (Some(d), Some(c)) => {
            let mut merged = d.clone();
            deep_merge(&mut merged, &c);
            Some(merged)
        }
    }
}

/// Deep-merge `overlay` into `base`:
/// - objects merge recursively; overlay keys overwrite/merge base keys
/// - arrays are replaced by the overlay entirely
/// - scalars and null are replaced by the overlay
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (k, v) in overlay_map {
                match base_map.get_mut(k) {
                    Some(bv) => deep_merge(bv, v),
                    None => {
                        base_map.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (b, v) => {
            *b = v.clone();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::debug::DebugLevel;
    use http::HeaderValue;
    use http::header::{ACCEPT, USER_AGENT};
    use serde_json::json;

    fn resolved(defaults: &ConduitConfig, options: CallOptions) -> ResolvedRequest {
        resolve(defaults, options, Method::GET, "/x".to_string(), None)
    }

    #[test]
    fn deep_merge_is_recursive_and_right_biased() {
        let mut base = json!({"a": {"x": 1, "y": 2}});
        deep_merge(&mut base, &json!({"a": {"y": 9}}));
        assert_eq!(base, json!({"a": {"x": 1, "y": 9}}));
    }

    #[test]
    fn deep_merge_replaces_arrays_and_scalars() {
        let mut base = json!({"tags": [1, 2, 3], "n": 10, "keep": true});
        deep_merge(&mut base, &json!({"tags": [4], "n": "s"}));
        assert_eq!(base, json!({"tags": [4], "n": "s", "keep": true}));
    }

    #[test]
    fn keys_present_on_one_side_pass_through() {
        let defaults = ConduitConfig::new()
            .base_url("https://api.example.com")
            .param("page", 1);
        let options = CallOptions::new()
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        let r = resolved(&defaults, options);
        assert_eq!(r.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(r.params.as_ref().and_then(|p| p.get("page")).map(|v| v.to_string()), Some("1".to_string()));
        assert_eq!(
            r.headers.as_ref().and_then(|h| h.get(ACCEPT)).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert!(r.body.is_none());
    }

    #[test]
    fn absent_on_both_sides_stays_absent() {
        let r = resolved(&ConduitConfig::new(), CallOptions::new());
        assert!(r.base_url.is_none());
        assert!(r.headers.is_none());
        assert!(r.params.is_none());
        assert!(r.body.is_none());
        assert_eq!(r.debug, DebugLevel::None);
    }

    #[test]
    fn overrides_win_per_key_and_keep_default_order() {
        let defaults = ConduitConfig::new()
            .param("page", 1)
            .param("limit", 20)
            .header(USER_AGENT, HeaderValue::from_static("conduit/1"))
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        let options = CallOptions::new()
            .param("page", 3)
            .param("active", true)
            .header(USER_AGENT, HeaderValue::from_static("override/2"));

        let r = resolved(&defaults, options);
        let params: Vec<(String, String)> = r
            .params
            .as_ref()
            .map(|p| p.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
            .unwrap_or_default();
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "3".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("active".to_string(), "true".to_string()),
            ]
        );
        let headers = r.headers.as_ref().expect("headers");
        assert_eq!(headers.get(USER_AGENT).and_then(|v| v.to_str().ok()), Some("override/2"));
        assert_eq!(
            headers.get(ACCEPT).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn bodies_deep_merge_with_call_options_beating_positional() {
        let defaults = ConduitConfig::new().body(json!({"meta": {"v": 1, "src": "default"}}));

        // positional body merges over the default
        let r = resolve(
            &defaults,
            CallOptions::new(),
            Method::POST,
            "/x".to_string(),
            Some(json!({"meta": {"src": "positional"}, "name": "a"})),
        );
        assert_eq!(
            r.body,
            Some(json!({"meta": {"v": 1, "src": "positional"}, "name": "a"}))
        );

        // options body wins over the positional one entirely
        let r = resolve(
            &defaults,
            CallOptions::new().body(json!({"meta": {"src": "options"}})),
            Method::POST,
            "/x".to_string(),
            Some(json!({"meta": {"src": "positional"}, "name": "a"})),
        );
        assert_eq!(r.body, Some(json!({"meta": {"v": 1, "src": "options"}})));
    }

    #[test]
    fn defaults_are_never_mutated() {
        let defaults = ConduitConfig::new()
            .param("page", 1)
            .body(json!({"a": {"x": 1}}));
        let snapshot = format!("{:?}", defaults);

        let _ = resolved(
            &defaults,
            CallOptions::new().param("page", 9).body(json!({"a": {"x": 2}})),
        );
        let _ = resolved(&defaults, CallOptions::new());

        assert_eq!(format!("{:?}", defaults), snapshot);
    }

    #[test]
    fn debug_override_wins() {
        let defaults = ConduitConfig::new().debug(DebugLevel::V);
        let r = resolved(&defaults, CallOptions::new());
        assert_eq!(r.debug, DebugLevel::V);
        let r = resolved(&defaults, CallOptions::new().debug(DebugLevel::VV));
        assert_eq!(r.debug, DebugLevel::VV);
    }
}
