use crate::error::ConduitError;
use crate::types::ParamMap;
use url::Url;

/// Resolve the absolute endpoint for a call and append its query string.
///
/// An absolute `path` wins outright and the base is ignored; a relative
/// `path` is joined onto the base with standard URL-resolution rules. A
/// relative path with no base, or any combination that does not parse into
/// an absolute URL, is a `MalformedUrl` failure.
pub(crate) fn build_endpoint(
    base: Option<&str>,
    path: &str,
    params: Option<&ParamMap>,
) -> Result<Url, ConduitError> {
    let mut url = resolve_url(base, path)?;
    if let Some(params) = params {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params.iter() {
            pairs.append_pair(key, &value.to_string());
        }
    }
    Ok(url)
}

fn resolve_url(base: Option<&str>, path: &str) -> Result<Url, ConduitError> {
    let malformed = |source| ConduitError::MalformedUrl {
        base: base.map(str::to_owned),
        path: path.to_owned(),
        source,
    };
    match Url::parse(path) {
        Ok(absolute) => Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(b) => Url::parse(b).and_then(|b| b.join(path)).map_err(malformed),
            None => Err(malformed(url::ParseError::RelativeUrlWithoutBase)),
        },
        Err(e) => Err(malformed(e)),
    }
}
