//! Query string building for GET requests.

use crate::base::neterror::NetError;
use crate::http::params::Params;
use url::Url;

/// Percent-encode `params` as `k=v&k=v`.
///
/// Keys and values are encoded with RFC 3986 unreserved characters kept, so a
/// space becomes `%20`.
pub fn encode_pairs(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k),
                urlencoding::encode(&v.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append `params` to the query of `url`.
///
/// Pairs follow `?` when the URL has no query and `&` when it has one; an
/// empty query or one already ending in `&` gets no extra separator. Any
/// fragment stays at the end.
pub fn append_query(url: &str, params: &Params) -> Result<Url, NetError> {
    let mut url = Url::parse(url).map_err(|_| NetError::InvalidUrl)?;
    if params.is_empty() {
        return Ok(url);
    }

    let pairs = encode_pairs(params);
    let query = match url.query() {
        Some(existing) if !existing.is_empty() && !existing.ends_with('&') => {
            format!("{existing}&{pairs}")
        }
        Some(existing) => format!("{existing}{pairs}"),
        None => pairs,
    };
    url.set_query(Some(&query));
    Ok(url)
}
