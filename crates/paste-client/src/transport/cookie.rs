//! Extraction of a named cookie from `Set-Cookie` response headers.

use hyper::header::{HeaderMap, SET_COOKIE};

/// Return the value of cookie `name` set by `headers`, if any.
///
/// Only the leading `name=value` pair of each `Set-Cookie` header is
/// considered; attributes such as `Path` or `SameSite` are ignored. A quoted
/// value is unquoted. When the cookie is set more than once the last value
/// wins.
pub fn find_set_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| parse_pair(v, name))
        .last()
}

fn parse_pair(header: &str, name: &str) -> Option<String> {
    let pair = header.split(';').next()?;
    let (k, v) = pair.split_once('=')?;
    if k.trim() != name {
        return None;
    }
    let v = v.trim();
    let v = v
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(v);
    Some(v.to_owned())
}
