//! Credential extraction from request headers.
//!
//! Locations consulted, in order: the session cookie, then the
//! `Authorization: Bearer <token>` header. No side effects; an absent
//! credential is `None`, never an error — callers decide whether that is
//! fatal.

use http::{header, HeaderMap};

/// Cookie field carrying the session token.
pub const SESSION_COOKIE: &str = "agora_session";

/// An unverified bearer credential as found on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn extract_credential(headers: &HeaderMap) -> Option<Credential> {
    if let Some(token) = session_cookie(headers) {
        return Some(Credential(token));
    }
    bearer_token(headers).map(Credential)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let Some((name, token)) = pair.trim().split_once('=') else {
                continue;
            };
            if name == SESSION_COOKIE && !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    None
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn absent_credential_is_none() {
        assert_eq!(extract_credential(&HeaderMap::new()), None);
    }

    #[test]
    fn reads_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(
            extract_credential(&headers).unwrap().as_str(),
            "abc"
        );
    }

    #[test]
    fn reads_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; agora_session=tok123; lang=en"),
        );
        assert_eq!(
            extract_credential(&headers).unwrap().as_str(),
            "tok123"
        );
    }

    #[test]
    fn cookie_takes_precedence_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("agora_session=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(
            extract_credential(&headers).unwrap().as_str(),
            "from-cookie"
        );
    }

    #[test]
    fn malformed_authorization_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_credential(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_credential(&headers), None);
    }

    #[test]
    fn empty_cookie_value_falls_back_to_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("agora_session="),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer fallback"),
        );
        assert_eq!(
            extract_credential(&headers).unwrap().as_str(),
            "fallback"
        );
    }
}
