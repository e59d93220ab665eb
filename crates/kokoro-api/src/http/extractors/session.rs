//! Cookie-keyed chat sessions.
//!
//! [`assign_session`] runs on every request: it reads the `kokoro_session`
//! cookie, accepts it only when its signature verifies, and otherwise mints a
//! fresh key and sets a newly signed cookie on the response. The
//! [`SessionKey`] is stored in request extensions; handlers take [`Session`]
//! to read it back.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use kokoro_types::chat::SessionKey;
use kokoro_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "kokoro_session";

/// Session key for the current request.
#[derive(Debug, Clone)]
pub struct Session(pub SessionKey);

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionKey>()
            .cloned()
            .map(Session)
            .ok_or(AppError::Chat(ChatError::SessionUnavailable))
    }
}

/// Middleware attaching a session key to every request.
pub async fn assign_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = session_cookie_value(request.headers())
        .and_then(|value| state.session_signer.verify(value));
    let (key, is_new) = match existing {
        Some(key) => (key, false),
        None => (SessionKey::new(Uuid::now_v7().to_string()), true),
    };
    request.extensions_mut().insert(key.clone());

    let mut response = next.run(request).await;

    if is_new {
        let value = state.session_signer.sign(&key);
        let cookie = session_cookie(&value, state.config.server.production);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "could not encode session cookie"),
        }
    }
    response
}

/// Raw `kokoro_session` value from the `Cookie` headers, if present.
fn session_cookie_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn session_cookie(value: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        map
    }

    #[test]
    fn test_reads_session_among_other_cookies() {
        let h = headers("theme=dark; kokoro_session=abc.sig; lang=ja");
        let value = session_cookie_value(&h);
        assert_eq!(value, Some("abc.sig"));
    }

    #[test]
    fn test_missing_or_empty_cookie_is_ignored() {
        assert!(session_cookie_value(&HeaderMap::new()).is_none());
        assert!(session_cookie_value(&headers("theme=dark")).is_none());
        assert!(session_cookie_value(&headers("kokoro_session=")).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let dev = session_cookie("abc.sig", false);
        assert_eq!(dev, "kokoro_session=abc.sig; Path=/; HttpOnly; SameSite=Lax");
        let prod = session_cookie("abc.sig", true);
        assert!(prod.ends_with("; Secure"));
    }

    #[tokio::test]
    async fn test_extractor_reads_extension() {
        let mut parts = Request::builder().body(()).unwrap().into_parts().0;
        parts.extensions.insert(SessionKey::new("abc"));
        let Session(key) = Session::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(key.as_str(), "abc");
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_is_session_unavailable() {
        let mut parts = Request::builder().body(()).unwrap().into_parts().0;
        let err = Session::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Chat(ChatError::SessionUnavailable)));
    }
}
