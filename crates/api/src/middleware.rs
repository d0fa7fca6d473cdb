//! HTTP Basic authentication middleware.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::Engine;

use simplebank_auth::{Principal, verify_password};
use simplebank_ledger::UserDirectory;

#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserDirectory>,
}

/// Resolve Basic credentials to a [`Principal`] request extension.
///
/// Rejects with 401 before any handler runs; never logs the credential.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let (username, password) = extract_basic(req.headers())?;

    let user = state.users.find_by_username(&username).ok_or_else(|| {
        tracing::warn!(username, "authentication failed: unknown user");
        StatusCode::UNAUTHORIZED
    })?;

    let verified = verify_password(&password, &user.password_hash)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if !verified {
        tracing::warn!(username, "authentication failed: bad password");
        return Err(StatusCode::UNAUTHORIZED);
    }

    req.extensions_mut()
        .insert(Principal::new(user.id, user.username, user.roles));

    Ok(next.run(req).await)
}

fn extract_basic(headers: &HeaderMap) -> Result<(String, String), StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(StatusCode::UNAUTHORIZED)?
        .trim();

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let decoded = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let (username, password) = decoded.split_once(':').ok_or(StatusCode::UNAUTHORIZED)?;
    if username.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    fn basic(username: &str, password: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        format!("Basic {encoded}")
    }

    #[test]
    fn well_formed_header_yields_credentials() {
        let headers = headers_with(&basic("anna", "Anna123"));
        let (username, password) = extract_basic(&headers).unwrap();
        assert_eq!(username, "anna");
        assert_eq!(password, "Anna123");
    }

    #[test]
    fn password_may_contain_colons() {
        let headers = headers_with(&basic("anna", "a:b:c"));
        let (_, password) = extract_basic(&headers).unwrap();
        assert_eq!(password, "a:b:c");
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        assert_eq!(extract_basic(&HeaderMap::new()), Err(StatusCode::UNAUTHORIZED));
        assert_eq!(
            extract_basic(&headers_with("Bearer token")),
            Err(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            extract_basic(&headers_with("Basic not-base64!")),
            Err(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            extract_basic(&headers_with("Basic ")),
            Err(StatusCode::UNAUTHORIZED)
        );
    }
}
