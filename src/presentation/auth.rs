// Token authentication handlers and middleware
use crate::application::error::ServiceError;
use crate::domain::user::AuthToken;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(alias = "username", default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub email: String,
}

impl From<AuthToken> for TokenResponse {
    fn from(token: AuthToken) -> Self {
        Self {
            token: token.key,
            email: token.email,
        }
    }
}

/// Email of the caller, set by `require_auth`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Accepts `Token <key>` and `Bearer <key>`
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(key)
    } else {
        None
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, ServiceError> {
    let token = state
        .auth_service
        .register(&credentials.email, &credentials.password)
        .await?;
    Ok((StatusCode::CREATED, Json(TokenResponse::from(token))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, ServiceError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ServiceError::MissingCredentials);
    }
    let token = state
        .auth_service
        .login(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(token.into()))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ServiceError> {
    let key = token_from_headers(&headers).ok_or(ServiceError::Unauthorized)?;
    state.auth_service.logout(key).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.auth_required {
        return next.run(request).await;
    }

    let Some(key) = token_from_headers(request.headers()).map(str::to_string) else {
        return ServiceError::Unauthorized.into_response();
    };

    match state.auth_service.authenticate(&key).await {
        Ok(email) => {
            request.extensions_mut().insert(AuthenticatedUser(email));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_token_schemes() {
        assert_eq!(token_from_headers(&headers("Token abc123")), Some("abc123"));
        assert_eq!(token_from_headers(&headers("Bearer abc123")), Some("abc123"));
        assert_eq!(token_from_headers(&headers("bearer  abc123 ")), Some("abc123"));
        assert_eq!(token_from_headers(&headers("Basic abc123")), None);
        assert_eq!(token_from_headers(&headers("Token")), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
