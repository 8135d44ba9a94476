// src/utils/jwt.rs

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

/// The subset of upstream token claims the dashboard cares about.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Expiration time as Unix timestamp.
    pub exp: i64,
}

/// The bearer token of the active session, injected by `session_middleware`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Reads the `exp` claim of a token issued by the upstream API.
///
/// The signing key belongs to the upstream, so the signature is not checked.
/// The token is only inspected to avoid sending requests that are bound to
/// fail.
pub fn token_expiry(token: &str) -> Result<DateTime<Utc>, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    DateTime::from_timestamp(data.claims.exp, 0)
        .ok_or_else(|| AppError::AuthError("Invalid token expiry".to_string()))
}

/// Undecodable tokens count as expired.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Ok(expires_at) => expires_at <= now,
        Err(_) => true,
    }
}

/// Axum Middleware: Session guard.
///
/// Rejects the request with 401 unless a live session exists.
/// On success injects the session's `BearerToken` into the request extensions.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = state.session.bearer().await?;
    req.extensions_mut().insert(BearerToken(token));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_with_exp(exp: i64) -> String {
        encode(
            &Header::default(),
            &Claims { exp },
            &EncodingKey::from_secret(b"upstream-secret"),
        )
        .unwrap()
    }

    #[test]
    fn reads_expiry_without_the_signing_key() {
        let exp = Utc::now().timestamp() + 3600;
        let expires_at = token_expiry(&token_with_exp(exp)).unwrap();
        assert_eq!(expires_at.timestamp(), exp);
    }

    #[test]
    fn expired_and_garbage_tokens_are_expired() {
        let now = Utc::now();
        let past = token_with_exp((now - TimeDelta::minutes(5)).timestamp());
        let future = token_with_exp((now + TimeDelta::minutes(5)).timestamp());

        assert!(is_token_expired(&past, now));
        assert!(!is_token_expired(&future, now));
        assert!(is_token_expired("not-a-jwt", now));
    }
}
