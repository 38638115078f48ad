use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

/// Access tokens authorize requests; refresh tokens only mint new
/// pairs. The kind is baked into the claims so one cannot stand in
/// for the other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// What a forkful JWT carries. `sub` is the user id every ownership
/// and like/save check keys on.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

/// Extracts and validates JWT, returning the user ID.
pub struct AuthUser(pub Uuid);

/// Like [`AuthUser`] but tolerant: yields `None` for anonymous or
/// invalid credentials instead of rejecting the request. Used where a
/// response merely personalizes for a known caller (the `liked` flag).
pub struct MaybeAuthUser(pub Option<Uuid>);

fn decode_bearer(parts: &Parts, state: &AppState) -> Option<Uuid> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let token = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))?;

    let cfg = &state.config.jwt;
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    validation.set_issuer(std::slice::from_ref(&cfg.issuer));
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());

    let data = decode::<Claims>(token, &decoding, &validation).ok()?;
    if data.claims.kind != TokenKind::Access {
        return None;
    }
    Some(data.claims.sub)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        decode_bearer(parts, state)
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "invalid or missing token".into()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(decode_bearer(parts, state)))
    }
}
