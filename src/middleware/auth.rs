use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub const ADMIN_ROLE: &str = "admin";
pub const TABLE_SESSION_HEADER: &str = "x-table-session";

const ADMIN_SESSION_HOURS: i64 = 12;
const TABLE_SESSION_HOURS: i64 = 24;

#[derive(Debug, Deserialize, Serialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TableClaims {
    pub table_id: i32,
    pub exp: usize,
}

/// Proof that the request carries a valid admin session token.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub subject: String,
}

/// Table selected by the customer when scanning the QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSession {
    pub table_id: i32,
}

pub fn issue_admin_token(secret: &str) -> AppResult<String> {
    let claims = AdminClaims {
        sub: ADMIN_ROLE.to_string(),
        role: ADMIN_ROLE.to_string(),
        exp: expiry(ADMIN_SESSION_HOURS)?,
    };
    sign(&claims, secret)
}

pub fn issue_table_token(secret: &str, table_id: i32) -> AppResult<String> {
    let claims = TableClaims {
        table_id,
        exp: expiry(TABLE_SESSION_HOURS)?,
    };
    sign(&claims, secret)
}

fn expiry(hours: i64) -> AppResult<usize> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;
    Ok(expiration.timestamp() as usize)
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Decode the table session token from the request headers, if one is present and valid.
pub fn table_session_from_headers(headers: &HeaderMap, secret: &str) -> Option<TableSession> {
    let token = headers.get(TABLE_SESSION_HEADER)?.to_str().ok()?.trim();
    let decoded = decode::<TableClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    Some(TableSession {
        table_id: decoded.claims.table_id,
    })
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_str = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?
            .trim();

        let decoded = decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(state.config.session_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        if decoded.claims.role != ADMIN_ROLE {
            return Err(AppError::Unauthorized);
        }

        Ok(AdminSession {
            subject: decoded.claims.sub,
        })
    }
}

impl OptionalFromRequestParts<AppState> for TableSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(table_session_from_headers(
            &parts.headers,
            &state.config.session_secret,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn table_token_round_trips_through_header() {
        let token = issue_table_token("secret", 7).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(TABLE_SESSION_HEADER, HeaderValue::from_str(&token).unwrap());

        assert_eq!(
            table_session_from_headers(&headers, "secret"),
            Some(TableSession { table_id: 7 })
        );
        assert_eq!(table_session_from_headers(&headers, "other-secret"), None);
    }

    #[test]
    fn missing_table_header_yields_no_session() {
        assert_eq!(table_session_from_headers(&HeaderMap::new(), "secret"), None);
    }
}
