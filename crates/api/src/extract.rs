//! Viewer-identity extractors.
//!
//! Session resolution is owned by the fronting layer (reverse proxy or BFF),
//! which authenticates the browser session and forwards the resolved user id
//! in the `x-user-id` header. These extractors only read that header; no
//! credential handling happens in this service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use promptly_core::error::CoreError;
use promptly_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the authenticated user's id, set by the fronting layer.
const USER_ID_HEADER: &str = "x-user-id";

/// The viewer's user id, when a session is present.
///
/// Anonymous requests resolve to `CurrentUser(None)` so read endpoints can
/// render logged-out views without special-casing.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Option<DbId>);

/// The viewer's user id; rejects the request with 401 when absent.
///
/// Use this on any handler that writes on behalf of the viewer.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub DbId);

fn parse_user_header(parts: &Parts) -> Result<Option<DbId>, AppError> {
    let Some(value) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AppError::BadRequest(format!("Invalid {USER_ID_HEADER} header")))?;
    let user_id: DbId = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {USER_ID_HEADER} header")))?;
    Ok(Some(user_id))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parse_user_header(parts)?))
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parse_user_header(parts)? {
            Some(user_id) => Ok(RequireUser(user_id)),
            None => Err(AppError::Core(CoreError::Unauthorized(
                "Authentication required".into(),
            ))),
        }
    }
}
