//! Request authentication.
//!
//! CloudVault sits behind an auth gateway that verifies credentials and
//! forwards the caller's identity in the `x-user-id` header. The core
//! treats that identity as opaque; every handler receives it through the
//! [`AuthUser`] extractor and passes it down as the acting user.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::web::error::ApiError;

/// Header carrying the authenticated user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated user.
///
/// Use this extractor to require authentication for a handler. Rejects
/// with 401 when the header is missing or malformed.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get(USER_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<i64>().ok())
                .filter(|id| *id > 0)
                .ok_or_else(|| ApiError::unauthorized("Missing authentication"))?;

            Ok(AuthUser(user_id))
        })
    }
}
