use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::Json,
};
use model::entities::{auth_token, user};
use rand::RngCore;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::{debug, error, warn};

use crate::schemas::{AppState, ErrorResponse};

/// Authorization header scheme, e.g. `Authorization: Token 9944b09...`
const TOKEN_SCHEME: &str = "Token ";

/// The authenticated caller, resolved from the opaque token key.
/// Extracting this in a handler signature is what makes a route private:
/// requests without a valid key are rejected with 401 before the handler
/// body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

pub type AuthRejection = (StatusCode, Json<ErrorResponse>);

fn unauthorized(message: &str) -> AuthRejection {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(message, "NOT_AUTHENTICATED")),
    )
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                debug!("Request without Authorization header");
                unauthorized("Authentication credentials were not provided")
            })?;

        let key = header
            .strip_prefix(TOKEN_SCHEME)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                debug!("Malformed Authorization header");
                unauthorized("Invalid authorization header")
            })?;

        let token = auth_token::Entity::find()
            .filter(auth_token::Column::Key.eq(key))
            .one(&state.db)
            .await
            .map_err(|db_error| {
                error!("Failed to look up auth token: {}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(
                        "Internal server error while authenticating",
                        "DATABASE_ERROR",
                    )),
                )
            })?
            .ok_or_else(|| {
                warn!("Request with unknown token key");
                unauthorized("Invalid token")
            })?;

        let user = user::Entity::find_by_id(token.user_id)
            .one(&state.db)
            .await
            .map_err(|db_error| {
                error!(
                    "Failed to load user {} for token: {}",
                    token.user_id, db_error
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(
                        "Internal server error while authenticating",
                        "DATABASE_ERROR",
                    )),
                )
            })?
            .ok_or_else(|| unauthorized("Invalid token"))?;

        if !user.is_active {
            warn!("Inactive user {} presented a valid token", user.id);
            return Err(unauthorized("User inactive or deleted"));
        }

        debug!("Authenticated user {} via token", user.id);
        Ok(CurrentUser(user))
    }
}

/// Generate an opaque token key: 20 random bytes, hex-encoded to 40
/// characters.
pub fn generate_token_key() -> String {
    let mut buf = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut buf);
    buf.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_key_shape() {
        let key = generate_token_key();
        assert_eq!(key.len(), 40);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_keys_are_unique() {
        assert_ne!(generate_token_key(), generate_token_key());
    }
}
