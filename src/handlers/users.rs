use crate::auth::CurrentUser;
use crate::identity::{self, IdentityError, NewUserExtra};
use crate::schemas::{AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Passwords shorter than this are rejected at registration and on
/// profile updates.
const MIN_PASSWORD_LEN: usize = 5;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Email address (must be unique; doubles as the login identifier)
    pub email: String,
    /// Password, minimum 5 characters
    pub password: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for the token exchange
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTokenRequest {
    pub email: String,
    pub password: String,
}

/// Request body for partial profile updates
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// User representation returned at registration. Never carries the
/// password in any form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
        }
    }
}

/// Opaque token returned by the exchange endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Profile of the authenticated caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
}

impl From<user::Model> for ProfileResponse {
    fn from(model: user::Model) -> Self {
        Self {
            name: model.name,
            email: model.email,
        }
    }
}

/// Minimal shape check: a non-empty local part and a dotted domain.
/// Uniqueness and normalization happen in the identity store.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn validation_error(field: &str, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::field(field, message)),
    )
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/user/",
    tag = "user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating user with email: {}", request.email);

    if request.email.trim().is_empty() {
        return Err(validation_error("email", "This field may not be blank."));
    }
    if !is_valid_email(&request.email) {
        return Err(validation_error("email", "Enter a valid email address."));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(validation_error(
            "password",
            "Ensure this field has at least 5 characters.",
        ));
    }

    let extra = NewUserExtra {
        name: request.name.clone(),
        ..Default::default()
    };

    match identity::create_user(&state.db, &request.email, &request.password, extra).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(UserResponse::from(created)))),
        Err(IdentityError::DuplicateEmail) => {
            warn!("Registration with already used email rejected");
            Err(validation_error(
                "email",
                "A user with this email already exists.",
            ))
        }
        Err(IdentityError::Credential(credential_error)) => {
            debug!("Credential validation failed: {}", credential_error);
            Err(validation_error("email", &credential_error.to_string()))
        }
        Err(db_error) => {
            error!("Failed to create user: {}", db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Internal server error while creating user",
                    "DATABASE_ERROR",
                )),
            ))
        }
    }
}

/// Exchange an email/password pair for an opaque token
#[utoipa::path(
    post,
    path = "/api/user/token/",
    tag = "user",
    request_body = CreateTokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Bad credentials; the body never contains a token field", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_token(
    State(state): State<AppState>,
    Json(request): Json<CreateTokenRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.password.is_empty() {
        return Err(validation_error("password", "This field may not be blank."));
    }

    let authenticated =
        match identity::authenticate(&state.db, &request.email, &request.password).await {
            Ok(authenticated) => authenticated,
            Err(db_error) => {
                error!("Failed to authenticate: {}", db_error);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(
                        "Internal server error while authenticating",
                        "DATABASE_ERROR",
                    )),
                ));
            }
        };

    // Deliberately the same response body whichever half of the pair was
    // wrong.
    let Some(subject) = authenticated else {
        warn!("Token exchange with bad credentials");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "Unable to authenticate with provided credentials.",
                "AUTHORIZATION",
            )),
        ));
    };

    match identity::issue_token(&state.db, &subject).await {
        Ok(key) => {
            info!("Token issued for user {}", subject.id);
            Ok(Json(TokenResponse { token: key }))
        }
        Err(db_error) => {
            error!("Failed to issue token for user {}: {}", subject.id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Internal server error while issuing token",
                    "DATABASE_ERROR",
                )),
            ))
        }
    }
}

/// Return the authenticated caller's profile
#[utoipa::path(
    get,
    path = "/api/user/me/",
    tag = "user",
    responses(
        (status = 200, description = "Profile of the caller", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip_all)]
pub async fn me(CurrentUser(subject): CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(subject))
}

/// Partially update the authenticated caller's name and/or password
#[utoipa::path(
    patch,
    path = "/api/user/me/",
    tag = "user",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip_all)]
pub async fn update_me(
    CurrentUser(subject): CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<UpdateMeRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Some(password) = &request.password {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(validation_error(
                "password",
                "Ensure this field has at least 5 characters.",
            ));
        }
    }

    let subject_id = subject.id;
    match identity::update_profile(
        &state.db,
        subject,
        request.name.clone(),
        request.password.as_deref(),
    )
    .await
    {
        Ok(updated) => {
            info!("Profile updated for user {}", subject_id);
            Ok(Json(ProfileResponse::from(updated)))
        }
        Err(db_error) => {
            error!("Failed to update profile for user {}: {}", subject_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Internal server error while updating profile",
                    "DATABASE_ERROR",
                )),
            ))
        }
    }
}
