//! Identity store: user creation, credential verification and token
//! issuance. Handlers and CLI commands both go through these operations
//! so passwords are hashed in exactly one place.

use chrono::Utc;
use model::credentials::{self, CredentialError};
use model::entities::{auth_token, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::auth::generate_token_key;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("a user with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Optional fields merged into a new user row.
#[derive(Debug, Default, Clone)]
pub struct NewUserExtra {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

fn is_unique_violation(db_error: &DbErr) -> bool {
    let message = db_error.to_string().to_lowercase();
    message.contains("unique") || message.contains("duplicate")
}

/// Create, save and return a new user.
/// Fails on an empty email; the email is domain-normalized and the
/// password hashed before anything is persisted.
#[instrument(skip(db, password, extra))]
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    extra: NewUserExtra,
) -> Result<user::Model, IdentityError> {
    let email = credentials::normalize_email(email)?;
    let password_hash = credentials::hash_password(password)?;

    let row = user::ActiveModel {
        email: Set(email),
        name: Set(extra.name.unwrap_or_default()),
        password_hash: Set(password_hash),
        is_active: Set(extra.is_active.unwrap_or(true)),
        is_staff: Set(extra.is_staff.unwrap_or(false)),
        is_superuser: Set(extra.is_superuser.unwrap_or(false)),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(created) => {
            info!("User created with ID: {}, email: {}", created.id, created.email);
            Ok(created)
        }
        Err(db_error) if is_unique_violation(&db_error) => {
            debug!("Rejected duplicate email: {}", db_error);
            Err(IdentityError::DuplicateEmail)
        }
        Err(db_error) => Err(IdentityError::Db(db_error)),
    }
}

/// Create and return a new superuser: a regular user with the staff and
/// superuser flags raised.
#[instrument(skip(db, password))]
pub async fn create_superuser(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model, IdentityError> {
    let created = create_user(db, email, password, NewUserExtra::default()).await?;

    let mut active = created.into_active_model();
    active.is_staff = Set(true);
    active.is_superuser = Set(true);
    let updated = active.update(db).await?;

    info!("User {} promoted to superuser", updated.id);
    Ok(updated)
}

/// Verify a credential pair.
/// Returns `Ok(None)` for an unknown email, a wrong password or an
/// inactive account; the caller cannot tell which part was wrong.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>, IdentityError> {
    let email = match credentials::normalize_email(email) {
        Ok(email) => email,
        Err(_) => return Ok(None),
    };

    let Some(found) = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?
    else {
        debug!("Authentication attempt for unknown email");
        return Ok(None);
    };

    if !found.is_active || !credentials::verify_password(password, &found.password_hash) {
        debug!("Authentication failed for user {}", found.id);
        return Ok(None);
    }

    Ok(Some(found))
}

/// Apply a partial profile update. A new password goes through the hash
/// helper, never the generic field path.
#[instrument(skip(db, subject, password))]
pub async fn update_profile(
    db: &DatabaseConnection,
    subject: user::Model,
    name: Option<String>,
    password: Option<&str>,
) -> Result<user::Model, IdentityError> {
    if name.is_none() && password.is_none() {
        return Ok(subject);
    }

    let mut active = subject.into_active_model();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(password) = password {
        active.password_hash = Set(credentials::hash_password(password)?);
    }

    Ok(active.update(db).await?)
}

/// Issue a fresh opaque token for the user, superseding any existing one,
/// and stamp the login time.
#[instrument(skip(db, subject))]
pub async fn issue_token(
    db: &DatabaseConnection,
    subject: &user::Model,
) -> Result<String, IdentityError> {
    auth_token::Entity::delete_many()
        .filter(auth_token::Column::UserId.eq(subject.id))
        .exec(db)
        .await?;

    let key = generate_token_key();
    auth_token::ActiveModel {
        user_id: Set(subject.id),
        key: Set(key.clone()),
        created: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut active = subject.clone().into_active_model();
    active.last_login = Set(Some(Utc::now()));
    active.update(db).await?;

    info!("Issued token for user {}", subject.id);
    Ok(key)
}
