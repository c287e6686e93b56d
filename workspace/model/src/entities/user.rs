use sea_orm::entity::prelude::*;

/// Represents a user of the system.
/// The email address doubles as the login identifier; there is no
/// separate username.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// Argon2 PHC string. Plaintext passwords are never persisted.
    pub password_hash: String,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
    /// Stamped on every successful token exchange.
    pub last_login: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user can own multiple leads.
    #[sea_orm(has_many = "super::lead::Entity")]
    Lead,
    // At most one live token per user.
    #[sea_orm(has_one = "super::auth_token::Entity")]
    AuthToken,
}

impl ActiveModelBehavior for ActiveModel {}
