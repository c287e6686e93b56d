use super::user;
use sea_orm::entity::prelude::*;

/// Represents a contact record submitted by a user.
/// Leads are immutable once created; the only mutation the API exposes
/// is deletion by the owner.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user who owns this lead. Always the authenticated creator.
    pub owner_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// International phone number, validated before insertion.
    pub phone: String,
    /// Address the lead was submitted from, when known. Not exposed by
    /// the API serialization.
    pub ip: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A lead belongs to exactly one owner.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
