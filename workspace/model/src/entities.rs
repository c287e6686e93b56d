//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the lead management API here:
//! users identified by email, their opaque auth tokens, and the
//! leads each user owns.

pub mod auth_token;
pub mod lead;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::auth_token::Entity as AuthToken;
    pub use super::lead::Entity as Lead;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Apply migrations
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, email: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            email: Set(email.to_string()),
            name: Set("Test Name".to_string()),
            password_hash: Set("not-a-real-hash".to_string()),
            is_active: Set(true),
            is_staff: Set(false),
            is_superuser: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn insert_lead(db: &DatabaseConnection, owner_id: i32) -> Result<lead::Model, DbErr> {
        lead::ActiveModel {
            owner_id: Set(owner_id),
            first_name: Set("John".to_string()),
            last_name: Set("Doe".to_string()),
            email: Set("leadtest@example.com".to_string()),
            phone: Set("+972541096752".to_string()),
            ip: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user1 = insert_user(&db, "user1@example.com").await?;
        let user2 = insert_user(&db, "user2@example.com").await?;

        let lead1 = insert_lead(&db, user1.id).await?;
        let _lead2 = insert_lead(&db, user1.id).await?;
        let _lead3 = insert_lead(&db, user2.id).await?;

        let token1 = auth_token::ActiveModel {
            user_id: Set(user1.id),
            key: Set("a".repeat(40)),
            created: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);

        let user1_leads = Lead::find()
            .filter(lead::Column::OwnerId.eq(user1.id))
            .all(&db)
            .await?;
        assert_eq!(user1_leads.len(), 2);

        let token_owner = token1.find_related(User).one(&db).await?.unwrap();
        assert_eq!(token_owner.id, user1.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_email_uniqueness() -> Result<(), DbErr> {
        let db = setup_db().await?;

        insert_user(&db, "same@example.com").await?;
        let duplicate = insert_user(&db, "same@example.com").await;
        assert!(duplicate.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user1 = insert_user(&db, "user1@example.com").await?;
        let user2 = insert_user(&db, "user2@example.com").await?;

        insert_lead(&db, user1.id).await?;
        let kept = insert_lead(&db, user2.id).await?;

        auth_token::ActiveModel {
            user_id: Set(user1.id),
            key: Set("b".repeat(40)),
            created: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        user1.delete(&db).await?;

        // Owned rows go with the user, other users' rows stay.
        let leads = Lead::find().all(&db).await?;
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, kept.id);

        let tokens = AuthToken::find().all(&db).await?;
        assert!(tokens.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_token_key_uniqueness() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user1 = insert_user(&db, "user1@example.com").await?;
        let user2 = insert_user(&db, "user2@example.com").await?;

        auth_token::ActiveModel {
            user_id: Set(user1.id),
            key: Set("c".repeat(40)),
            created: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let clash = auth_token::ActiveModel {
            user_id: Set(user2.id),
            key: Set("c".repeat(40)),
            created: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(clash.is_err());

        Ok(())
    }
}
