//! Property models and ownership-scoped queries.
//!
//! Every query here is scoped by the owning user id. A property that exists
//! but belongs to another user is indistinguishable from a missing one, so
//! cross-tenant probing leaks nothing.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::appliance::Appliance;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: String,
    pub address: String,
    pub property_type: Option<String>,
    pub monthly_rent: Option<f64>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    pub address: String,
    pub property_type: Option<String>,
    pub monthly_rent: Option<f64>,
}

/// Update replaces the full mutable column set; `user_id` is immutable and
/// not part of the payload
#[derive(Debug, Deserialize)]
pub struct UpdatePropertyRequest {
    pub address: String,
    pub property_type: Option<String>,
    pub monthly_rent: Option<f64>,
}

/// Property with its appliances for the detail view
#[derive(Debug, Clone, Serialize)]
pub struct PropertyWithAppliances {
    #[serde(flatten)]
    pub property: Property,
    pub appliances: Vec<Appliance>,
}

impl Property {
    pub async fn create(
        db: &SqlitePool,
        owner_id: &str,
        req: &CreatePropertyRequest,
    ) -> Result<Property, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO properties (id, address, property_type, monthly_rent, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(req.address.trim())
        .bind(&req.property_type)
        .bind(req.monthly_rent)
        .bind(owner_id)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?;

        sqlx::query_as("SELECT * FROM properties WHERE id = ?")
            .bind(&id)
            .fetch_one(db)
            .await
    }

    pub async fn get_for_owner(
        db: &SqlitePool,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM properties WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_for_owner(
        db: &SqlitePool,
        owner_id: &str,
    ) -> Result<Vec<Property>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM properties WHERE user_id = ? ORDER BY created_at DESC")
            .bind(owner_id)
            .fetch_all(db)
            .await
    }

    /// Atomic conditional update: the ownership check is part of the UPDATE
    /// itself, so there is no window between check and mutation. Returns
    /// None when the row is absent or owned by someone else.
    pub async fn update(
        db: &SqlitePool,
        id: &str,
        owner_id: &str,
        req: &UpdatePropertyRequest,
    ) -> Result<Option<Property>, sqlx::Error> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE properties
            SET address = ?, property_type = ?, monthly_rent = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(req.address.trim())
        .bind(&req.property_type)
        .bind(req.monthly_rent)
        .bind(&now)
        .bind(id)
        .bind(owner_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get_for_owner(db, id, owner_id).await
    }

    /// Hard delete; appliances and rent payments go with it via the
    /// ON DELETE CASCADE foreign keys
    pub async fn delete(db: &SqlitePool, id: &str, owner_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::db::User;

    async fn owner(db: &SqlitePool, email: &str) -> String {
        User::create(db, email, "hash", "Owner").await.unwrap().id
    }

    fn request(address: &str) -> CreatePropertyRequest {
        CreatePropertyRequest {
            address: address.to_string(),
            property_type: Some("apartment".to_string()),
            monthly_rent: Some(1200.0),
        }
    }

    #[tokio::test]
    async fn test_create_roundtrip() {
        let db = test_pool().await;
        let owner_id = owner(&db, "a@example.com").await;

        let created = Property::create(&db, &owner_id, &request("  12 Elm St  "))
            .await
            .unwrap();
        assert_eq!(created.address, "12 Elm St");
        assert_eq!(created.monthly_rent, Some(1200.0));
        assert_eq!(created.user_id, owner_id);

        let fetched = Property::get_for_owner(&db, &created.id, &owner_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.address, created.address);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_ownership_isolation() {
        let db = test_pool().await;
        let alice = owner(&db, "alice@example.com").await;
        let bob = owner(&db, "bob@example.com").await;

        let prop = Property::create(&db, &alice, &request("1 Main St"))
            .await
            .unwrap();

        // Bob sees nothing, can change nothing
        assert!(Property::get_for_owner(&db, &prop.id, &bob)
            .await
            .unwrap()
            .is_none());
        let update = UpdatePropertyRequest {
            address: "Hijacked".to_string(),
            property_type: None,
            monthly_rent: None,
        };
        assert!(Property::update(&db, &prop.id, &bob, &update)
            .await
            .unwrap()
            .is_none());
        assert!(!Property::delete(&db, &prop.id, &bob).await.unwrap());

        // Alice's row is untouched
        let still = Property::get_for_owner(&db, &prop.id, &alice)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(still.address, "1 Main St");
    }

    #[tokio::test]
    async fn test_two_creates_are_distinct_rows() {
        let db = test_pool().await;
        let owner_id = owner(&db, "c@example.com").await;

        let first = Property::create(&db, &owner_id, &request("1 First St"))
            .await
            .unwrap();
        let second = Property::create(&db, &owner_id, &request("2 Second St"))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);

        let listed = Property::list_for_owner(&db, &owner_id).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_mutable_set() {
        let db = test_pool().await;
        let owner_id = owner(&db, "d@example.com").await;
        let prop = Property::create(&db, &owner_id, &request("3 Oak Ave"))
            .await
            .unwrap();

        let update = UpdatePropertyRequest {
            address: "3 Oak Avenue".to_string(),
            property_type: None,
            monthly_rent: None,
        };
        let updated = Property::update(&db, &prop.id, &owner_id, &update)
            .await
            .unwrap()
            .unwrap();

        // Optionals are written as sent, not patched around
        assert_eq!(updated.address, "3 Oak Avenue");
        assert_eq!(updated.property_type, None);
        assert_eq!(updated.monthly_rent, None);
        assert_eq!(updated.user_id, owner_id);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_children() {
        let db = test_pool().await;
        let owner_id = owner(&db, "e@example.com").await;
        let prop = Property::create(&db, &owner_id, &request("4 Pine Rd"))
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO appliances (id, property_id, name, status, created_at, updated_at)
             VALUES ('ap1', ?, 'Boiler', 'working', '2024-01-01', '2024-01-01')",
        )
        .bind(&prop.id)
        .execute(&db)
        .await
        .unwrap();

        assert!(Property::delete(&db, &prop.id, &owner_id).await.unwrap());

        let orphans: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM appliances WHERE property_id = ?")
                .bind(&prop.id)
                .fetch_one(&db)
                .await
                .unwrap();
        assert_eq!(orphans.0, 0);
    }
}
