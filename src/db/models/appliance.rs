//! Appliance models and queries.
//!
//! Appliances inherit ownership from their parent property, so every query
//! joins through `properties` on the authenticated user id.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

pub const DEFAULT_APPLIANCE_STATUS: &str = "working";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appliance {
    pub id: String,
    pub property_id: String,
    pub name: String,
    pub appliance_type: Option<String>,
    pub installation_date: Option<String>,
    pub last_maintenance: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateApplianceRequest {
    pub property_id: String,
    pub name: String,
    pub appliance_type: Option<String>,
    pub installation_date: Option<String>,
    pub last_maintenance: Option<String>,
    /// Defaults to "working" when omitted on create; never defaulted again
    /// on update
    pub status: Option<String>,
}

/// Update replaces the full mutable column set. `status` is required here:
/// callers resend the current value or an explicit new one.
#[derive(Debug, Deserialize)]
pub struct UpdateApplianceRequest {
    pub name: String,
    pub appliance_type: Option<String>,
    pub installation_date: Option<String>,
    pub last_maintenance: Option<String>,
    pub status: String,
}

impl Appliance {
    /// Insert a new appliance after verifying the parent property exists and
    /// belongs to the caller. The check and insert share one transaction.
    /// Returns None when the parent is missing or owned by someone else.
    pub async fn create(
        db: &SqlitePool,
        owner_id: &str,
        req: &CreateApplianceRequest,
    ) -> Result<Option<Appliance>, sqlx::Error> {
        let mut tx = db.begin().await?;

        let parent: Option<(String,)> =
            sqlx::query_as("SELECT id FROM properties WHERE id = ? AND user_id = ?")
                .bind(&req.property_id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        if parent.is_none() {
            return Ok(None);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let status = req
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_APPLIANCE_STATUS);

        sqlx::query(
            r#"
            INSERT INTO appliances (id, property_id, name, appliance_type, installation_date,
                                    last_maintenance, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.property_id)
        .bind(req.name.trim())
        .bind(&req.appliance_type)
        .bind(&req.installation_date)
        .bind(&req.last_maintenance)
        .bind(status)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        sqlx::query_as("SELECT * FROM appliances WHERE id = ?")
            .bind(&id)
            .fetch_optional(db)
            .await
    }

    pub async fn get_for_owner(
        db: &SqlitePool,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<Appliance>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT a.* FROM appliances a
            JOIN properties p ON p.id = a.property_id
            WHERE a.id = ? AND p.user_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_for_property(
        db: &SqlitePool,
        property_id: &str,
        owner_id: &str,
    ) -> Result<Vec<Appliance>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT a.* FROM appliances a
            JOIN properties p ON p.id = a.property_id
            WHERE a.property_id = ? AND p.user_id = ?
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(property_id)
        .bind(owner_id)
        .fetch_all(db)
        .await
    }

    /// Atomic conditional update scoped through the parent property
    pub async fn update(
        db: &SqlitePool,
        id: &str,
        owner_id: &str,
        req: &UpdateApplianceRequest,
    ) -> Result<Option<Appliance>, sqlx::Error> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE appliances
            SET name = ?, appliance_type = ?, installation_date = ?,
                last_maintenance = ?, status = ?, updated_at = ?
            WHERE id = ? AND property_id IN (SELECT id FROM properties WHERE user_id = ?)
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.appliance_type)
        .bind(&req.installation_date)
        .bind(&req.last_maintenance)
        .bind(req.status.trim())
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

    pub async fn delete(db: &SqlitePool, id: &str, owner_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM appliances
            WHERE id = ? AND property_id IN (SELECT id FROM properties WHERE user_id = ?)
            "#,
        )
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
    use crate::db::{CreatePropertyRequest, Property, User};

    async fn setup(db: &SqlitePool) -> (String, String) {
        let owner = User::create(db, "owner@example.com", "hash", "Owner")
            .await
            .unwrap();
        let prop = Property::create(
            db,
            &owner.id,
            &CreatePropertyRequest {
                address: "5 Elm St".to_string(),
                property_type: None,
                monthly_rent: Some(900.0),
            },
        )
        .await
        .unwrap();
        (owner.id, prop.id)
    }

    fn request(property_id: &str, status: Option<&str>) -> CreateApplianceRequest {
        CreateApplianceRequest {
            property_id: property_id.to_string(),
            name: "Dishwasher".to_string(),
            appliance_type: Some("kitchen".to_string()),
            installation_date: Some("2023-05-01".to_string()),
            last_maintenance: None,
            status: status.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_status_defaults_to_working_on_create() {
        let db = test_pool().await;
        let (owner_id, property_id) = setup(&db).await;

        let defaulted = Appliance::create(&db, &owner_id, &request(&property_id, None))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(defaulted.status, "working");

        let explicit = Appliance::create(&db, &owner_id, &request(&property_id, Some("broken")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(explicit.status, "broken");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_or_foreign_parent() {
        let db = test_pool().await;
        let (owner_id, property_id) = setup(&db).await;
        let stranger = User::create(&db, "other@example.com", "hash", "Other")
            .await
            .unwrap();

        let missing = Appliance::create(&db, &owner_id, &request("no-such-property", None))
            .await
            .unwrap();
        assert!(missing.is_none());

        let foreign = Appliance::create(&db, &stranger.id, &request(&property_id, None))
            .await
            .unwrap();
        assert!(foreign.is_none());
    }

    #[tokio::test]
    async fn test_transitive_ownership_scoping() {
        let db = test_pool().await;
        let (owner_id, property_id) = setup(&db).await;
        let stranger = User::create(&db, "x@example.com", "hash", "X")
            .await
            .unwrap();

        let appliance = Appliance::create(&db, &owner_id, &request(&property_id, None))
            .await
            .unwrap()
            .unwrap();

        assert!(Appliance::get_for_owner(&db, &appliance.id, &stranger.id)
            .await
            .unwrap()
            .is_none());
        assert!(!Appliance::delete(&db, &appliance.id, &stranger.id)
            .await
            .unwrap());
        assert!(Appliance::get_for_owner(&db, &appliance.id, &owner_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_update_does_not_redefault_status() {
        let db = test_pool().await;
        let (owner_id, property_id) = setup(&db).await;
        let appliance = Appliance::create(&db, &owner_id, &request(&property_id, None))
            .await
            .unwrap()
            .unwrap();

        let update = UpdateApplianceRequest {
            name: "Dishwasher".to_string(),
            appliance_type: None,
            installation_date: None,
            last_maintenance: Some("2026-07-15".to_string()),
            status: "needs_repair".to_string(),
        };
        let updated = Appliance::update(&db, &appliance.id, &owner_id, &update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, "needs_repair");
        assert_eq!(updated.last_maintenance.as_deref(), Some("2026-07-15"));
        // Optionals not resent are cleared, not silently kept
        assert_eq!(updated.appliance_type, None);
        assert_eq!(updated.installation_date, None);
    }
}
