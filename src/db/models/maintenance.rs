//! Maintenance record models, scoped through appliance and property.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: String,
    pub appliance_id: String,
    pub description: String,
    pub cost: f64,
    pub performed_at: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMaintenanceRequest {
    pub description: String,
    #[serde(default)]
    pub cost: f64,
    pub performed_at: String,
}

impl MaintenanceRecord {
    /// Insert a maintenance record after verifying the appliance belongs to
    /// one of the caller's properties. Returns None otherwise.
    pub async fn create(
        db: &SqlitePool,
        owner_id: &str,
        appliance_id: &str,
        req: &CreateMaintenanceRequest,
    ) -> Result<Option<MaintenanceRecord>, sqlx::Error> {
        let mut tx = db.begin().await?;

        let parent: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT a.id FROM appliances a
            JOIN properties p ON p.id = a.property_id
            WHERE a.id = ? AND p.user_id = ?
            "#,
        )
        .bind(appliance_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        if parent.is_none() {
            return Ok(None);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO maintenance_records (id, appliance_id, description, cost, performed_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(appliance_id)
        .bind(req.description.trim())
        .bind(req.cost)
        .bind(req.performed_at.trim())
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        sqlx::query_as("SELECT * FROM maintenance_records WHERE id = ?")
            .bind(&id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_for_appliance(
        db: &SqlitePool,
        appliance_id: &str,
        owner_id: &str,
    ) -> Result<Vec<MaintenanceRecord>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT m.* FROM maintenance_records m
            JOIN appliances a ON a.id = m.appliance_id
            JOIN properties p ON p.id = a.property_id
            WHERE m.appliance_id = ? AND p.user_id = ?
            ORDER BY m.performed_at DESC
            "#,
        )
        .bind(appliance_id)
        .bind(owner_id)
        .fetch_all(db)
        .await
    }

    pub async fn delete(db: &SqlitePool, id: &str, owner_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM maintenance_records
            WHERE id = ? AND appliance_id IN (
                SELECT a.id FROM appliances a
                JOIN properties p ON p.id = a.property_id
                WHERE p.user_id = ?
            )
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
