//! Rent payment models and queries, scoped through the parent property.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RentPayment {
    pub id: String,
    pub property_id: String,
    pub amount: f64,
    pub payment_date: String,
    pub note: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRentPaymentRequest {
    pub property_id: String,
    pub amount: f64,
    pub payment_date: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRentPaymentRequest {
    pub amount: f64,
    pub payment_date: String,
    pub note: Option<String>,
}

impl RentPayment {
    /// Insert a payment after verifying the parent property belongs to the
    /// caller, inside one transaction. Returns None when the parent is
    /// missing or foreign.
    pub async fn create(
        db: &SqlitePool,
        owner_id: &str,
        req: &CreateRentPaymentRequest,
    ) -> Result<Option<RentPayment>, sqlx::Error> {
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

        sqlx::query(
            r#"
            INSERT INTO rent_payments (id, property_id, amount, payment_date, note, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.property_id)
        .bind(req.amount)
        .bind(req.payment_date.trim())
        .bind(&req.note)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        sqlx::query_as("SELECT * FROM rent_payments WHERE id = ?")
            .bind(&id)
            .fetch_optional(db)
            .await
    }

    pub async fn get_for_owner(
        db: &SqlitePool,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<RentPayment>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT rp.* FROM rent_payments rp
            JOIN properties p ON p.id = rp.property_id
            WHERE rp.id = ? AND p.user_id = ?
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
    ) -> Result<Vec<RentPayment>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT rp.* FROM rent_payments rp
            JOIN properties p ON p.id = rp.property_id
            WHERE rp.property_id = ? AND p.user_id = ?
            ORDER BY rp.payment_date DESC
            "#,
        )
        .bind(property_id)
        .bind(owner_id)
        .fetch_all(db)
        .await
    }

    pub async fn update(
        db: &SqlitePool,
        id: &str,
        owner_id: &str,
        req: &UpdateRentPaymentRequest,
    ) -> Result<Option<RentPayment>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE rent_payments
            SET amount = ?, payment_date = ?, note = ?
            WHERE id = ? AND property_id IN (SELECT id FROM properties WHERE user_id = ?)
            "#,
        )
        .bind(req.amount)
        .bind(req.payment_date.trim())
        .bind(&req.note)
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
            DELETE FROM rent_payments
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
                address: "9 Birch Ln".to_string(),
                property_type: None,
                monthly_rent: Some(1500.0),
            },
        )
        .await
        .unwrap();
        (owner.id, prop.id)
    }

    fn payment(property_id: &str, date: &str) -> CreateRentPaymentRequest {
        CreateRentPaymentRequest {
            property_id: property_id.to_string(),
            amount: 1500.0,
            payment_date: date.to_string(),
            note: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_pool().await;
        let (owner_id, property_id) = setup(&db).await;

        let created = RentPayment::create(&db, &owner_id, &payment(&property_id, "2026-07-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.amount, 1500.0);
        assert_eq!(created.payment_date, "2026-07-01");

        RentPayment::create(&db, &owner_id, &payment(&property_id, "2026-08-01"))
            .await
            .unwrap()
            .unwrap();

        let listed = RentPayment::list_for_property(&db, &property_id, &owner_id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        // Newest first
        assert_eq!(listed[0].payment_date, "2026-08-01");
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_property() {
        let db = test_pool().await;
        let (_owner_id, property_id) = setup(&db).await;
        let stranger = User::create(&db, "s@example.com", "hash", "S")
            .await
            .unwrap();

        let rejected = RentPayment::create(&db, &stranger.id, &payment(&property_id, "2026-08-01"))
            .await
            .unwrap();
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn test_delete_scoped_by_owner() {
        let db = test_pool().await;
        let (owner_id, property_id) = setup(&db).await;
        let stranger = User::create(&db, "t@example.com", "hash", "T")
            .await
            .unwrap();

        let p = RentPayment::create(&db, &owner_id, &payment(&property_id, "2026-08-01"))
            .await
            .unwrap()
            .unwrap();

        assert!(!RentPayment::delete(&db, &p.id, &stranger.id).await.unwrap());
        assert!(RentPayment::delete(&db, &p.id, &owner_id).await.unwrap());
        assert!(!RentPayment::delete(&db, &p.id, &owner_id).await.unwrap());
    }
}
