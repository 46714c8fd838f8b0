//! Read-only reporting queries: property summaries, rent status,
//! maintenance cost rollups, dashboard totals and per-month analytics.
//!
//! Each query is a named, parameterized object computed per request. The
//! rent-status classification is a pure function so it can be tested without
//! a database or transport layer.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

/// Days since the latest payment after which a property counts as overdue
pub const OVERDUE_DAYS_THRESHOLD: i64 = 35;

/// Derived payment standing of a property.
///
/// Classification precedence is part of the contract: `NotSet` wins over
/// `NoPayments`, which wins over the day-threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RentStatus {
    NotSet,
    NoPayments,
    Overdue,
    Current,
}

impl RentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentStatus::NotSet => "not_set",
            RentStatus::NoPayments => "no_payments",
            RentStatus::Overdue => "overdue",
            RentStatus::Current => "current",
        }
    }
}

impl std::fmt::Display for RentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a property's rent standing from its configured rent, lifetime
/// payment count and days since the latest payment
pub fn classify_rent_status(
    monthly_rent: Option<f64>,
    payment_count: i64,
    days_since_last_payment: Option<i64>,
) -> RentStatus {
    if monthly_rent.is_none() {
        return RentStatus::NotSet;
    }
    if payment_count == 0 {
        return RentStatus::NoPayments;
    }
    match days_since_last_payment {
        Some(days) if days > OVERDUE_DAYS_THRESHOLD => RentStatus::Overdue,
        _ => RentStatus::Current,
    }
}

/// Property joined with its appliance count, for the list view
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PropertySummary {
    pub id: String,
    pub address: String,
    pub property_type: Option<String>,
    pub monthly_rent: Option<f64>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub appliance_count: i64,
}

impl PropertySummary {
    pub async fn list_for_owner(
        db: &SqlitePool,
        owner_id: &str,
    ) -> Result<Vec<PropertySummary>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT p.id, p.address, p.property_type, p.monthly_rent, p.user_id,
                   p.created_at, p.updated_at, COUNT(a.id) AS appliance_count
            FROM properties p
            LEFT JOIN appliances a ON a.property_id = p.id
            WHERE p.user_id = ?
            GROUP BY p.id
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct RentStatusRow {
    property_id: String,
    address: String,
    monthly_rent: Option<f64>,
    last_payment_date: Option<String>,
    last_payment_amount: Option<f64>,
    paid_this_month: f64,
    paid_this_year: f64,
    payment_count: i64,
}

/// Per-property rent standing for the caller
#[derive(Debug, Clone, Serialize)]
pub struct RentStatusEntry {
    pub property_id: String,
    pub address: String,
    pub monthly_rent: Option<f64>,
    pub last_payment_date: Option<String>,
    pub last_payment_amount: Option<f64>,
    pub paid_this_month: f64,
    pub paid_this_year: f64,
    pub days_since_last_payment: Option<i64>,
    pub payment_count: i64,
    pub rent_status: RentStatus,
}

impl RentStatusEntry {
    /// Compute the rent status report for every property of the owner.
    /// `today` anchors the month/year windows and the day count.
    pub async fn list_for_owner(
        db: &SqlitePool,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<RentStatusEntry>, sqlx::Error> {
        let month = today.format("%Y-%m").to_string();
        let year = today.format("%Y").to_string();

        let rows: Vec<RentStatusRow> = sqlx::query_as(
            r#"
            SELECT
                p.id AS property_id,
                p.address,
                p.monthly_rent,
                (SELECT MAX(rp.payment_date) FROM rent_payments rp
                 WHERE rp.property_id = p.id) AS last_payment_date,
                (SELECT rp.amount FROM rent_payments rp
                 WHERE rp.property_id = p.id
                 ORDER BY rp.payment_date DESC, rp.created_at DESC
                 LIMIT 1) AS last_payment_amount,
                COALESCE((SELECT SUM(rp.amount) FROM rent_payments rp
                 WHERE rp.property_id = p.id
                   AND strftime('%Y-%m', rp.payment_date) = ?), 0.0) AS paid_this_month,
                COALESCE((SELECT SUM(rp.amount) FROM rent_payments rp
                 WHERE rp.property_id = p.id
                   AND strftime('%Y', rp.payment_date) = ?), 0.0) AS paid_this_year,
                (SELECT COUNT(*) FROM rent_payments rp
                 WHERE rp.property_id = p.id) AS payment_count
            FROM properties p
            WHERE p.user_id = ?
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(&month)
        .bind(&year)
        .bind(owner_id)
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let days_since_last_payment = row
                    .last_payment_date
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                    .map(|d| (today - d).num_days());
                let rent_status = classify_rent_status(
                    row.monthly_rent,
                    row.payment_count,
                    days_since_last_payment,
                );
                RentStatusEntry {
                    property_id: row.property_id,
                    address: row.address,
                    monthly_rent: row.monthly_rent,
                    last_payment_date: row.last_payment_date,
                    last_payment_amount: row.last_payment_amount,
                    paid_this_month: row.paid_this_month,
                    paid_this_year: row.paid_this_year,
                    days_since_last_payment,
                    payment_count: row.payment_count,
                    rent_status,
                }
            })
            .collect())
    }
}

/// Maintenance cost rollup for one appliance; every field is zero when no
/// maintenance rows exist
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MaintenanceRollup {
    pub total_cost: f64,
    pub last_cost: f64,
    pub event_count: i64,
}

impl MaintenanceRollup {
    pub async fn for_appliance(
        db: &SqlitePool,
        appliance_id: &str,
    ) -> Result<MaintenanceRollup, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(cost), 0.0) AS total_cost,
                COALESCE((SELECT m2.cost FROM maintenance_records m2
                 WHERE m2.appliance_id = ?
                 ORDER BY m2.performed_at DESC, m2.created_at DESC
                 LIMIT 1), 0.0) AS last_cost,
                COUNT(*) AS event_count
            FROM maintenance_records
            WHERE appliance_id = ?
            "#,
        )
        .bind(appliance_id)
        .bind(appliance_id)
        .fetch_one(db)
        .await
    }
}

/// Portfolio totals for the dashboard
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DashboardSummary {
    pub property_count: i64,
    pub appliance_count: i64,
    pub monthly_rent_total: f64,
    pub collected_this_month: f64,
    pub collected_this_year: f64,
}

impl DashboardSummary {
    pub async fn for_owner(
        db: &SqlitePool,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<DashboardSummary, sqlx::Error> {
        let month = today.format("%Y-%m").to_string();
        let year = today.format("%Y").to_string();

        sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM properties WHERE user_id = ?1) AS property_count,
                (SELECT COUNT(*) FROM appliances a
                 JOIN properties p ON p.id = a.property_id
                 WHERE p.user_id = ?1) AS appliance_count,
                COALESCE((SELECT SUM(monthly_rent) FROM properties
                 WHERE user_id = ?1), 0.0) AS monthly_rent_total,
                COALESCE((SELECT SUM(rp.amount) FROM rent_payments rp
                 JOIN properties p ON p.id = rp.property_id
                 WHERE p.user_id = ?1
                   AND strftime('%Y-%m', rp.payment_date) = ?2), 0.0) AS collected_this_month,
                COALESCE((SELECT SUM(rp.amount) FROM rent_payments rp
                 JOIN properties p ON p.id = rp.property_id
                 WHERE p.user_id = ?1
                   AND strftime('%Y', rp.payment_date) = ?3), 0.0) AS collected_this_year
            "#,
        )
        .bind(owner_id)
        .bind(&month)
        .bind(&year)
        .fetch_one(db)
        .await
    }
}

/// Payment totals for one calendar month
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
    pub payment_count: i64,
}

impl MonthlyTotal {
    /// Per-month payment analytics for one calendar year, oldest first.
    /// Months without payments are simply absent.
    pub async fn list_for_year(
        db: &SqlitePool,
        owner_id: &str,
        year: i32,
    ) -> Result<Vec<MonthlyTotal>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT strftime('%Y-%m', rp.payment_date) AS month,
                   COALESCE(SUM(rp.amount), 0.0) AS total,
                   COUNT(*) AS payment_count
            FROM rent_payments rp
            JOIN properties p ON p.id = rp.property_id
            WHERE p.user_id = ? AND strftime('%Y', rp.payment_date) = ?
            GROUP BY month
            ORDER BY month ASC
            "#,
        )
        .bind(owner_id)
        .bind(year.to_string())
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::db::{
        CreatePropertyRequest, CreateRentPaymentRequest, Property, RentPayment, User,
    };

    #[test]
    fn test_classification_precedence() {
        // No rent configured wins regardless of payment history
        assert_eq!(
            classify_rent_status(None, 12, Some(400)),
            RentStatus::NotSet
        );
        assert_eq!(classify_rent_status(None, 0, None), RentStatus::NotSet);

        // Rent configured, never paid
        assert_eq!(
            classify_rent_status(Some(1000.0), 0, None),
            RentStatus::NoPayments
        );

        // Day threshold only applies once there is a payment
        assert_eq!(
            classify_rent_status(Some(1000.0), 3, Some(40)),
            RentStatus::Overdue
        );
        assert_eq!(
            classify_rent_status(Some(1000.0), 3, Some(10)),
            RentStatus::Current
        );
    }

    #[test]
    fn test_classification_boundary() {
        assert_eq!(
            classify_rent_status(Some(500.0), 1, Some(35)),
            RentStatus::Current
        );
        assert_eq!(
            classify_rent_status(Some(500.0), 1, Some(36)),
            RentStatus::Overdue
        );
    }

    async fn seed_property(
        db: &sqlx::SqlitePool,
        owner_id: &str,
        rent: Option<f64>,
    ) -> String {
        Property::create(
            db,
            owner_id,
            &CreatePropertyRequest {
                address: "Report St".to_string(),
                property_type: None,
                monthly_rent: rent,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_payment(db: &sqlx::SqlitePool, owner_id: &str, property_id: &str, date: &str, amount: f64) {
        RentPayment::create(
            db,
            owner_id,
            &CreateRentPaymentRequest {
                property_id: property_id.to_string(),
                amount,
                payment_date: date.to_string(),
                note: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    }

    #[tokio::test]
    async fn test_rent_status_report() {
        let db = test_pool().await;
        let owner = User::create(&db, "r@example.com", "hash", "R")
            .await
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let current = seed_property(&db, &owner.id, Some(1000.0)).await;
        seed_payment(&db, &owner.id, &current, "2026-08-01", 1000.0).await;
        seed_payment(&db, &owner.id, &current, "2026-03-01", 1000.0).await;

        let overdue = seed_property(&db, &owner.id, Some(800.0)).await;
        seed_payment(&db, &owner.id, &overdue, "2026-06-01", 800.0).await;

        let unpaid = seed_property(&db, &owner.id, Some(600.0)).await;
        let unconfigured = seed_property(&db, &owner.id, None).await;

        let report = RentStatusEntry::list_for_owner(&db, &owner.id, today)
            .await
            .unwrap();
        assert_eq!(report.len(), 4);

        let by_id = |id: &str| report.iter().find(|e| e.property_id == id).unwrap();

        let e = by_id(&current);
        assert_eq!(e.rent_status, RentStatus::Current);
        assert_eq!(e.last_payment_date.as_deref(), Some("2026-08-01"));
        assert_eq!(e.days_since_last_payment, Some(5));
        assert_eq!(e.paid_this_month, 1000.0);
        assert_eq!(e.paid_this_year, 2000.0);

        let e = by_id(&overdue);
        assert_eq!(e.rent_status, RentStatus::Overdue);
        assert_eq!(e.days_since_last_payment, Some(66));
        assert_eq!(e.paid_this_month, 0.0);

        let e = by_id(&unpaid);
        assert_eq!(e.rent_status, RentStatus::NoPayments);
        assert_eq!(e.last_payment_date, None);
        assert_eq!(e.paid_this_year, 0.0);

        let e = by_id(&unconfigured);
        assert_eq!(e.rent_status, RentStatus::NotSet);
    }

    #[tokio::test]
    async fn test_rollup_defaults_to_zero() {
        let db = test_pool().await;
        let rollup = MaintenanceRollup::for_appliance(&db, "no-such-appliance")
            .await
            .unwrap();
        assert_eq!(rollup.total_cost, 0.0);
        assert_eq!(rollup.last_cost, 0.0);
        assert_eq!(rollup.event_count, 0);
    }

    #[tokio::test]
    async fn test_dashboard_and_monthly_totals() {
        let db = test_pool().await;
        let owner = User::create(&db, "d@example.com", "hash", "D")
            .await
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let prop = seed_property(&db, &owner.id, Some(1200.0)).await;
        seed_payment(&db, &owner.id, &prop, "2026-08-02", 1200.0).await;
        seed_payment(&db, &owner.id, &prop, "2026-07-02", 1200.0).await;
        seed_payment(&db, &owner.id, &prop, "2025-12-02", 1100.0).await;

        let summary = DashboardSummary::for_owner(&db, &owner.id, today)
            .await
            .unwrap();
        assert_eq!(summary.property_count, 1);
        assert_eq!(summary.monthly_rent_total, 1200.0);
        assert_eq!(summary.collected_this_month, 1200.0);
        assert_eq!(summary.collected_this_year, 2400.0);

        let months = MonthlyTotal::list_for_year(&db, &owner.id, 2026)
            .await
            .unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2026-07");
        assert_eq!(months[1].total, 1200.0);
    }
}
