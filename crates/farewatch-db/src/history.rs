//! Price history repository - one row per successful price check

use farewatch_core::{Error, PricePoint, Result};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::parse_timestamp;

/// Repository for the per-route price log
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an observed price
    pub async fn insert(&self, route_id: u32, price: f64) -> Result<u32> {
        let result = sqlx::query("INSERT INTO price_history (route_id, price) VALUES (?, ?)")
            .bind(route_id as i64)
            .bind(price)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(result.last_insert_rowid() as u32)
    }

    /// Most recent observations for a route, newest first
    pub async fn get_by_route(&self, route_id: u32, limit: usize) -> Result<Vec<PricePoint>> {
        let rows = sqlx::query(
            r#"
            SELECT id, route_id, price, checked_at
            FROM price_history
            WHERE route_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(route_id as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                let route_id: i64 = row.get("route_id");
                let checked_at: String = row.get("checked_at");
                PricePoint {
                    id: id as u32,
                    route_id: route_id as u32,
                    price: row.get("price"),
                    checked_at: parse_timestamp(&checked_at),
                }
            })
            .collect())
    }
}
