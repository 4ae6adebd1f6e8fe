//! Routes repository - tracked routes and their price watermark

use farewatch_core::dates::{format_api_date, parse_date};
use farewatch_core::{Error, NewRoute, Result, TrackedRoute};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::parse_timestamp;

/// Repository for tracked routes
pub struct RoutesRepository {
    pool: SqlitePool,
}

impl RoutesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new route, returning its id
    pub async fn insert(&self, route: &NewRoute) -> Result<u32> {
        let result = sqlx::query(
            r#"
            INSERT INTO routes (origin_code, destination_code, target_price, date_from, date_to)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&route.origin_code)
        .bind(&route.destination_code)
        .bind(route.target_price)
        .bind(route.date_from.map(format_api_date))
        .bind(route.date_to.map(format_api_date))
        .execute(&self.pool)
        .await
        .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(result.last_insert_rowid() as u32)
    }

    /// Get route by ID
    pub async fn get_by_id(&self, id: u32) -> Result<Option<TrackedRoute>> {
        let row = sqlx::query(
            r#"
            SELECT id, origin_code, destination_code, target_price, lowest_price_seen,
                   date_from, date_to, created_at
            FROM routes WHERE id = ?
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::DbError(e.to_string()))?;

        row.as_ref().map(row_to_route).transpose()
    }

    /// Get all routes in id order
    pub async fn get_all(&self) -> Result<Vec<TrackedRoute>> {
        let rows = sqlx::query(
            r#"
            SELECT id, origin_code, destination_code, target_price, lowest_price_seen,
                   date_from, date_to, created_at
            FROM routes ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::DbError(e.to_string()))?;

        rows.iter().map(row_to_route).collect()
    }

    /// Lower the route's watermark to `price`.
    ///
    /// The update only applies when there is no watermark yet or `price` is
    /// strictly below it, so the stored value can never go up. Returns
    /// whether the row changed.
    pub async fn lower_watermark(&self, id: u32, price: f64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE routes
            SET lowest_price_seen = ?
            WHERE id = ? AND (lowest_price_seen IS NULL OR lowest_price_seen > ?)
            "#,
        )
        .bind(price)
        .bind(id as i64)
        .bind(price)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete route by ID together with its price history
    pub async fn delete(&self, id: u32) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        sqlx::query("DELETE FROM price_history WHERE route_id = ?")
            .bind(id as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        let result = sqlx::query("DELETE FROM routes WHERE id = ?")
            .bind(id as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        tx.commit().await.map_err(|e| Error::DbError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of tracked routes
    pub async fn count(&self) -> Result<u64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM routes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(row.0 as u64)
    }
}

fn row_to_route(row: &sqlx::sqlite::SqliteRow) -> Result<TrackedRoute> {
    let id: i64 = row.get("id");
    let origin_code: String = row.get("origin_code");
    let destination_code: String = row.get("destination_code");
    let target_price: f64 = row.get("target_price");
    let lowest_price_seen: Option<f64> = row.get("lowest_price_seen");
    let date_from: Option<String> = row.get("date_from");
    let date_to: Option<String> = row.get("date_to");
    let created_at: String = row.get("created_at");

    Ok(TrackedRoute {
        id: id as u32,
        origin_code,
        destination_code,
        target_price,
        lowest_price_seen,
        date_from: date_from.as_deref().map(parse_date).transpose()?,
        date_to: date_to.as_deref().map(parse_date).transpose()?,
        created_at: parse_timestamp(&created_at),
    })
}
