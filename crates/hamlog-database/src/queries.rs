//! Database query operations for hamlog

use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use hamlog_core::{Error, Result};
use sqlx::query::Query;
use sqlx::{Row, SqlitePool};
use sqlx::sqlite::{Sqlite, SqliteArguments};

use crate::models::QsoDb;

/// QSO table operations
pub struct QsoQueries;

impl QsoQueries {
    /// Insert a new QSO and return its assigned id
    ///
    /// `row.id` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert(pool: &SqlitePool, row: QsoDb) -> Result<i64> {
        let query = r"
            INSERT INTO qsos (
                call, date_time, date_time_off, mode, band, band_rx, freq, freq_rx,
                name, comment, cont, country, cqz, distance, dxcc, email, gridsquare,
                ituz, lat, lon, my_city, my_country, my_cq_zone, my_gridsquare,
                my_itu_zone, my_lat, my_lon, my_name, operator, qsl_rcvd, qsl_sent,
                qsl_via, qth, rst_rcvd, rst_sent, station_callsign
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            )
            RETURNING id
        ";

        let row = bind_columns(sqlx::query(query), row)
            .fetch_one(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        row.try_get("id")
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Overwrite every column of the row with `row.id`
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update(pool: &SqlitePool, row: QsoDb) -> Result<u64> {
        let query = r"
            UPDATE qsos SET
                call = ?, date_time = ?, date_time_off = ?, mode = ?, band = ?,
                band_rx = ?, freq = ?, freq_rx = ?, name = ?, comment = ?, cont = ?,
                country = ?, cqz = ?, distance = ?, dxcc = ?, email = ?,
                gridsquare = ?, ituz = ?, lat = ?, lon = ?, my_city = ?,
                my_country = ?, my_cq_zone = ?, my_gridsquare = ?, my_itu_zone = ?,
                my_lat = ?, my_lon = ?, my_name = ?, operator = ?, qsl_rcvd = ?,
                qsl_sent = ?, qsl_via = ?, qth = ?, rst_rcvd = ?, rst_sent = ?,
                station_callsign = ?
            WHERE id = ?
        ";

        let id = row.id;
        let result = bind_columns(sqlx::query(query), row)
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Delete a QSO, returning the number of rows removed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM qsos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Find a QSO by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<QsoDb>> {
        sqlx::query_as::<_, QsoDb>("SELECT * FROM qsos WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Whether a QSO with `id` exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM qsos WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(found != 0)
    }

    /// Count all QSOs
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM qsos")
            .fetch_one(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Stream every row ordered by id
    pub fn stream(pool: &SqlitePool) -> BoxStream<'_, Result<QsoDb>> {
        sqlx::query_as::<_, QsoDb>("SELECT * FROM qsos ORDER BY id")
            .fetch(pool)
            .map_err(|e| Error::Database(e.to_string()))
            .boxed()
    }
}

/// Bind every non-key column in table order
fn bind_columns<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    row: QsoDb,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(row.call)
        .bind(row.date_time)
        .bind(row.date_time_off)
        .bind(row.mode)
        .bind(row.band)
        .bind(row.band_rx)
        .bind(row.freq)
        .bind(row.freq_rx)
        .bind(row.name)
        .bind(row.comment)
        .bind(row.cont)
        .bind(row.country)
        .bind(row.cqz)
        .bind(row.distance)
        .bind(row.dxcc)
        .bind(row.email)
        .bind(row.gridsquare)
        .bind(row.ituz)
        .bind(row.lat)
        .bind(row.lon)
        .bind(row.my_city)
        .bind(row.my_country)
        .bind(row.my_cq_zone)
        .bind(row.my_gridsquare)
        .bind(row.my_itu_zone)
        .bind(row.my_lat)
        .bind(row.my_lon)
        .bind(row.my_name)
        .bind(row.operator)
        .bind(row.qsl_rcvd)
        .bind(row.qsl_sent)
        .bind(row.qsl_via)
        .bind(row.qth)
        .bind(row.rst_rcvd)
        .bind(row.rst_sent)
        .bind(row.station_callsign)
}
