use aerobook_core::model::{Airline, Flight};
use aerobook_core::store::{CatalogStore, QueryStore, RatingAggregate, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::pg;

pub struct PgCatalogRepo {
    pool: PgPool,
}

impl PgCatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    flight_number: String,
    origin: String,
    destination: String,
    airline_id: i64,
    duration_minutes: i32,
    seats: i32,
    plane: String,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            flight_number: row.flight_number,
            origin: row.origin,
            destination: row.destination,
            airline_id: row.airline_id,
            duration_minutes: row.duration_minutes,
            seats: row.seats,
            plane: row.plane,
        }
    }
}

const FLIGHT_COLUMNS: &str =
    "flight_number, origin, destination, airline_id, duration_minutes, seats, plane";

#[async_trait]
impl CatalogStore for PgCatalogRepo {
    async fn flight_by_number(&self, flight_number: &str) -> Result<Option<Flight>, StoreError> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {} FROM flights WHERE flight_number = $1",
            FLIGHT_COLUMNS
        ))
        .bind(flight_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg::unavailable)?;
        Ok(row.map(Flight::from))
    }

    async fn flights_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<Flight>, StoreError> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {} FROM flights WHERE origin = $1 AND destination = $2 ORDER BY flight_number",
            FLIGHT_COLUMNS
        ))
        .bind(origin)
        .bind(destination)
        .fetch_all(&self.pool)
        .await
        .map_err(pg::unavailable)?;
        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn airline_by_id(&self, airline_id: i64) -> Result<Option<Airline>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, name, country FROM airlines WHERE id = $1",
        )
        .bind(airline_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg::unavailable)?;
        Ok(row.map(|(id, name, country)| Airline { id, name, country }))
    }

    async fn all_flights(&self) -> Result<Vec<Flight>, StoreError> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {} FROM flights ORDER BY flight_number",
            FLIGHT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(pg::unavailable)?;
        Ok(rows.into_iter().map(Flight::from).collect())
    }
}

pub struct PgQueryRepo {
    pool: PgPool,
}

impl PgQueryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryStore for PgQueryRepo {
    async fn destination_counts(&self) -> Result<Vec<(String, i64)>, StoreError> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT destination, count(*) FROM flights GROUP BY destination",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg::unavailable)
    }

    async fn rating_aggregates(&self) -> Result<Vec<RatingAggregate>, StoreError> {
        // min(id) keeps the emit order at "first rating wins", matching the
        // in-memory store.
        let rows = sqlx::query_as::<_, (String, f64, i64)>(
            r#"
            SELECT flight_number, avg(score)::float8, count(*)
            FROM ratings
            GROUP BY flight_number
            ORDER BY min(id)
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg::unavailable)?;
        Ok(rows
            .into_iter()
            .map(|(flight_number, avg_score, ratings)| RatingAggregate {
                flight_number,
                avg_score,
                ratings,
            })
            .collect())
    }

    async fn booked_counts_on(&self, date: NaiveDate) -> Result<Vec<(String, i64)>, StoreError> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT flight_number, count(*) FROM bookings WHERE departure = $1 GROUP BY flight_number",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(pg::unavailable)
    }
}
