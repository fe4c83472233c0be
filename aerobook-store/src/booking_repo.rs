use aerobook_core::ids::PassportNumber;
use aerobook_core::model::{Booking, Passenger, Rating};
use aerobook_core::store::{BookingStore, PassengerStore, RatingStore, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::pg;

pub struct PgPassengerRepo {
    pool: PgPool,
}

impl PgPassengerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PassengerRow {
    id: i64,
    passport: String,
    full_name: String,
    birth_date: NaiveDate,
    country: String,
}

impl From<PassengerRow> for Passenger {
    fn from(row: PassengerRow) -> Self {
        Passenger {
            id: row.id,
            passport: PassportNumber::new_unchecked(row.passport),
            full_name: row.full_name,
            birth_date: row.birth_date,
            country: row.country,
        }
    }
}

#[async_trait]
impl PassengerStore for PgPassengerRepo {
    async fn insert_passenger(&self, passenger: &Passenger) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO passengers (id, passport, full_name, birth_date, country)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(passenger.id)
        .bind(passenger.passport.as_str())
        .bind(&passenger.full_name)
        .bind(passenger.birth_date)
        .bind(&passenger.country)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if pg::is_unique_violation(&err) => {
                match pg::violated_constraint(&err).as_deref() {
                    Some("passengers_passport_key") => Err(StoreError::DuplicatePassport(
                        passenger.passport.as_str().to_string(),
                    )),
                    _ => Err(StoreError::DuplicateId(passenger.id)),
                }
            }
            Err(err) => Err(pg::unavailable(err)),
        }
    }

    async fn passenger_by_passport(
        &self,
        passport: &str,
    ) -> Result<Option<Passenger>, StoreError> {
        let row = sqlx::query_as::<_, PassengerRow>(
            "SELECT id, passport, full_name, birth_date, country FROM passengers WHERE passport = $1",
        )
        .bind(passport)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg::unavailable)?;
        Ok(row.map(Passenger::from))
    }

    async fn passenger_by_id(&self, id: i64) -> Result<Option<Passenger>, StoreError> {
        let row = sqlx::query_as::<_, PassengerRow>(
            "SELECT id, passport, full_name, birth_date, country FROM passengers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg::unavailable)?;
        Ok(row.map(Passenger::from))
    }

    async fn max_passenger_id(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT coalesce(max(id), 0) FROM passengers")
            .fetch_one(&self.pool)
            .await
            .map_err(pg::unavailable)
    }
}

pub struct PgBookingRepo {
    pool: PgPool,
    lock_timeout_ms: u64,
}

impl PgBookingRepo {
    pub fn new(pool: PgPool, lock_timeout_ms: u64) -> Self {
        Self {
            pool,
            lock_timeout_ms,
        }
    }
}

#[async_trait]
impl BookingStore for PgBookingRepo {
    async fn insert_booking_admitted(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(pg::unavailable)?;

        // Bound how long this transaction waits on a competing admission.
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await
            .map_err(pg::unavailable)?;

        // Row-level lock on the flight row serializes admissions for this
        // flight; occupancy check and insert commit as one unit.
        let seats: Option<i32> = sqlx::query_scalar(
            "SELECT seats FROM flights WHERE flight_number = $1 FOR UPDATE",
        )
        .bind(&booking.flight_number)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| {
            if pg::is_lock_timeout(&err) {
                StoreError::Busy(format!(
                    "admission lock timeout for flight {} on {}",
                    booking.flight_number, booking.departure
                ))
            } else {
                pg::unavailable(err)
            }
        })?;
        let seats =
            seats.ok_or_else(|| StoreError::NotFound(booking.flight_number.clone()))?;

        let sold: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM bookings WHERE flight_number = $1 AND departure = $2",
        )
        .bind(&booking.flight_number)
        .bind(booking.departure)
        .fetch_one(&mut *tx)
        .await
        .map_err(pg::unavailable)?;

        if sold >= i64::from(seats) {
            // Transaction drops here and rolls back.
            return Err(StoreError::CapacityExhausted {
                flight_number: booking.flight_number.clone(),
                date: booking.departure,
            });
        }

        sqlx::query(
            r#"
            INSERT INTO bookings (reference, departure, flight_number, passenger_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(booking.reference.as_str())
        .bind(booking.departure)
        .bind(&booking.flight_number)
        .bind(booking.passenger_id)
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if pg::is_unique_violation(&err) {
                StoreError::DuplicateReference(booking.reference.as_str().to_string())
            } else {
                pg::unavailable(err)
            }
        })?;

        tx.commit().await.map_err(pg::unavailable)
    }

    async fn booking_count(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        sqlx::query_scalar(
            "SELECT count(*) FROM bookings WHERE flight_number = $1 AND departure = $2",
        )
        .bind(flight_number)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(pg::unavailable)
    }

    async fn reference_exists(&self, reference: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookings WHERE reference = $1)")
            .bind(reference)
            .fetch_one(&self.pool)
            .await
            .map_err(pg::unavailable)
    }

    async fn has_booking_for(
        &self,
        passenger_id: i64,
        flight_number: &str,
    ) -> Result<bool, StoreError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM bookings WHERE passenger_id = $1 AND flight_number = $2)",
        )
        .bind(passenger_id)
        .bind(flight_number)
        .fetch_one(&self.pool)
        .await
        .map_err(pg::unavailable)
    }
}

pub struct PgRatingRepo {
    pool: PgPool,
}

impl PgRatingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingStore for PgRatingRepo {
    async fn insert_rating_unique(&self, rating: &Rating) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO ratings (id, passenger_id, flight_number, score, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(rating.id)
        .bind(rating.passenger_id)
        .bind(&rating.flight_number)
        .bind(rating.score)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if pg::is_unique_violation(&err) => {
                match pg::violated_constraint(&err).as_deref() {
                    Some("ratings_passenger_flight_key") => Err(StoreError::DuplicateRating {
                        passenger_id: rating.passenger_id,
                        flight_number: rating.flight_number.clone(),
                    }),
                    _ => Err(StoreError::DuplicateId(rating.id)),
                }
            }
            Err(err) => Err(pg::unavailable(err)),
        }
    }

    async fn has_rating_for(
        &self,
        passenger_id: i64,
        flight_number: &str,
    ) -> Result<bool, StoreError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM ratings WHERE passenger_id = $1 AND flight_number = $2)",
        )
        .bind(passenger_id)
        .bind(flight_number)
        .fetch_one(&self.pool)
        .await
        .map_err(pg::unavailable)
    }

    async fn max_rating_id(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT coalesce(max(id), 0) FROM ratings")
            .fetch_one(&self.pool)
            .await
            .map_err(pg::unavailable)
    }
}
