use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{Airline, Booking, Flight, Passenger, Rating};

/// Failures at the persistence seam. The duplicate variants carry the
/// conflict the services need to distinguish for their retry/translate
/// decisions; everything else collapses into `Busy`/`Unavailable`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no stored row: {0}")]
    NotFound(String),
    #[error("capacity exhausted for flight {flight_number} on {date}")]
    CapacityExhausted {
        flight_number: String,
        date: NaiveDate,
    },
    #[error("booking reference already taken: {0}")]
    DuplicateReference(String),
    #[error("identifier already taken: {0}")]
    DuplicateId(i64),
    #[error("passport already registered: {0}")]
    DuplicatePassport(String),
    #[error("rating already recorded for passenger {passenger_id} on flight {flight_number}")]
    DuplicateRating {
        passenger_id: i64,
        flight_number: String,
    },
    #[error("store busy: {0}")]
    Busy(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the externally-owned flight/airline catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn flight_by_number(&self, flight_number: &str) -> Result<Option<Flight>, StoreError>;

    async fn flights_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<Flight>, StoreError>;

    async fn airline_by_id(&self, airline_id: i64) -> Result<Option<Airline>, StoreError>;

    async fn all_flights(&self) -> Result<Vec<Flight>, StoreError>;
}

#[async_trait]
pub trait PassengerStore: Send + Sync {
    /// Insert with a caller-allocated id. Id collisions surface as
    /// `DuplicateId`, passport collisions as `DuplicatePassport`.
    async fn insert_passenger(&self, passenger: &Passenger) -> Result<(), StoreError>;

    async fn passenger_by_passport(&self, passport: &str)
        -> Result<Option<Passenger>, StoreError>;

    async fn passenger_by_id(&self, id: i64) -> Result<Option<Passenger>, StoreError>;

    /// Current persisted maximum id, 0 when the table is empty.
    async fn max_passenger_id(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// The admission primitive: atomically re-checks the booking count for
    /// the booking's (flight, departure) against the flight's capacity and
    /// inserts the row, with no window in which a concurrent admission for
    /// the same pair can pass the same check. Errors:
    /// `CapacityExhausted` when full, `NotFound` when the flight row is
    /// missing, `DuplicateReference` on a reference collision, `Busy` when
    /// the admission lock could not be taken within the bound.
    async fn insert_booking_admitted(&self, booking: &Booking) -> Result<(), StoreError>;

    /// Committed bookings for a (flight, departure) pair.
    async fn booking_count(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> Result<i64, StoreError>;

    async fn reference_exists(&self, reference: &str) -> Result<bool, StoreError>;

    /// Whether the passenger holds any booking on the flight (any date).
    async fn has_booking_for(
        &self,
        passenger_id: i64,
        flight_number: &str,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Insert guarded by the one-rating-per-(passenger, flight) constraint;
    /// a losing concurrent insert surfaces as `DuplicateRating`, an id
    /// collision as `DuplicateId`.
    async fn insert_rating_unique(&self, rating: &Rating) -> Result<(), StoreError>;

    async fn has_rating_for(
        &self,
        passenger_id: i64,
        flight_number: &str,
    ) -> Result<bool, StoreError>;

    async fn max_rating_id(&self) -> Result<i64, StoreError>;
}

/// Per-flight rating aggregate, emitted in insertion order of the
/// aggregation (first rating wins the position).
#[derive(Debug, Clone, PartialEq)]
pub struct RatingAggregate {
    pub flight_number: String,
    pub avg_score: f64,
    pub ratings: i64,
}

/// Read-only aggregates for the Query Service. Implementations must only
/// expose committed rows.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// (destination, flight count) per destination, unordered.
    async fn destination_counts(&self) -> Result<Vec<(String, i64)>, StoreError>;

    async fn rating_aggregates(&self) -> Result<Vec<RatingAggregate>, StoreError>;

    /// (flight number, committed booking count) for one departure date.
    async fn booked_counts_on(&self, date: NaiveDate) -> Result<Vec<(String, i64)>, StoreError>;
}
