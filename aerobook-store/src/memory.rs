use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use aerobook_core::model::{Airline, Booking, Flight, Passenger, Rating};
use aerobook_core::store::{
    BookingStore, CatalogStore, PassengerStore, QueryStore, RatingAggregate, RatingStore,
    StoreError,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct MemoryInner {
    airlines: HashMap<i64, Airline>,
    flights: HashMap<String, Flight>,
    passengers: HashMap<i64, Passenger>,
    bookings: Vec<Booking>,
    references: HashSet<String>,
    ratings: Vec<Rating>,
    rated: HashSet<(i64, String)>,
}

/// Single-process store. The per-(flight, date) admission mutex is the only
/// path that appends bookings, so check+insert is one critical section;
/// readers go through the data lock and only ever see committed rows.
pub struct MemoryStore {
    data: RwLock<MemoryInner>,
    admission_locks: Mutex<HashMap<(String, NaiveDate), Arc<Mutex<()>>>>,
    lock_timeout: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            data: RwLock::new(MemoryInner::default()),
            admission_locks: Mutex::new(HashMap::new()),
            lock_timeout,
        }
    }

    /// Catalog fixtures. The catalog is externally owned, so seeding is an
    /// inherent method rather than part of the read-only trait.
    pub async fn seed_airline(&self, airline: Airline) {
        let mut inner = self.data.write().await;
        inner.airlines.insert(airline.id, airline);
    }

    pub async fn seed_flight(&self, flight: Flight) {
        let mut inner = self.data.write().await;
        inner.flights.insert(flight.flight_number.clone(), flight);
    }

    async fn admission_gate(&self, flight_number: &str, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self.admission_locks.lock().await;
        locks
            .entry((flight_number.to_string(), date))
            .or_default()
            .clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn flight_by_number(&self, flight_number: &str) -> Result<Option<Flight>, StoreError> {
        let inner = self.data.read().await;
        Ok(inner.flights.get(flight_number).cloned())
    }

    async fn flights_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<Flight>, StoreError> {
        let inner = self.data.read().await;
        let mut flights: Vec<Flight> = inner
            .flights
            .values()
            .filter(|f| f.origin == origin && f.destination == destination)
            .cloned()
            .collect();
        flights.sort_by(|a, b| a.flight_number.cmp(&b.flight_number));
        Ok(flights)
    }

    async fn airline_by_id(&self, airline_id: i64) -> Result<Option<Airline>, StoreError> {
        let inner = self.data.read().await;
        Ok(inner.airlines.get(&airline_id).cloned())
    }

    async fn all_flights(&self) -> Result<Vec<Flight>, StoreError> {
        let inner = self.data.read().await;
        let mut flights: Vec<Flight> = inner.flights.values().cloned().collect();
        flights.sort_by(|a, b| a.flight_number.cmp(&b.flight_number));
        Ok(flights)
    }
}

#[async_trait]
impl PassengerStore for MemoryStore {
    async fn insert_passenger(&self, passenger: &Passenger) -> Result<(), StoreError> {
        let mut inner = self.data.write().await;
        if inner.passengers.contains_key(&passenger.id) {
            return Err(StoreError::DuplicateId(passenger.id));
        }
        if inner
            .passengers
            .values()
            .any(|p| p.passport == passenger.passport)
        {
            return Err(StoreError::DuplicatePassport(
                passenger.passport.as_str().to_string(),
            ));
        }
        inner.passengers.insert(passenger.id, passenger.clone());
        Ok(())
    }

    async fn passenger_by_passport(
        &self,
        passport: &str,
    ) -> Result<Option<Passenger>, StoreError> {
        let inner = self.data.read().await;
        Ok(inner
            .passengers
            .values()
            .find(|p| p.passport.as_str() == passport)
            .cloned())
    }

    async fn passenger_by_id(&self, id: i64) -> Result<Option<Passenger>, StoreError> {
        let inner = self.data.read().await;
        Ok(inner.passengers.get(&id).cloned())
    }

    async fn max_passenger_id(&self) -> Result<i64, StoreError> {
        let inner = self.data.read().await;
        Ok(inner.passengers.keys().copied().max().unwrap_or(0))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking_admitted(&self, booking: &Booking) -> Result<(), StoreError> {
        let gate = self
            .admission_gate(&booking.flight_number, booking.departure)
            .await;
        let _admission = timeout(self.lock_timeout, gate.lock()).await.map_err(|_| {
            StoreError::Busy(format!(
                "admission lock timeout for flight {} on {}",
                booking.flight_number, booking.departure
            ))
        })?;

        let mut inner = self.data.write().await;
        let capacity = inner
            .flights
            .get(&booking.flight_number)
            .map(|f| f.seats)
            .ok_or_else(|| StoreError::NotFound(booking.flight_number.clone()))?;
        let sold = inner
            .bookings
            .iter()
            .filter(|b| {
                b.flight_number == booking.flight_number && b.departure == booking.departure
            })
            .count() as i64;
        if sold >= i64::from(capacity) {
            return Err(StoreError::CapacityExhausted {
                flight_number: booking.flight_number.clone(),
                date: booking.departure,
            });
        }
        if !inner
            .references
            .insert(booking.reference.as_str().to_string())
        {
            return Err(StoreError::DuplicateReference(
                booking.reference.as_str().to_string(),
            ));
        }
        inner.bookings.push(booking.clone());
        Ok(())
    }

    async fn booking_count(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        let inner = self.data.read().await;
        Ok(inner
            .bookings
            .iter()
            .filter(|b| b.flight_number == flight_number && b.departure == date)
            .count() as i64)
    }

    async fn reference_exists(&self, reference: &str) -> Result<bool, StoreError> {
        let inner = self.data.read().await;
        Ok(inner.references.contains(reference))
    }

    async fn has_booking_for(
        &self,
        passenger_id: i64,
        flight_number: &str,
    ) -> Result<bool, StoreError> {
        let inner = self.data.read().await;
        Ok(inner
            .bookings
            .iter()
            .any(|b| b.passenger_id == passenger_id && b.flight_number == flight_number))
    }
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn insert_rating_unique(&self, rating: &Rating) -> Result<(), StoreError> {
        let mut inner = self.data.write().await;
        if inner.ratings.iter().any(|r| r.id == rating.id) {
            return Err(StoreError::DuplicateId(rating.id));
        }
        let pair = (rating.passenger_id, rating.flight_number.clone());
        if !inner.rated.insert(pair) {
            return Err(StoreError::DuplicateRating {
                passenger_id: rating.passenger_id,
                flight_number: rating.flight_number.clone(),
            });
        }
        inner.ratings.push(rating.clone());
        Ok(())
    }

    async fn has_rating_for(
        &self,
        passenger_id: i64,
        flight_number: &str,
    ) -> Result<bool, StoreError> {
        let inner = self.data.read().await;
        Ok(inner
            .rated
            .contains(&(passenger_id, flight_number.to_string())))
    }

    async fn max_rating_id(&self) -> Result<i64, StoreError> {
        let inner = self.data.read().await;
        Ok(inner.ratings.iter().map(|r| r.id).max().unwrap_or(0))
    }
}

#[async_trait]
impl QueryStore for MemoryStore {
    async fn destination_counts(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let inner = self.data.read().await;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for flight in inner.flights.values() {
            *counts.entry(flight.destination.clone()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn rating_aggregates(&self) -> Result<Vec<RatingAggregate>, StoreError> {
        let inner = self.data.read().await;
        // First-seen order per flight, so ties downstream resolve by the
        // insertion order of the aggregation.
        let mut order: Vec<String> = Vec::new();
        let mut sums: HashMap<String, (i64, i64)> = HashMap::new();
        for rating in &inner.ratings {
            let entry = sums.entry(rating.flight_number.clone()).or_insert_with(|| {
                order.push(rating.flight_number.clone());
                (0, 0)
            });
            entry.0 += i64::from(rating.score);
            entry.1 += 1;
        }
        Ok(order
            .into_iter()
            .map(|flight_number| {
                let (sum, count) = sums[&flight_number];
                RatingAggregate {
                    flight_number,
                    avg_score: sum as f64 / count as f64,
                    ratings: count,
                }
            })
            .collect())
    }

    async fn booked_counts_on(&self, date: NaiveDate) -> Result<Vec<(String, i64)>, StoreError> {
        let inner = self.data.read().await;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for booking in inner.bookings.iter().filter(|b| b.departure == date) {
            *counts.entry(booking.flight_number.clone()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerobook_core::ids::BookingReference;
    use chrono::Utc;

    fn flight(number: &str, seats: i32) -> Flight {
        Flight {
            flight_number: number.to_string(),
            origin: "JFK".to_string(),
            destination: "LHR".to_string(),
            airline_id: 1,
            duration_minutes: 420,
            seats,
            plane: "Boeing 777".to_string(),
        }
    }

    fn booking(reference: &str, number: &str, date: NaiveDate, passenger_id: i64) -> Booking {
        Booking {
            reference: BookingReference::new_unchecked(reference.to_string()),
            departure: date,
            flight_number: number.to_string(),
            passenger_id,
            created_at: Utc::now(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    #[tokio::test]
    async fn test_admission_respects_capacity() {
        let store = MemoryStore::new();
        store.seed_flight(flight("AE100", 2)).await;

        store
            .insert_booking_admitted(&booking("AAAAAAAAA1", "AE100", date(1), 1))
            .await
            .unwrap();
        store
            .insert_booking_admitted(&booking("AAAAAAAAA2", "AE100", date(1), 2))
            .await
            .unwrap();
        let full = store
            .insert_booking_admitted(&booking("AAAAAAAAA3", "AE100", date(1), 3))
            .await;
        assert!(matches!(full, Err(StoreError::CapacityExhausted { .. })));

        // Another departure date has its own seat count.
        store
            .insert_booking_admitted(&booking("AAAAAAAAA4", "AE100", date(2), 3))
            .await
            .unwrap();
        assert_eq!(store.booking_count("AE100", date(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_admission_rejects_unknown_flight() {
        let store = MemoryStore::new();
        let result = store
            .insert_booking_admitted(&booking("AAAAAAAAA1", "NOPE99", date(1), 1))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let store = MemoryStore::new();
        store.seed_flight(flight("AE100", 10)).await;
        store
            .insert_booking_admitted(&booking("SAMEREF001", "AE100", date(1), 1))
            .await
            .unwrap();
        let result = store
            .insert_booking_admitted(&booking("SAMEREF001", "AE100", date(1), 2))
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateReference(_))));
    }

    #[tokio::test]
    async fn test_held_admission_gate_times_out_as_busy() {
        let store = MemoryStore::with_lock_timeout(Duration::from_millis(20));
        store.seed_flight(flight("AE100", 10)).await;

        let gate = store.admission_gate("AE100", date(1)).await;
        let _held = gate.lock().await;

        let result = store
            .insert_booking_admitted(&booking("AAAAAAAAA1", "AE100", date(1), 1))
            .await;
        assert!(matches!(result, Err(StoreError::Busy(_))));
    }

    #[tokio::test]
    async fn test_concurrent_admissions_never_exceed_capacity() {
        let store = Arc::new(MemoryStore::new());
        store.seed_flight(flight("AE100", 5)).await;

        let mut handles = Vec::new();
        for i in 0..32i64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_booking_admitted(&booking(
                        &format!("REF{:07}", i),
                        "AE100",
                        date(1),
                        i,
                    ))
                    .await
            }));
        }

        let mut admitted = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => admitted += 1,
                Err(StoreError::CapacityExhausted { .. }) => refused += 1,
                Err(other) => panic!("unexpected admission error: {other}"),
            }
        }
        assert_eq!(admitted, 5);
        assert_eq!(refused, 27);
        assert_eq!(store.booking_count("AE100", date(1)).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_rating_pair_uniqueness() {
        let store = MemoryStore::new();
        let rating = Rating {
            id: 1,
            passenger_id: 7,
            flight_number: "AE100".to_string(),
            score: 4,
            comment: None,
            created_at: Utc::now(),
        };
        store.insert_rating_unique(&rating).await.unwrap();

        let second = Rating { id: 2, ..rating.clone() };
        let result = store.insert_rating_unique(&second).await;
        assert!(matches!(result, Err(StoreError::DuplicateRating { .. })));
        assert_eq!(store.max_rating_id().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_passport_uniqueness() {
        let store = MemoryStore::new();
        let passenger = Passenger {
            id: 1,
            passport: aerobook_core::ids::PassportNumber::parse("P123456789").unwrap(),
            full_name: "Ada Lovelace".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            country: "UK".to_string(),
        };
        store.insert_passenger(&passenger).await.unwrap();

        let same_passport = Passenger { id: 2, ..passenger.clone() };
        assert!(matches!(
            store.insert_passenger(&same_passport).await,
            Err(StoreError::DuplicatePassport(_))
        ));

        let same_id = Passenger {
            passport: aerobook_core::ids::PassportNumber::parse("Q987654321").unwrap(),
            ..passenger
        };
        assert!(matches!(
            store.insert_passenger(&same_id).await,
            Err(StoreError::DuplicateId(1))
        ));
    }

    #[tokio::test]
    async fn test_rating_aggregates_first_seen_order() {
        let store = MemoryStore::new();
        let base = Rating {
            id: 0,
            passenger_id: 1,
            flight_number: String::new(),
            score: 0,
            comment: None,
            created_at: Utc::now(),
        };
        for (id, flight_number, score) in [
            (1, "BB200", 5),
            (2, "AA100", 3),
            (3, "BB200", 1),
        ] {
            store
                .insert_rating_unique(&Rating {
                    id,
                    passenger_id: id,
                    flight_number: flight_number.to_string(),
                    score,
                    ..base.clone()
                })
                .await
                .unwrap();
        }

        let aggregates = store.rating_aggregates().await.unwrap();
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].flight_number, "BB200");
        assert_eq!(aggregates[0].ratings, 2);
        assert!((aggregates[0].avg_score - 3.0).abs() < f64::EPSILON);
        assert_eq!(aggregates[1].flight_number, "AA100");
    }
}
