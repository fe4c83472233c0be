use std::sync::Arc;

use aerobook_catalog::CatalogReader;
use aerobook_core::model::Booking;
use aerobook_core::store::{BookingStore, StoreError};
use aerobook_core::CoreResult;
use chrono::NaiveDate;

/// The writer-arbiter for bookings: every seat admission goes through
/// [`admit`], which delegates to the store's atomic check-and-insert
/// primitive. There is no other mutation path for the booking set.
///
/// [`admit`]: CapacityLedger::admit
#[derive(Clone)]
pub struct CapacityLedger {
    catalog: CatalogReader,
    bookings: Arc<dyn BookingStore>,
}

impl CapacityLedger {
    pub fn new(catalog: CatalogReader, bookings: Arc<dyn BookingStore>) -> Self {
        Self { catalog, bookings }
    }

    /// Capacity minus committed bookings for (flight, date). A snapshot:
    /// the value can go stale the moment it is returned, which is why
    /// admission re-checks under its own lock.
    pub async fn available_seats(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> CoreResult<i64> {
        let capacity = self.catalog.seat_capacity(flight_number).await?;
        let sold = self.bookings.booking_count(flight_number, date).await?;
        Ok(i64::from(capacity) - sold)
    }

    /// Atomically convert "a seat is free" into a persisted booking row.
    /// Returns the raw store error so the caller can distinguish a
    /// reference collision (re-draw) from capacity exhaustion (reject).
    pub async fn admit(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings.insert_booking_admitted(booking).await
    }
}
