use std::sync::Arc;

use aerobook_catalog::CatalogReader;
use aerobook_core::ids::PassportNumber;
use aerobook_core::model::Booking;
use aerobook_core::store::{BookingStore, StoreError};
use aerobook_core::{CoreError, CoreResult};
use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::idgen::ReferenceGenerator;
use crate::ledger::CapacityLedger;
use crate::passengers::PassengerRegistry;

/// Books seats. The caller has already picked a flight number (availability
/// is presented through the Query Service); this service validates the
/// request and drives the admission.
#[derive(Clone)]
pub struct BookingService {
    catalog: CatalogReader,
    passengers: PassengerRegistry,
    ledger: CapacityLedger,
    bookings: Arc<dyn BookingStore>,
    references: ReferenceGenerator,
    admission_retries: u32,
}

impl BookingService {
    pub fn new(
        catalog: CatalogReader,
        passengers: PassengerRegistry,
        ledger: CapacityLedger,
        bookings: Arc<dyn BookingStore>,
        references: ReferenceGenerator,
        admission_retries: u32,
    ) -> Self {
        Self {
            catalog,
            passengers,
            ledger,
            bookings,
            references,
            admission_retries: admission_retries.max(1),
        }
    }

    pub async fn book(
        &self,
        passport: &str,
        origin: &str,
        destination: &str,
        flight_number: &str,
        departure: NaiveDate,
    ) -> CoreResult<Booking> {
        // 1. Reject malformed passports before any store access.
        let passport = PassportNumber::parse(passport)?;

        // 2. Passenger must exist.
        let passenger = self.passengers.by_passport(passport.as_str()).await?;

        // 3. The route must be served, and the chosen flight must serve it.
        let route = self.catalog.route_flights(origin, destination).await?;
        if route.is_empty() {
            return Err(CoreError::NoSuchRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            });
        }
        if !route.iter().any(|f| f.flight_number == flight_number) {
            return Err(CoreError::UnknownFlight(flight_number.to_string()));
        }

        // 4. Mint a reference and admit; reservation and row write are one
        //    atomic unit inside the store. A reference that loses the
        //    constraint race is re-drawn, bounded.
        let mut collisions = 0;
        loop {
            let reference = self
                .references
                .next_booking_reference(self.bookings.as_ref())
                .await?;
            let booking = Booking {
                reference,
                departure,
                flight_number: flight_number.to_string(),
                passenger_id: passenger.id,
                created_at: Utc::now(),
            };
            match self.ledger.admit(&booking).await {
                Ok(()) => {
                    info!(
                        reference = %booking.reference,
                        flight_number,
                        departure = %departure,
                        passenger_id = passenger.id,
                        "booking confirmed"
                    );
                    return Ok(booking);
                }
                Err(StoreError::DuplicateReference(_)) => {
                    collisions += 1;
                    if collisions >= self.admission_retries {
                        return Err(CoreError::IdSpaceExhausted(format!(
                            "booking reference kept colliding after {} admissions",
                            collisions
                        )));
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
