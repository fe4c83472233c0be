use std::sync::Arc;

use aerobook_core::model::{Airline, Flight};
use aerobook_core::reports::FlightInfo;
use aerobook_core::store::CatalogStore;
use aerobook_core::{CoreError, CoreResult};
use tracing::warn;

/// Read-only access to the flight/airline catalog. Supplies seat capacity
/// and schedule facts to the ledger and the services; never writes.
#[derive(Clone)]
pub struct CatalogReader {
    store: Arc<dyn CatalogStore>,
}

impl CatalogReader {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn flight(&self, flight_number: &str) -> CoreResult<Flight> {
        self.find_flight(flight_number)
            .await?
            .ok_or_else(|| CoreError::UnknownFlight(flight_number.to_string()))
    }

    /// Lookup that leaves the missing-flight decision to the caller.
    pub async fn find_flight(&self, flight_number: &str) -> CoreResult<Option<Flight>> {
        Ok(self.store.flight_by_number(flight_number).await?)
    }

    pub async fn seat_capacity(&self, flight_number: &str) -> CoreResult<i32> {
        Ok(self.flight(flight_number).await?.seats)
    }

    /// Flights serving (origin, destination). Empty is not an error here;
    /// callers decide whether an empty route is a rejection.
    pub async fn route_flights(
        &self,
        origin: &str,
        destination: &str,
    ) -> CoreResult<Vec<Flight>> {
        Ok(self.store.flights_between(origin, destination).await?)
    }

    pub async fn airline(&self, airline_id: i64) -> CoreResult<Option<Airline>> {
        Ok(self.store.airline_by_id(airline_id).await?)
    }

    pub async fn all_flights(&self) -> CoreResult<Vec<Flight>> {
        Ok(self.store.all_flights().await?)
    }

    /// The catalog listing between two airports, joined with airline names.
    /// Flights whose airline row is missing are skipped, not fatal.
    pub async fn flights_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> CoreResult<Vec<FlightInfo>> {
        let flights = self.store.flights_between(origin, destination).await?;
        let mut listing = Vec::with_capacity(flights.len());
        for flight in flights {
            match self.store.airline_by_id(flight.airline_id).await? {
                Some(airline) => listing.push(FlightInfo {
                    airline: airline.name,
                    flight_number: flight.flight_number,
                    origin: flight.origin,
                    destination: flight.destination,
                    plane: flight.plane,
                    duration_minutes: flight.duration_minutes,
                }),
                None => {
                    warn!(
                        flight_number = %flight.flight_number,
                        airline_id = flight.airline_id,
                        "flight references a missing airline, skipping"
                    );
                }
            }
        }
        Ok(listing)
    }
}
