use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use aerobook_catalog::CatalogReader;
use aerobook_core::reports::{
    AvailabilityRow, DestinationCount, DurationListing, FlightInfo, RouteScore,
};
use aerobook_core::store::QueryStore;
use aerobook_core::{CoreError, CoreResult};
use chrono::NaiveDate;
use tracing::warn;

/// Read-only aggregates. Everything here observes committed rows only; the
/// stores never expose bookings that are mid-admission.
#[derive(Clone)]
pub struct QueryService {
    catalog: CatalogReader,
    store: Arc<dyn QueryStore>,
}

impl QueryService {
    pub fn new(catalog: CatalogReader, store: Arc<dyn QueryStore>) -> Self {
        Self { catalog, store }
    }

    /// Top-k destinations by number of flights offered, ties broken by
    /// destination name.
    pub async fn popular_destinations(&self, k: usize) -> CoreResult<Vec<DestinationCount>> {
        require_positive(k, "k")?;
        let mut counts = self.store.destination_counts().await?;
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(k);
        Ok(counts
            .into_iter()
            .map(|(destination, flights)| DestinationCount {
                destination,
                flights,
            })
            .collect())
    }

    /// Top-k routes by average score, ties by rating count, then by the
    /// aggregation's insertion order (the sort is stable and the store
    /// emits aggregates in first-rating order).
    pub async fn highest_rated_routes(&self, k: usize) -> CoreResult<Vec<RouteScore>> {
        require_positive(k, "k")?;
        let aggregates = self.store.rating_aggregates().await?;
        let mut rows = Vec::with_capacity(aggregates.len());
        for aggregate in aggregates {
            let Some(flight) = self.catalog.find_flight(&aggregate.flight_number).await? else {
                warn!(
                    flight_number = %aggregate.flight_number,
                    "rated flight is missing from the catalog, skipping"
                );
                continue;
            };
            let Some(airline) = self.catalog.airline(flight.airline_id).await? else {
                warn!(
                    flight_number = %flight.flight_number,
                    airline_id = flight.airline_id,
                    "flight references a missing airline, skipping"
                );
                continue;
            };
            rows.push(RouteScore {
                airline: airline.name,
                flight_number: flight.flight_number,
                origin: flight.origin,
                destination: flight.destination,
                plane: flight.plane,
                avg_score: aggregate.avg_score,
                ratings: aggregate.ratings,
            });
        }
        rows.sort_by(|a, b| {
            b.avg_score
                .partial_cmp(&a.avg_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.ratings.cmp(&a.ratings))
        });
        rows.truncate(k);
        Ok(rows)
    }

    /// Flights between two airports, shortest first. Fewer rows than the
    /// limit is signalled, not an error.
    pub async fn flights_by_duration(
        &self,
        origin: &str,
        destination: &str,
        limit: usize,
    ) -> CoreResult<DurationListing> {
        require_positive(limit, "limit")?;
        let mut flights = self.catalog.flights_between(origin, destination).await?;
        flights.sort_by(|a, b| a.duration_minutes.cmp(&b.duration_minutes));
        let truncated = flights.len() > limit;
        flights.truncate(limit);
        Ok(DurationListing { flights, truncated })
    }

    /// The catalog listing between two airports, unordered beyond flight
    /// number.
    pub async fn flights_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> CoreResult<Vec<FlightInfo>> {
        self.catalog.flights_between(origin, destination).await
    }

    /// Seats still available per flight on a departure date, committed
    /// bookings only, flights with nothing left omitted.
    pub async fn availability_report(&self, date: NaiveDate) -> CoreResult<Vec<AvailabilityRow>> {
        let booked: HashMap<String, i64> =
            self.store.booked_counts_on(date).await?.into_iter().collect();
        let mut rows = Vec::new();
        for flight in self.catalog.all_flights().await? {
            let sold = booked.get(&flight.flight_number).copied().unwrap_or(0);
            let available = i64::from(flight.seats) - sold;
            if available > 0 {
                rows.push(AvailabilityRow {
                    flight_number: flight.flight_number,
                    origin: flight.origin,
                    destination: flight.destination,
                    booked: sold,
                    capacity: flight.seats,
                    available,
                });
            }
        }
        rows.sort_by(|a, b| {
            a.origin
                .cmp(&b.origin)
                .then_with(|| a.destination.cmp(&b.destination))
        });
        Ok(rows)
    }
}

fn require_positive(value: usize, name: &str) -> CoreResult<()> {
    if value < 1 {
        return Err(CoreError::Validation(format!(
            "{} must be at least 1",
            name
        )));
    }
    Ok(())
}
