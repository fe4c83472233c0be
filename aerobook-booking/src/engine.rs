use std::sync::Arc;

use aerobook_catalog::CatalogReader;
use aerobook_core::command::{Command, Outcome};
use aerobook_core::model::{Booking, Passenger, Rating};
use aerobook_core::reports::{
    AvailabilityRow, DestinationCount, DurationListing, FlightInfo, RouteScore, SeatAvailability,
};
use aerobook_core::store::{
    BookingStore, CatalogStore, PassengerStore, QueryStore, RatingStore,
};
use aerobook_core::CoreResult;
use chrono::NaiveDate;

use crate::booking::BookingService;
use crate::idgen::ReferenceGenerator;
use crate::ledger::CapacityLedger;
use crate::passengers::PassengerRegistry;
use crate::queries::QueryService;
use crate::rating::RatingService;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub reference_attempts: u32,
    pub admission_retries: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reference_attempts: 16,
            admission_retries: 3,
        }
    }
}

/// Wires the services over the store seams and dispatches the typed
/// command set. Handlers may also call the typed methods directly.
#[derive(Clone)]
pub struct ReservationEngine {
    passengers: PassengerRegistry,
    bookings: BookingService,
    ratings: RatingService,
    queries: QueryService,
    ledger: CapacityLedger,
}

impl ReservationEngine {
    pub fn new(
        catalog_store: Arc<dyn CatalogStore>,
        passenger_store: Arc<dyn PassengerStore>,
        booking_store: Arc<dyn BookingStore>,
        rating_store: Arc<dyn RatingStore>,
        query_store: Arc<dyn QueryStore>,
        settings: EngineSettings,
    ) -> Self {
        let catalog = CatalogReader::new(catalog_store);
        let passengers = PassengerRegistry::new(passenger_store);
        let ledger = CapacityLedger::new(catalog.clone(), booking_store.clone());
        let references = ReferenceGenerator::new(settings.reference_attempts);
        let bookings = BookingService::new(
            catalog.clone(),
            passengers.clone(),
            ledger.clone(),
            booking_store.clone(),
            references,
            settings.admission_retries,
        );
        let ratings = RatingService::new(
            catalog.clone(),
            passengers.clone(),
            booking_store,
            rating_store,
        );
        let queries = QueryService::new(catalog, query_store);
        Self {
            passengers,
            bookings,
            ratings,
            queries,
            ledger,
        }
    }

    pub async fn create_passenger(
        &self,
        passport: &str,
        full_name: &str,
        birth_date: NaiveDate,
        country: &str,
    ) -> CoreResult<Passenger> {
        self.passengers
            .create(passport, full_name, birth_date, country)
            .await
    }

    pub async fn book(
        &self,
        passport: &str,
        origin: &str,
        destination: &str,
        flight_number: &str,
        departure: NaiveDate,
    ) -> CoreResult<Booking> {
        self.bookings
            .book(passport, origin, destination, flight_number, departure)
            .await
    }

    pub async fn rate(
        &self,
        passenger_id: i64,
        flight_number: &str,
        score: i16,
        comment: Option<String>,
    ) -> CoreResult<Rating> {
        self.ratings
            .rate(passenger_id, flight_number, score, comment)
            .await
    }

    pub async fn popular_destinations(&self, k: usize) -> CoreResult<Vec<DestinationCount>> {
        self.queries.popular_destinations(k).await
    }

    pub async fn highest_rated_routes(&self, k: usize) -> CoreResult<Vec<RouteScore>> {
        self.queries.highest_rated_routes(k).await
    }

    pub async fn flights_by_duration(
        &self,
        origin: &str,
        destination: &str,
        limit: usize,
    ) -> CoreResult<DurationListing> {
        self.queries
            .flights_by_duration(origin, destination, limit)
            .await
    }

    pub async fn availability_report(&self, date: NaiveDate) -> CoreResult<Vec<AvailabilityRow>> {
        self.queries.availability_report(date).await
    }

    pub async fn flights_between(
        &self,
        origin: &str,
        destination: &str,
    ) -> CoreResult<Vec<FlightInfo>> {
        self.queries.flights_between(origin, destination).await
    }

    pub async fn seats_available(
        &self,
        flight_number: &str,
        departure: NaiveDate,
    ) -> CoreResult<SeatAvailability> {
        let available = self.ledger.available_seats(flight_number, departure).await?;
        Ok(SeatAvailability {
            flight_number: flight_number.to_string(),
            departure,
            available,
        })
    }

    pub async fn execute(&self, command: Command) -> CoreResult<Outcome> {
        match command {
            Command::CreatePassenger {
                passport,
                full_name,
                birth_date,
                country,
            } => self
                .create_passenger(&passport, &full_name, birth_date, &country)
                .await
                .map(Outcome::PassengerCreated),
            Command::BookFlight {
                passport,
                origin,
                destination,
                flight_number,
                departure,
            } => self
                .book(&passport, &origin, &destination, &flight_number, departure)
                .await
                .map(Outcome::Booked),
            Command::RateFlight {
                passenger_id,
                flight_number,
                score,
                comment,
            } => self
                .rate(passenger_id, &flight_number, score, comment)
                .await
                .map(Outcome::Rated),
            Command::ListPopularDestinations { k } => self
                .popular_destinations(k)
                .await
                .map(Outcome::PopularDestinations),
            Command::ListHighestRatedRoutes { k } => self
                .highest_rated_routes(k)
                .await
                .map(Outcome::HighestRatedRoutes),
            Command::ListFlightsByDuration {
                origin,
                destination,
                limit,
            } => self
                .flights_by_duration(&origin, &destination, limit)
                .await
                .map(Outcome::FlightsByDuration),
            Command::AvailabilityReport { date } => self
                .availability_report(date)
                .await
                .map(Outcome::Availability),
            Command::ListFlights {
                origin,
                destination,
            } => self
                .flights_between(&origin, &destination)
                .await
                .map(Outcome::Flights),
            Command::SeatsAvailable {
                flight_number,
                departure,
            } => self
                .seats_available(&flight_number, departure)
                .await
                .map(Outcome::SeatsAvailable),
        }
    }
}
