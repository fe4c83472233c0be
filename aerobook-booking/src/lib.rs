pub mod booking;
pub mod engine;
pub mod idgen;
pub mod ledger;
pub mod passengers;
pub mod queries;
pub mod rating;

pub use engine::{EngineSettings, ReservationEngine};
