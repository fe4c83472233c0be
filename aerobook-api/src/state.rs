use std::sync::Arc;

use aerobook_booking::ReservationEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReservationEngine>,
}
