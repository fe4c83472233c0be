use aerobook_core::CoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Core(err) => {
                let status = match &err {
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    CoreError::UnknownPassenger(_)
                    | CoreError::UnknownFlight(_)
                    | CoreError::NoSuchRoute { .. } => StatusCode::NOT_FOUND,
                    CoreError::CapacityExceeded { .. }
                    | CoreError::NotFlown { .. }
                    | CoreError::AlreadyRated { .. }
                    | CoreError::DuplicatePassport(_) => StatusCode::CONFLICT,
                    CoreError::Busy(_) => StatusCode::SERVICE_UNAVAILABLE,
                    CoreError::Unavailable(_) => {
                        tracing::error!("Persistence unavailable: {}", err);
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    CoreError::IdSpaceExhausted(_) => {
                        tracing::error!("Identifier generator exhausted: {}", err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

/// Dates cross the HTTP boundary as `YYYY-MM-DD`; anything that does not
/// name a real calendar day is rejected before any query runs.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "not a valid calendar date: {}",
            raw
        )))
    })
}
