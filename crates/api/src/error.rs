use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Observation store contains no observations")]
    EmptyDataset,
    #[error("Malformed measurement row {id}: {reason}")]
    MalformedRow { id: i64, reason: String },
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("Observation store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
    #[error("Observation store query timed out after {0:?}")]
    StoreTimeout(Duration),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EmptyDataset => "empty_dataset",
            Error::MalformedRow { .. } => "malformed_row",
            Error::InvalidDateFormat(_) => "invalid_date_format",
            Error::StoreUnavailable(_) => "store_unavailable",
            Error::StoreTimeout(_) => "store_timeout",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidDateFormat(_) => StatusCode::BAD_REQUEST,
            Error::StoreUnavailable(_) | Error::StoreTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::EmptyDataset | Error::MalformedRow { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body returned for every failed API request
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
