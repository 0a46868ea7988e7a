use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::RecordId;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Fetch(#[from] FetchFailure),
    #[error("no trip is loaded")]
    NotLoaded,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) | AppError::Io(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Fetch(failure) => failure.status_hint(),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotLoaded => StatusCode::CONFLICT,
        };

        (status, self.to_string()).into_response()
    }
}

/// The remote call that was attempted, with the ids it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ListTrips,
    GetTrip {
        trip_id: RecordId,
    },
    CreateTrip,
    AddMeeting {
        trip_id: RecordId,
    },
    DeleteMeeting {
        trip_id: RecordId,
        meeting_id: RecordId,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListTrips => f.write_str("fetch trips"),
            Operation::GetTrip { trip_id } => write!(f, "fetch trip with id {trip_id}"),
            Operation::CreateTrip => f.write_str("create trip"),
            Operation::AddMeeting { trip_id } => write!(f, "add meeting to trip {trip_id}"),
            Operation::DeleteMeeting {
                trip_id,
                meeting_id,
            } => write!(f, "delete meeting with id {meeting_id} from trip {trip_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchCause {
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {operation}: {cause}")]
pub struct FetchFailure {
    pub operation: Operation,
    pub cause: FetchCause,
}

impl FetchFailure {
    pub fn new(operation: Operation, cause: FetchCause) -> Self {
        Self { operation, cause }
    }

    /// Trip the failed call was aimed at, if it had one.
    pub fn target(&self) -> Option<&RecordId> {
        match &self.operation {
            Operation::ListTrips | Operation::CreateTrip => None,
            Operation::GetTrip { trip_id }
            | Operation::AddMeeting { trip_id }
            | Operation::DeleteMeeting { trip_id, .. } => Some(trip_id),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.cause == FetchCause::Status(404)
    }

    pub fn status_hint(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_GATEWAY
        }
    }
}
