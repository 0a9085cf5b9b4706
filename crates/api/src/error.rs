use assign_core::{SolveError, ValidationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<SolveError> for ApiError {
    fn from(e: SolveError) -> Self {
        let status = match &e {
            // Caller / data-preparation bugs.
            SolveError::Invalid(_)
            | SolveError::InvalidProfile(_)
            | SolveError::IncompleteMatrix { .. } => StatusCode::BAD_REQUEST,
            // A legitimate outcome of the constraints, not a server fault.
            SolveError::Infeasible => StatusCode::UNPROCESSABLE_ENTITY,
            SolveError::Solver(_) | SolveError::SolutionMismatch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
