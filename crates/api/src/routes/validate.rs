use assign_core::{validate, PreferenceMatrix, SolveError, ValidationError};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use types::Instance;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = Instance,
    responses(
        (status = 200, description = "Validation result", body = ValidationReport)
    )
)]
pub async fn validate_handler(Json(inst): Json<Instance>) -> (StatusCode, Json<ValidationReport>) {
    let mut errors: Vec<String> = Vec::new();
    if let Err(ValidationError::Msg(msg)) = validate(&inst) {
        errors.extend(
            msg.split(';')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
    }
    // Coverage is checked even when id-level validation failed, so the
    // caller sees both classes of problem in one round trip.
    if let Err(e @ SolveError::IncompleteMatrix { .. }) = PreferenceMatrix::from_instance(&inst) {
        errors.push(e.to_string());
    }
    (
        StatusCode::OK,
        Json(ValidationReport {
            ok: errors.is_empty(),
            errors,
        }),
    )
}
