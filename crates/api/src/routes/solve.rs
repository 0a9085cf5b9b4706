use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use types::ScenarioRequest;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

#[derive(Deserialize)]
pub struct SolveQuery {
    /// Comma-separated profile names, overriding the body's profile list.
    pub profiles: Option<String>,
}

#[utoipa::path(
    post,
    path = "/v1/solve",
    request_body = ScenarioRequest,
    params(
        ("profiles" = Option<String>, Query, description = "Comma-separated constraint profile names")
    ),
    responses(
        (status = 200, description = "Scenario job enqueued", body = JobCreated),
        (status = 400, description = "Invalid instance or profile name")
    )
)]
pub async fn solve(
    State(state): State<AppState>,
    Query(query): Query<SolveQuery>,
    Json(mut req): Json<ScenarioRequest>,
) -> Result<Json<JobCreated>, ApiError> {
    assign_core::validate(&req.instance)?;
    if let Some(names) = &query.profiles {
        req.profiles = names
            .split(',')
            .map(|n| assign_core::parse_profile(n.trim()))
            .collect::<Result<Vec<_>, _>>()?;
    }
    if req.profiles.is_empty() {
        return Err(ApiError::bad_request("profiles is empty"));
    }
    let id = state.jobs.enqueue(req);
    Ok(Json(JobCreated {
        job_id: id.0,
        status: "queued",
    }))
}
