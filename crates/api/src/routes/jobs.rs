use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use utoipa;

#[utoipa::path(
    get,
    path = "/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job ID")),
    responses((status = 200, description = "Job status", body = jobs::JobStatus))
)]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    let st = state.jobs.get(&id);
    Json(match st {
        None => serde_json::json!({"status": "not_found"}),
        Some(s) => serde_json::to_value(s).unwrap(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/jobs/{id}/result",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Per-profile scenario reports (if ready)", body = Vec<jobs::ScenarioReport>)
    )
)]
pub async fn result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    let st = state.jobs.get(&id);
    Json(match st {
        Some(jobs::JobStatus::Completed { reports }) => serde_json::to_value(reports).unwrap(),
        Some(_) => serde_json::json!({"status": "not_ready"}),
        None => serde_json::json!({"status": "not_found"}),
    })
}
