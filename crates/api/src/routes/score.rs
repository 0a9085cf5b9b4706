use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use assign_core::scoring::recompute_scores;
use types::{Instance, SelectedAssignment, SiteId};

#[derive(Deserialize, ToSchema)]
pub struct ScoreIn {
    pub instance: Instance,
    pub selected: Vec<SelectedAssignment>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOut {
    pub preference_total: f64,
    pub selected_count: usize,
    pub per_site: std::collections::HashMap<String, u32>,
    pub active_sites: Vec<SiteId>,
}

#[utoipa::path(
    post,
    path = "/v1/score",
    request_body = ScoreIn,
    responses(
        (status = 200, description = "Recomputed preference totals for a provided assignment", body = ScoreOut),
        (status = 400, description = "Invalid instance")
    )
)]
pub async fn score(Json(input): Json<ScoreIn>) -> Result<Json<ScoreOut>, ApiError> {
    assign_core::validate(&input.instance)?;
    let s = recompute_scores(&input.instance, &input.selected);
    Ok(Json(ScoreOut {
        preference_total: s.preference_total,
        selected_count: s.selected_count,
        per_site: s.per_site,
        active_sites: s.active_sites,
    }))
}
