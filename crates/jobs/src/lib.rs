use assign_core::{scenario, SolveError, Solver};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::error;
use types::{ConstraintProfile, ScenarioRequest, SolveResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

/// Per-profile outcome within a completed scenario job. Infeasibility is a
/// reportable outcome of a profile, not a job failure.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProfileOutcome {
    Solved { result: SolveResult },
    Infeasible,
    Failed { message: String },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ScenarioReport {
    pub profile: ConstraintProfile,
    #[serde(flatten)]
    pub outcome: ProfileOutcome,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status")]
pub enum JobStatus {
    Queued,
    Running,
    Completed { reports: Vec<ScenarioReport> },
    Failed { message: String },
}

fn outcome_of(res: Result<SolveResult, SolveError>) -> ProfileOutcome {
    match res {
        Ok(result) => ProfileOutcome::Solved { result },
        Err(SolveError::Infeasible) => ProfileOutcome::Infeasible,
        Err(e) => ProfileOutcome::Failed {
            message: e.to_string(),
        },
    }
}

#[derive(Clone)]
pub struct InMemJobs<S: Solver> {
    inner: std::sync::Arc<RwLock<HashMap<String, JobStatus>>>,
    solver: std::sync::Arc<S>,
}

impl<S: Solver> InMemJobs<S> {
    pub fn new(solver: S) -> Self {
        Self {
            inner: Default::default(),
            solver: std::sync::Arc::new(solver),
        }
    }

    pub fn enqueue(&self, req: ScenarioRequest) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), JobStatus::Queued);

        let map = self.inner.clone();
        let solver = self.solver.clone();
        let id_for_task = id.clone();

        tokio::spawn(async move {
            {
                let mut w = map.write();
                w.insert(id_for_task.clone(), JobStatus::Running);
            }
            let results = scenario::run_profiles(
                solver.as_ref(),
                &req.instance,
                &req.profiles,
                &req.params,
            )
            .await;
            let reports: Vec<ScenarioReport> = results
                .into_iter()
                .map(|(profile, res)| {
                    if let Err(e) = &res {
                        error!(%profile, error = %e, "profile run failed");
                    }
                    ScenarioReport {
                        profile,
                        outcome: outcome_of(res),
                    }
                })
                .collect();
            map.write()
                .insert(id_for_task, JobStatus::Completed { reports });
        });

        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().get(id).cloned()
    }
}
