use crate::{SolveError, Solver};
use tracing::info;
use types::{ConstraintProfile, Instance, SolveEnvelope, SolveParams, SolveResult};

/// Outcome of one profile's independent solve within a scenario run.
pub type ProfileResult = (ConstraintProfile, Result<SolveResult, SolveError>);

/// Runs the build → solve → extract pipeline once per requested profile.
/// Each run owns its own model; a failure under one profile (including
/// infeasibility) is recorded against that profile and does not stop the
/// remaining runs.
pub async fn run_profiles<S: Solver>(
    solver: &S,
    instance: &Instance,
    profiles: &[ConstraintProfile],
    params: &SolveParams,
) -> Vec<ProfileResult> {
    let mut results = Vec::with_capacity(profiles.len());
    for &profile in profiles {
        let env = SolveEnvelope {
            instance: instance.clone(),
            profile,
            params: params.clone(),
        };
        let res = solver.solve(env).await;
        match &res {
            Ok(r) => info!(%profile, objective = r.objective, selected = r.selected.len(), "profile solved"),
            Err(e) => info!(%profile, error = %e, "profile not solved"),
        }
        results.push((profile, res));
    }
    results
}
