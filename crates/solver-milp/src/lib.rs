pub mod extract;
pub mod model;
pub mod solve;

use assign_core::{validate, PreferenceMatrix, SolveError, Solver};
use async_trait::async_trait;
use tracing::info;
use types::{SolveEnvelope, SolveResult};

pub use solve::RawSolverResult;

pub struct MilpSolver;

impl MilpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MilpSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Solver for MilpSolver {
    async fn solve(&self, env: SolveEnvelope) -> Result<SolveResult, SolveError> {
        info!(
            profile = %env.profile,
            persons = env.instance.persons.len(),
            courses = env.instance.courses.len(),
            sites = env.instance.sites.len(),
            "building model"
        );

        validate(&env.instance)?;
        let matrix = PreferenceMatrix::from_instance(&env.instance)?;
        let inst = model::build_model(&matrix, env.profile);

        if inst.selects.is_empty() {
            let pairs = matrix.num_persons() * matrix.num_courses();
            if env.profile.attendance_mandatory() && pairs > 0 {
                // Every pair must attend somewhere, and there is nowhere.
                return Err(SolveError::Infeasible);
            }
            return Ok(SolveResult {
                objective: 0.0,
                selected: vec![],
                active_sites: vec![],
                stats: serde_json::json!({
                    "method": "milp",
                    "note": "empty variable set",
                    "profile": env.profile.as_str(),
                }),
            });
        }

        let raw = solve::solve_model(&inst, &env.params);
        let mut result = extract::extract_solution(&raw, &inst, &matrix)?;
        result.stats = serde_json::json!({
            "method": "milp",
            "profile": env.profile.as_str(),
            "vars": inst.num_vars,
            "constraints": inst.constraints.len(),
            "siteVars": inst.site_used.len(),
        });
        info!(
            profile = %env.profile,
            objective = result.objective,
            selected = result.selected.len(),
            "model solved"
        );
        Ok(result)
    }
}
