use crate::model::{CmpOp, MilpInstance};
use good_lp::{default_solver, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable};
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::{SolveParams, SolverStatus};

/// What the engine handed back for one solve call: terminal status plus,
/// when optimal, the objective value and the final value of every variable
/// (indexed by `VarId`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSolverResult {
    pub status: SolverStatus,
    pub objective: f64,
    pub values: Vec<f64>,
    pub message: Option<String>,
}

/// Submits the instance to CBC and maps the engine's outcome onto the
/// status taxonomy. The time limit is handed to the engine itself; an
/// expired limit comes back as an engine fault, never as infeasibility.
/// No retries happen here under any outcome.
pub fn solve_model(inst: &MilpInstance, params: &SolveParams) -> RawSolverResult {
    let mut pvars = ProblemVariables::new();
    let vars: Vec<Variable> = (0..inst.num_vars)
        .map(|_| pvars.add(good_lp::variable().binary()))
        .collect();

    let mut objective = Expression::from(0.0);
    for t in &inst.objective {
        objective = objective + t.coeff * vars[t.var.0];
    }

    let mut model = pvars.maximise(objective.clone()).using(default_solver);
    model.set_parameter("log", "0");
    model.set_parameter("seconds", &params.time_limit_sec.to_string());

    for c in &inst.constraints {
        let mut lhs = Expression::from(0.0);
        for t in &c.terms {
            lhs = lhs + t.coeff * vars[t.var.0];
        }
        model = match c.op {
            CmpOp::Leq => model.with(lhs.leq(c.rhs)),
            CmpOp::Geq => model.with(lhs.geq(c.rhs)),
            CmpOp::Eq => model.with(lhs.eq(c.rhs)),
        };
    }

    debug!(
        vars = inst.num_vars,
        constraints = inst.constraints.len(),
        "submitting model to engine"
    );

    match model.solve() {
        Ok(sol) => RawSolverResult {
            status: SolverStatus::Optimal,
            objective: sol.eval(objective.clone()),
            values: vars.iter().map(|&v| sol.value(v)).collect(),
            message: None,
        },
        Err(ResolutionError::Infeasible) => RawSolverResult {
            status: SolverStatus::Infeasible,
            objective: 0.0,
            values: Vec::new(),
            message: None,
        },
        Err(ResolutionError::Unbounded) => RawSolverResult {
            status: SolverStatus::Unbounded,
            objective: 0.0,
            values: Vec::new(),
            message: None,
        },
        Err(e) => RawSolverResult {
            status: SolverStatus::SolverError,
            objective: 0.0,
            values: Vec::new(),
            message: Some(e.to_string()),
        },
    }
}
