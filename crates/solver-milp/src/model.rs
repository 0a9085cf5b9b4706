use assign_core::PreferenceMatrix;
use serde::{Deserialize, Serialize};
use types::ConstraintProfile;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct VarId(pub usize);

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinTerm {
    pub var: VarId,
    pub coeff: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Leq,
    Geq,
    Eq,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinConstraint {
    pub terms: Vec<LinTerm>,
    pub op: CmpOp,
    pub rhs: f64,
}

/// One Select[p,c,s] decision variable, with the matrix indices needed to
/// decode a raw solution back into a triple.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SelectVar {
    pub p: usize,
    pub c: usize,
    pub s: usize,
    pub var: VarId,
}

/// One SiteUsed[s] flag, present only under the consolidation profiles.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SiteVar {
    pub s: usize,
    pub var: VarId,
}

/// A complete MILP instance: every variable binary, the objective maximized.
/// Built fresh per solve, handed wholesale to the engine, never mutated
/// afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MilpInstance {
    pub num_vars: usize,
    pub objective: Vec<LinTerm>,
    pub constraints: Vec<LinConstraint>,
    pub selects: Vec<SelectVar>,
    pub site_used: Vec<SiteVar>,
}

impl MilpInstance {
    fn new_var(&mut self) -> VarId {
        let v = VarId(self.num_vars);
        self.num_vars += 1;
        v
    }
}

/// The per-(person, course) attendance rule is the only thing the base
/// constraint set varies on: at most one site, or exactly one.
fn attendance_op(profile: ConstraintProfile) -> CmpOp {
    if profile.attendance_mandatory() {
        CmpOp::Eq
    } else {
        CmpOp::Leq
    }
}

/// Builds the MILP instance for one profile. Pure function of its inputs;
/// the three profiles share the variable and objective layout and differ
/// only in which constraint rules fire.
pub fn build_model(matrix: &PreferenceMatrix, profile: ConstraintProfile) -> MilpInstance {
    let mut inst = MilpInstance {
        num_vars: 0,
        objective: Vec::new(),
        constraints: Vec::new(),
        selects: Vec::new(),
        site_used: Vec::new(),
    };

    declare_select_vars(&mut inst, matrix);
    build_objective(&mut inst, matrix);
    add_attendance_constraints(&mut inst, matrix, attendance_op(profile));
    if profile.consolidates_sites() {
        declare_site_vars(&mut inst, matrix);
        add_site_linking_constraints(&mut inst, matrix);
        add_site_cap_constraint(&mut inst);
    }
    inst
}

fn declare_select_vars(inst: &mut MilpInstance, matrix: &PreferenceMatrix) {
    for p in 0..matrix.num_persons() {
        for c in 0..matrix.num_courses() {
            for s in 0..matrix.num_sites() {
                let var = inst.new_var();
                inst.selects.push(SelectVar { p, c, s, var });
            }
        }
    }
}

fn build_objective(inst: &mut MilpInstance, matrix: &PreferenceMatrix) {
    let MilpInstance {
        selects, objective, ..
    } = inst;
    for sv in selects.iter() {
        let coeff = matrix.score(sv.p, sv.c, sv.s);
        if coeff != 0.0 {
            objective.push(LinTerm {
                var: sv.var,
                coeff,
            });
        }
    }
}

fn add_attendance_constraints(inst: &mut MilpInstance, matrix: &PreferenceMatrix, op: CmpOp) {
    for p in 0..matrix.num_persons() {
        for c in 0..matrix.num_courses() {
            let terms: Vec<LinTerm> = inst
                .selects
                .iter()
                .filter(|sv| sv.p == p && sv.c == c)
                .map(|sv| LinTerm {
                    var: sv.var,
                    coeff: 1.0,
                })
                .collect();
            inst.constraints.push(LinConstraint {
                terms,
                op,
                rhs: 1.0,
            });
        }
    }
}

fn declare_site_vars(inst: &mut MilpInstance, matrix: &PreferenceMatrix) {
    for s in 0..matrix.num_sites() {
        let var = inst.new_var();
        inst.site_used.push(SiteVar { s, var });
    }
}

/// Σ_{p,c} Select[p,c,s] − |P|·|C|·SiteUsed[s] ≤ 0: any assignment at a
/// site forces its flag on.
fn add_site_linking_constraints(inst: &mut MilpInstance, matrix: &PreferenceMatrix) {
    let big_m = (matrix.num_persons() * matrix.num_courses()) as f64;
    let MilpInstance {
        selects,
        constraints,
        site_used,
        ..
    } = inst;
    for su in site_used.iter() {
        let mut terms: Vec<LinTerm> = selects
            .iter()
            .filter(|sv| sv.s == su.s)
            .map(|sv| LinTerm {
                var: sv.var,
                coeff: 1.0,
            })
            .collect();
        terms.push(LinTerm {
            var: su.var,
            coeff: -big_m,
        });
        constraints.push(LinConstraint {
            terms,
            op: CmpOp::Leq,
            rhs: 0.0,
        });
    }
}

/// Σ_s SiteUsed[s] ≤ 1: at most one active site system-wide.
fn add_site_cap_constraint(inst: &mut MilpInstance) {
    let terms: Vec<LinTerm> = inst
        .site_used
        .iter()
        .map(|su| LinTerm {
            var: su.var,
            coeff: 1.0,
        })
        .collect();
    inst.constraints.push(LinConstraint {
        terms,
        op: CmpOp::Leq,
        rhs: 1.0,
    });
}
