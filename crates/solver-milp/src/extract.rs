use crate::model::MilpInstance;
use crate::solve::RawSolverResult;
use assign_core::{PreferenceMatrix, SolveError};
use types::{SelectedAssignment, SiteId, SolveResult, SolverStatus};

const VALUE_TOLERANCE: f64 = 1e-6;

/// Decodes a raw engine result into an assignment solution. Anything short
/// of a clean optimum is propagated as the matching error; no rounding of
/// fractional values, no degraded solutions.
pub fn extract_solution(
    raw: &RawSolverResult,
    inst: &MilpInstance,
    matrix: &PreferenceMatrix,
) -> Result<SolveResult, SolveError> {
    match raw.status {
        SolverStatus::Optimal => {}
        SolverStatus::Infeasible => return Err(SolveError::Infeasible),
        SolverStatus::Unbounded => {
            return Err(SolveError::Solver("engine reported an unbounded model".into()))
        }
        SolverStatus::SolverError => {
            return Err(SolveError::Solver(
                raw.message.clone().unwrap_or_else(|| "unknown engine fault".into()),
            ))
        }
    }

    let mut selected = Vec::new();
    for sv in &inst.selects {
        let value = *raw.values.get(sv.var.0).ok_or_else(|| {
            SolveError::Solver(format!("engine returned no value for variable {}", sv.var.0))
        })?;
        let is_one = (value - 1.0).abs() <= VALUE_TOLERANCE;
        if !is_one && value.abs() > VALUE_TOLERANCE {
            return Err(SolveError::Solver(format!(
                "non-binary value {value} for Select[{}, {}, {}]",
                matrix.person(sv.p),
                matrix.course(sv.c),
                matrix.site(sv.s)
            )));
        }
        if is_one {
            selected.push(SelectedAssignment {
                person_id: matrix.person(sv.p).clone(),
                course_id: matrix.course(sv.c).clone(),
                site_id: matrix.site(sv.s).clone(),
                score: matrix.score(sv.p, sv.c, sv.s),
            });
        }
    }

    let recomputed: f64 = selected.iter().map(|a| a.score).sum();
    let tolerance = VALUE_TOLERANCE * recomputed.abs().max(1.0);
    if (raw.objective - recomputed).abs() > tolerance {
        return Err(SolveError::SolutionMismatch {
            reported: raw.objective,
            recomputed,
        });
    }

    let mut active_sites: Vec<SiteId> = Vec::new();
    for s in 0..matrix.num_sites() {
        let site = matrix.site(s);
        if selected.iter().any(|a| &a.site_id == site) {
            active_sites.push(site.clone());
        }
    }

    Ok(SolveResult {
        objective: raw.objective,
        selected,
        active_sites,
        stats: serde_json::Value::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_model;
    use types::{ConstraintProfile, CourseId, Instance, PersonId, PreferenceEntry, SolverStatus};

    fn small_matrix() -> PreferenceMatrix {
        // 1 person, 2 courses, 2 sites; scores 2, 1, 0, 3 in row-major
        // (course, site) order.
        let persons = vec![PersonId("p1".into())];
        let courses = vec![CourseId("c1".into()), CourseId("c2".into())];
        let sites = vec![SiteId("s1".into()), SiteId("s2".into())];
        let scores = [2.0, 1.0, 0.0, 3.0];
        let mut preferences = Vec::new();
        let mut k = 0;
        for c in &courses {
            for s in &sites {
                preferences.push(PreferenceEntry {
                    person_id: persons[0].clone(),
                    course_id: c.clone(),
                    site_id: s.clone(),
                    score: scores[k],
                });
                k += 1;
            }
        }
        PreferenceMatrix::from_instance(&Instance {
            persons,
            courses,
            sites,
            preferences,
        })
        .unwrap()
    }

    fn optimal(values: Vec<f64>, objective: f64) -> RawSolverResult {
        RawSolverResult {
            status: SolverStatus::Optimal,
            objective,
            values,
            message: None,
        }
    }

    #[test]
    fn decodes_selected_triples_with_scores() {
        let m = small_matrix();
        let inst = build_model(&m, ConstraintProfile::Unrestricted);
        // Select (c1, s1) and (c2, s2): objective 2 + 3.
        let raw = optimal(vec![1.0, 0.0, 0.0, 1.0], 5.0);
        let result = extract_solution(&raw, &inst, &m).unwrap();
        assert_eq!(result.objective, 5.0);
        assert_eq!(result.selected.len(), 2);
        assert_eq!(result.selected[0].score, 2.0);
        assert_eq!(result.selected[1].score, 3.0);
        assert_eq!(
            result.active_sites,
            vec![SiteId("s1".into()), SiteId("s2".into())]
        );
    }

    #[test]
    fn infeasible_status_propagates() {
        let m = small_matrix();
        let inst = build_model(&m, ConstraintProfile::SingleSiteMandatory);
        let raw = RawSolverResult {
            status: SolverStatus::Infeasible,
            objective: 0.0,
            values: vec![],
            message: None,
        };
        assert!(matches!(
            extract_solution(&raw, &inst, &m),
            Err(SolveError::Infeasible)
        ));
    }

    #[test]
    fn engine_fault_keeps_its_message() {
        let m = small_matrix();
        let inst = build_model(&m, ConstraintProfile::Unrestricted);
        let raw = RawSolverResult {
            status: SolverStatus::SolverError,
            objective: 0.0,
            values: vec![],
            message: Some("time limit reached".into()),
        };
        match extract_solution(&raw, &inst, &m) {
            Err(SolveError::Solver(msg)) => assert_eq!(msg, "time limit reached"),
            other => panic!("expected Solver error, got {other:?}"),
        }
    }

    #[test]
    fn fractional_values_are_rejected_not_rounded() {
        let m = small_matrix();
        let inst = build_model(&m, ConstraintProfile::Unrestricted);
        let raw = optimal(vec![0.5, 0.0, 0.0, 1.0], 4.0);
        match extract_solution(&raw, &inst, &m) {
            Err(SolveError::Solver(msg)) => assert!(msg.contains("non-binary value 0.5")),
            other => panic!("expected Solver error, got {other:?}"),
        }
    }

    #[test]
    fn out_of_domain_integral_values_are_rejected() {
        // 2.0 and -1.0 are integral but outside the binary domain; they
        // must fail the gate, not be treated as unselected.
        let m = small_matrix();
        let inst = build_model(&m, ConstraintProfile::Unrestricted);
        for bad in [2.0, -1.0] {
            let raw = optimal(vec![bad, 0.0, 0.0, 1.0], 3.0);
            match extract_solution(&raw, &inst, &m) {
                Err(SolveError::Solver(msg)) => {
                    assert!(msg.contains(&format!("non-binary value {bad}")));
                }
                other => panic!("expected Solver error, got {other:?}"),
            }
        }
    }

    #[test]
    fn objective_drift_is_a_mismatch() {
        let m = small_matrix();
        let inst = build_model(&m, ConstraintProfile::Unrestricted);
        let raw = optimal(vec![1.0, 0.0, 0.0, 1.0], 7.0);
        match extract_solution(&raw, &inst, &m) {
            Err(SolveError::SolutionMismatch {
                reported,
                recomputed,
            }) => {
                assert_eq!(reported, 7.0);
                assert_eq!(recomputed, 5.0);
            }
            other => panic!("expected SolutionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn near_integral_values_pass_the_tolerance() {
        let m = small_matrix();
        let inst = build_model(&m, ConstraintProfile::Unrestricted);
        let raw = optimal(vec![0.9999999, 0.0000001, 0.0, 1.0], 5.0);
        let result = extract_solution(&raw, &inst, &m).unwrap();
        assert_eq!(result.selected.len(), 2);
    }
}
