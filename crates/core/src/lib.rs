pub mod matrix;
pub mod scenario;
pub mod scoring;

use async_trait::async_trait;
use thiserror::Error;

pub use matrix::PreferenceMatrix;
pub use types::{
    ConstraintProfile, CourseId, Instance, PersonId, PreferenceEntry, ScenarioRequest,
    SelectedAssignment, SiteId, SolveEnvelope, SolveParams, SolveResult, SolverStatus,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid instance: {0}")]
    Msg(String),
}

/// Run-level failure taxonomy. Infeasibility and engine faults are distinct,
/// user-visible outcomes; nothing here is downgraded or retried.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("unrecognized constraint profile: {0}")]
    InvalidProfile(String),
    #[error("preference matrix incomplete: {} triple(s) missing, first: {}", missing.len(), format_first(missing))]
    IncompleteMatrix {
        missing: Vec<(PersonId, CourseId, SiteId)>,
    },
    #[error("no feasible assignment under the given constraints")]
    Infeasible,
    #[error("solver engine failure: {0}")]
    Solver(String),
    #[error("reported objective {reported} does not match recomputed preference sum {recomputed}")]
    SolutionMismatch { reported: f64, recomputed: f64 },
}

fn format_first(missing: &[(PersonId, CourseId, SiteId)]) -> String {
    match missing.first() {
        Some((p, c, s)) => format!("({p}, {c}, {s})"),
        None => "<none>".into(),
    }
}

/// Parses a profile name supplied at a string boundary (CLI flag, query
/// parameter). The typed enum cannot hold an unrecognized value, so this is
/// where `InvalidProfile` comes from.
pub fn parse_profile(s: &str) -> Result<ConstraintProfile, SolveError> {
    ConstraintProfile::ALL
        .iter()
        .copied()
        .find(|p| p.as_str() == s)
        .ok_or_else(|| SolveError::InvalidProfile(s.to_string()))
}

pub fn validate(inst: &Instance) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    if inst.persons.is_empty() {
        errors.push("persons is empty".into());
    }
    if inst.courses.is_empty() {
        errors.push("courses is empty".into());
    }

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("person", inst.persons.iter().map(|x| &x.0), &mut errors);
    chk_unique("course", inst.courses.iter().map(|x| &x.0), &mut errors);
    chk_unique("site", inst.sites.iter().map(|x| &x.0), &mut errors);

    use std::collections::HashSet;
    let persons: HashSet<_> = inst.persons.iter().map(|p| &p.0).collect();
    let courses: HashSet<_> = inst.courses.iter().map(|c| &c.0).collect();
    let sites: HashSet<_> = inst.sites.iter().map(|s| &s.0).collect();

    let mut seen_triples = HashSet::new();
    for e in &inst.preferences {
        if !persons.contains(&e.person_id.0) {
            errors.push(format!(
                "preference references undeclared person {}",
                e.person_id.0
            ));
        }
        if !courses.contains(&e.course_id.0) {
            errors.push(format!(
                "preference references undeclared course {}",
                e.course_id.0
            ));
        }
        if !sites.contains(&e.site_id.0) {
            errors.push(format!(
                "preference references undeclared site {}",
                e.site_id.0
            ));
        }
        if !e.score.is_finite() || e.score < 0.0 {
            errors.push(format!(
                "preference ({}, {}, {}) has invalid score {}",
                e.person_id.0, e.course_id.0, e.site_id.0, e.score
            ));
        }
        if !seen_triples.insert((&e.person_id.0, &e.course_id.0, &e.site_id.0)) {
            errors.push(format!(
                "duplicate preference triple ({}, {}, {})",
                e.person_id.0, e.course_id.0, e.site_id.0
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

#[async_trait]
pub trait Solver: Send + Sync + 'static {
    async fn solve(&self, env: SolveEnvelope) -> Result<SolveResult, SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{CourseId, PersonId, PreferenceEntry, SiteId};

    fn inst(entries: Vec<(&str, &str, &str, f64)>) -> Instance {
        Instance {
            persons: vec![PersonId("p1".into()), PersonId("p2".into())],
            courses: vec![CourseId("c1".into())],
            sites: vec![SiteId("s1".into())],
            preferences: entries
                .into_iter()
                .map(|(p, c, s, score)| PreferenceEntry {
                    person_id: PersonId(p.into()),
                    course_id: CourseId(c.into()),
                    site_id: SiteId(s.into()),
                    score,
                })
                .collect(),
        }
    }

    #[test]
    fn valid_instance_passes() {
        let i = inst(vec![("p1", "c1", "s1", 1.0), ("p2", "c1", "s1", 0.0)]);
        assert!(validate(&i).is_ok());
    }

    #[test]
    fn undeclared_ids_are_reported() {
        let i = inst(vec![("p1", "c1", "s1", 1.0), ("ghost", "c1", "s9", 1.0)]);
        let ValidationError::Msg(msg) = validate(&i).unwrap_err();
        assert!(msg.contains("undeclared person ghost"));
        assert!(msg.contains("undeclared site s9"));
    }

    #[test]
    fn negative_and_nonfinite_scores_are_rejected() {
        let i = inst(vec![("p1", "c1", "s1", -2.0), ("p2", "c1", "s1", f64::NAN)]);
        let ValidationError::Msg(msg) = validate(&i).unwrap_err();
        assert!(msg.contains("invalid score -2"));
        assert!(msg.contains("invalid score NaN"));
    }

    #[test]
    fn duplicate_triples_are_rejected() {
        let i = inst(vec![
            ("p1", "c1", "s1", 1.0),
            ("p1", "c1", "s1", 2.0),
            ("p2", "c1", "s1", 0.0),
        ]);
        let ValidationError::Msg(msg) = validate(&i).unwrap_err();
        assert!(msg.contains("duplicate preference triple (p1, c1, s1)"));
    }

    #[test]
    fn parse_profile_round_trips_and_rejects() {
        for p in ConstraintProfile::ALL {
            assert_eq!(parse_profile(p.as_str()).unwrap(), p);
        }
        match parse_profile("single_site") {
            Err(SolveError::InvalidProfile(s)) => assert_eq!(s, "single_site"),
            other => panic!("expected InvalidProfile, got {other:?}"),
        }
    }
}
