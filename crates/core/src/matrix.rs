use crate::SolveError;
use std::collections::HashMap;
use types::{CourseId, Instance, PersonId, SiteId};

/// Dense, validated preference matrix. One score per (person, course, site)
/// triple in the cross product of the declared sets; read-only after
/// construction. Indices follow the declaration order of the instance.
#[derive(Clone, Debug)]
pub struct PreferenceMatrix {
    persons: Vec<PersonId>,
    courses: Vec<CourseId>,
    sites: Vec<SiteId>,
    scores: Vec<f64>,
}

impl PreferenceMatrix {
    /// Builds the dense matrix from the wire instance. Fails with
    /// `IncompleteMatrix` listing every triple the entries do not cover;
    /// zero-defaulting missing entries is the upstream collaborator's job,
    /// not performed here.
    pub fn from_instance(inst: &Instance) -> Result<Self, SolveError> {
        let (np, nc, ns) = (inst.persons.len(), inst.courses.len(), inst.sites.len());

        let idx_person: HashMap<&str, usize> = inst
            .persons
            .iter()
            .enumerate()
            .map(|(i, p)| (p.0.as_str(), i))
            .collect();
        let idx_course: HashMap<&str, usize> = inst
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.0.as_str(), i))
            .collect();
        let idx_site: HashMap<&str, usize> = inst
            .sites
            .iter()
            .enumerate()
            .map(|(i, s)| (s.0.as_str(), i))
            .collect();

        let mut scores = vec![0.0_f64; np * nc * ns];
        let mut filled = vec![false; np * nc * ns];
        for e in &inst.preferences {
            let (Some(&p), Some(&c), Some(&s)) = (
                idx_person.get(e.person_id.0.as_str()),
                idx_course.get(e.course_id.0.as_str()),
                idx_site.get(e.site_id.0.as_str()),
            ) else {
                // Undeclared ids are a validate() concern, not coverage.
                continue;
            };
            let k = (p * nc + c) * ns + s;
            scores[k] = e.score;
            filled[k] = true;
        }

        let mut missing = Vec::new();
        for p in 0..np {
            for c in 0..nc {
                for s in 0..ns {
                    if !filled[(p * nc + c) * ns + s] {
                        missing.push((
                            inst.persons[p].clone(),
                            inst.courses[c].clone(),
                            inst.sites[s].clone(),
                        ));
                    }
                }
            }
        }
        if !missing.is_empty() {
            return Err(SolveError::IncompleteMatrix { missing });
        }

        Ok(Self {
            persons: inst.persons.clone(),
            courses: inst.courses.clone(),
            sites: inst.sites.clone(),
            scores,
        })
    }

    pub fn num_persons(&self) -> usize {
        self.persons.len()
    }

    pub fn num_courses(&self) -> usize {
        self.courses.len()
    }

    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn person(&self, p: usize) -> &PersonId {
        &self.persons[p]
    }

    pub fn course(&self, c: usize) -> &CourseId {
        &self.courses[c]
    }

    pub fn site(&self, s: usize) -> &SiteId {
        &self.sites[s]
    }

    pub fn score(&self, p: usize, c: usize, s: usize) -> f64 {
        self.scores[(p * self.courses.len() + c) * self.sites.len() + s]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use types::PreferenceEntry;

    fn full_instance(np: usize, nc: usize, ns: usize) -> Instance {
        let persons: Vec<_> = (0..np).map(|i| PersonId(format!("p{i}"))).collect();
        let courses: Vec<_> = (0..nc).map(|i| CourseId(format!("c{i}"))).collect();
        let sites: Vec<_> = (0..ns).map(|i| SiteId(format!("s{i}"))).collect();
        let mut preferences = Vec::new();
        for p in &persons {
            for c in &courses {
                for s in &sites {
                    preferences.push(PreferenceEntry {
                        person_id: p.clone(),
                        course_id: c.clone(),
                        site_id: s.clone(),
                        score: (preferences.len() % 7) as f64,
                    });
                }
            }
        }
        Instance {
            persons,
            courses,
            sites,
            preferences,
        }
    }

    #[test]
    fn complete_instance_builds_and_indexes() {
        let inst = full_instance(2, 3, 2);
        let m = PreferenceMatrix::from_instance(&inst).unwrap();
        assert_eq!(
            (m.num_persons(), m.num_courses(), m.num_sites()),
            (2, 3, 2)
        );
        // Entry order in full_instance is row-major, so the score at a
        // given triple is its position modulo 7.
        assert_eq!(m.score(1, 2, 1), (((1 * 3 + 2) * 2 + 1) % 7) as f64);
        assert_eq!(m.person(1).0, "p1");
        assert_eq!(m.site(0).0, "s0");
    }

    #[test]
    fn missing_triple_is_reported() {
        let mut inst = full_instance(2, 2, 2);
        let dropped = inst.preferences.remove(3);
        match PreferenceMatrix::from_instance(&inst) {
            Err(SolveError::IncompleteMatrix { missing }) => {
                assert_eq!(missing.len(), 1);
                let (p, c, s) = &missing[0];
                assert_eq!(p, &dropped.person_id);
                assert_eq!(c, &dropped.course_id);
                assert_eq!(s, &dropped.site_id);
            }
            other => panic!("expected IncompleteMatrix, got {other:?}"),
        }
    }

    #[test]
    fn empty_cross_product_is_trivially_complete() {
        let inst = Instance {
            persons: vec![PersonId("p0".into())],
            courses: vec![CourseId("c0".into())],
            sites: vec![],
            preferences: vec![],
        };
        let m = PreferenceMatrix::from_instance(&inst).unwrap();
        assert_eq!(m.num_sites(), 0);
    }

    proptest! {
        #[test]
        fn completeness_check_flags_every_removal(
            np in 1usize..4, nc in 1usize..4, ns in 1usize..4,
            drop_count in 1usize..5,
        ) {
            let mut inst = full_instance(np, nc, ns);
            let total = inst.preferences.len();
            let drop_count = drop_count.min(total);
            inst.preferences.truncate(total - drop_count);
            match PreferenceMatrix::from_instance(&inst) {
                Err(SolveError::IncompleteMatrix { missing }) => {
                    prop_assert_eq!(missing.len(), drop_count);
                }
                other => prop_assert!(false, "expected IncompleteMatrix, got {:?}", other),
            }
        }
    }
}
