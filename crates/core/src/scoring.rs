use std::collections::HashMap;
use types::{Instance, SelectedAssignment, SiteId};

/// Scores recomputed from a selected-triple list, independently of whatever
/// objective the engine reported. Used for the extractor's reconciliation
/// check and by the score endpoint.
#[derive(Clone, Debug, Default)]
pub struct Scores {
    pub preference_total: f64,
    pub selected_count: usize,
    pub per_site: HashMap<String, u32>,
    pub active_sites: Vec<SiteId>,
}

pub fn recompute_scores(inst: &Instance, selected: &[SelectedAssignment]) -> Scores {
    let mut score_by_triple: HashMap<(&str, &str, &str), f64> = HashMap::new();
    for e in &inst.preferences {
        score_by_triple.insert(
            (
                e.person_id.0.as_str(),
                e.course_id.0.as_str(),
                e.site_id.0.as_str(),
            ),
            e.score,
        );
    }

    let mut preference_total = 0.0;
    let mut per_site: HashMap<String, u32> = HashMap::new();
    for a in selected {
        let key = (
            a.person_id.0.as_str(),
            a.course_id.0.as_str(),
            a.site_id.0.as_str(),
        );
        preference_total += score_by_triple.get(&key).copied().unwrap_or(0.0);
        *per_site.entry(a.site_id.0.clone()).or_default() += 1;
    }

    let mut active_sites: Vec<SiteId> = inst
        .sites
        .iter()
        .filter(|s| per_site.contains_key(s.0.as_str()))
        .cloned()
        .collect();
    active_sites.sort();

    Scores {
        preference_total,
        selected_count: selected.len(),
        per_site,
        active_sites,
    }
}
