use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
            Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(PersonId);
id_newtype!(CourseId);
id_newtype!(SiteId);

/// Which constraint set the model builder emits. Immutable once chosen.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintProfile {
    /// Any number of sites may be active; attending a course is optional.
    Unrestricted,
    /// At most one site active across the system; attendance optional.
    SingleSiteOptional,
    /// At most one site active; every person attends every course there.
    SingleSiteMandatory,
}

impl ConstraintProfile {
    pub const ALL: [ConstraintProfile; 3] = [
        ConstraintProfile::Unrestricted,
        ConstraintProfile::SingleSiteOptional,
        ConstraintProfile::SingleSiteMandatory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintProfile::Unrestricted => "unrestricted",
            ConstraintProfile::SingleSiteOptional => "single_site_optional",
            ConstraintProfile::SingleSiteMandatory => "single_site_mandatory",
        }
    }

    /// Whether the profile consolidates all activity onto one site.
    pub fn consolidates_sites(&self) -> bool {
        !matches!(self, ConstraintProfile::Unrestricted)
    }

    /// Whether every (person, course) pair must be assigned somewhere.
    pub fn attendance_mandatory(&self) -> bool {
        matches!(self, ConstraintProfile::SingleSiteMandatory)
    }
}

impl fmt::Display for ConstraintProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of the preference matrix, wire form.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceEntry {
    pub person_id: PersonId,
    pub course_id: CourseId,
    pub site_id: SiteId,
    pub score: f64,
}

/// A complete problem instance: the declared entity sets plus one
/// preference entry per (person, course, site) triple. Missing entries are
/// zero-defaulted by the upstream data-preparation step, never here.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Instance {
    pub persons: Vec<PersonId>,
    pub courses: Vec<CourseId>,
    pub sites: Vec<SiteId>,
    pub preferences: Vec<PreferenceEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolveParams {
    /// Hard wall-clock limit handed to the engine; expiry is a solver
    /// error, not infeasibility.
    pub time_limit_sec: u64,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self { time_limit_sec: 60 }
    }
}

/// One solve request: instance + the profile to solve it under.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveEnvelope {
    pub instance: Instance,
    pub profile: ConstraintProfile,
    #[serde(default)]
    pub params: SolveParams,
}

/// A scenario run evaluates the same instance under several profiles,
/// independently, for comparison.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct ScenarioRequest {
    pub instance: Instance,
    pub profiles: Vec<ConstraintProfile>,
    #[serde(default)]
    pub params: SolveParams,
}

/// A triple the solver selected, with its original preference score kept
/// for auditing.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAssignment {
    pub person_id: PersonId,
    pub course_id: CourseId,
    pub site_id: SiteId,
    pub score: f64,
}

/// Terminal engine status for one solve call.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    SolverError,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolveResult {
    pub objective: f64,
    pub selected: Vec<SelectedAssignment>,
    pub active_sites: Vec<SiteId>,
    pub stats: serde_json::Value,
}

impl SolveResult {
    pub fn site_set(&self) -> BTreeSet<&SiteId> {
        self.selected.iter().map(|a| &a.site_id).collect()
    }
}
