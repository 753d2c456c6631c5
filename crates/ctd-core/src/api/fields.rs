//! Study field presets.
//!
//! Field names come from the study data structure published by the registry;
//! the `fields` query parameter takes a comma-joined subset. No parameter at
//! all means the server returns every module of every study.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimal field list: just enough to identify a study.
pub const BRIEF_FIELDS: &[&str] = &["NCTId", "BriefTitle"];

/// Condition/intervention-oriented field list, small enough to download the
/// whole registry quickly but rich enough for most downstream matching.
pub const SLIM_FIELDS: &[&str] = &[
    "NCTId",
    "BriefTitle",
    "Condition",
    // ConditionMeshTerm is the name of the disease
    "ConditionMeshTerm",
    "ConditionMeshId",
    // InterventionName is the name of the drug/vaccine
    "InterventionName",
    "InterventionType",
    "InterventionMeshTerm",
    "InterventionMeshId",
    "StudyType",
    "DesignAllocation",
    "OverallStatus",
    "Phase",
    "WhyStopped",
    "SecondaryIdType",
    "SecondaryId",
    // Month [day], year: "November 1, 2023", "May 1984", or absent
    "StartDate",
    // "Actual" or "Anticipated" (or absent)
    "StartDateType",
    // Tagged as relevant by the author, but not necessarily about the trial
    "ReferencePMID",
];

/// Which fields to request for each study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPreset {
    /// `NCTId` and `BriefTitle` only.
    Brief,
    /// The slim condition/intervention list.
    Slim,
    /// Everything (no `fields` parameter sent).
    #[default]
    Full,
}

impl FieldPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldPreset::Brief => "brief",
            FieldPreset::Slim => "slim",
            FieldPreset::Full => "full",
        }
    }

    /// Value for the `fields` query parameter, or None for the full download.
    pub fn query_value(self) -> Option<String> {
        match self {
            FieldPreset::Brief => Some(BRIEF_FIELDS.join(",")),
            FieldPreset::Slim => Some(SLIM_FIELDS.join(",")),
            FieldPreset::Full => None,
        }
    }
}

impl fmt::Display for FieldPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brief" => Ok(FieldPreset::Brief),
            "slim" => Ok(FieldPreset::Slim),
            "full" => Ok(FieldPreset::Full),
            other => Err(format!(
                "unknown field preset '{other}' (expected brief, slim, or full)"
            )),
        }
    }
}
