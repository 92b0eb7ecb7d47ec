use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable build of a component. `version` is a label, not an orderable value.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Version {
    pub id: i64,
    pub component_id: String,
    pub version: String,
    pub branch: String,
    pub commit_hash: String,
    pub build_number: Option<String>,
    pub features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub breaking_changes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NewVersion {
    pub component_id: String,
    pub version: String,
    pub branch: String,
    pub commit_hash: String,
    #[serde(default)]
    pub build_number: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub bug_fixes: Vec<String>,
    #[serde(default)]
    pub breaking_changes: Vec<String>,
}

impl Version {
    pub fn new(id: i64, new_version: NewVersion, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            component_id: new_version.component_id,
            version: new_version.version,
            branch: new_version.branch,
            commit_hash: new_version.commit_hash,
            build_number: new_version.build_number,
            features: new_version.features,
            bug_fixes: new_version.bug_fixes,
            breaking_changes: new_version.breaking_changes,
            created_at,
        }
    }
}
