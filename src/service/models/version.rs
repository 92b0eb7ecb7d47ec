use chrono::{DateTime, Utc};
use deploytrack_core::Version;

#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct VersionRow {
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

impl From<VersionRow> for Version {
    fn from(row: VersionRow) -> Self {
        Self {
            id: row.id,
            component_id: row.component_id,
            version: row.version,
            branch: row.branch,
            commit_hash: row.commit_hash,
            build_number: row.build_number,
            features: row.features,
            bug_fixes: row.bug_fixes,
            breaking_changes: row.breaking_changes,
            created_at: row.created_at,
        }
    }
}
