use chrono::{DateTime, Utc};
use deploytrack_core::{Deployment, DeploymentStatus, Environment};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct DeploymentRow {
    pub id: String,
    pub component_id: String,
    pub version_id: i64,
    pub environment: String,
    pub status: String,
    pub deployed_by: String,
    pub deployed_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rollback_from: Option<String>,
    pub notes: String,
    pub metadata: serde_json::Value,
}

impl TryFrom<DeploymentRow> for Deployment {
    type Error = anyhow::Error;

    fn try_from(row: DeploymentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            component_id: row.component_id,
            version_id: row.version_id,
            environment: Environment::new(&row.environment)?,
            status: DeploymentStatus::from_str(&row.status)?,
            deployed_by: row.deployed_by,
            deployed_at: row.deployed_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
            rollback_from: row.rollback_from,
            notes: row.notes,
            metadata: row.metadata,
        })
    }
}
