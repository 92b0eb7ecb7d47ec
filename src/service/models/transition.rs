use chrono::{DateTime, Utc};
use deploytrack_core::{DeploymentStatus, DeploymentTransition};
use std::str::FromStr;

#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct TransitionRow {
    pub deployment_id: String,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor: String,
    pub notes: String,
    pub transitioned_at: DateTime<Utc>,
}

impl TryFrom<TransitionRow> for DeploymentTransition {
    type Error = anyhow::Error;

    fn try_from(row: TransitionRow) -> Result<Self, Self::Error> {
        let from_status = match row.from_status {
            Some(status) => Some(DeploymentStatus::from_str(&status)?),
            None => None,
        };

        Ok(Self {
            deployment_id: row.deployment_id,
            from_status,
            to_status: DeploymentStatus::from_str(&row.to_status)?,
            actor: row.actor,
            notes: row.notes,
            transitioned_at: row.transitioned_at,
        })
    }
}
