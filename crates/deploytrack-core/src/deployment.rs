use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{DeploymentStatus, Environment};

/// One entry in the ledger. `component_id`, `version_id` and `environment` never
/// change once written; only the status, its timestamps and the notes do.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Deployment {
    pub id: String,
    pub component_id: String,
    pub version_id: i64,
    pub environment: Environment,
    pub status: DeploymentStatus,
    pub deployed_by: String,
    pub deployed_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rollback_from: Option<String>,
    pub notes: String,
    pub metadata: serde_json::Value,
}

/// Ledger timestamps carry microseconds, the precision PostgreSQL stores.
pub fn ledger_time(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

impl Deployment {
    pub fn make_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Orders deployments of the same (component, environment) key: later `deployed_at`
    /// wins, and exact timestamp ties fall back to the byte-wise greater id.
    pub fn cmp_recency(&self, other: &Deployment) -> Ordering {
        self.deployed_at
            .cmp(&other.deployed_at)
            .then_with(|| self.id.as_bytes().cmp(other.id.as_bytes()))
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(started_at), Some(completed_at)) => Some(completed_at - started_at),
            _ => None,
        }
    }

    pub fn is_rollback(&self) -> bool {
        self.rollback_from.is_some()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NewDeployment {
    pub component_id: String,
    pub version_id: i64,
    pub environment: String,
    pub deployed_by: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Defaults to `pending`. Pipelines that report synchronously pass `success`.
    #[serde(default)]
    pub initial_status: Option<DeploymentStatus>,
    /// Event time reported by the caller; the ledger uses its own clock when absent.
    #[serde(default)]
    pub deployed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rollback_from: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RollbackRequest {
    pub deployed_by: String,
    #[serde(default)]
    pub notes: String,
    /// Version to restore. When absent the version of the last successful deployment
    /// preceding the rolled back one is used.
    #[serde(default)]
    pub version_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: String,
    pub updated_by: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Audit record of a status change. The record written on creation has no `from_status`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DeploymentTransition {
    pub deployment_id: String,
    pub from_status: Option<DeploymentStatus>,
    pub to_status: DeploymentStatus,
    pub actor: String,
    pub notes: String,
    pub transitioned_at: DateTime<Utc>,
}

impl DeploymentTransition {
    pub fn created(deployment: &Deployment) -> Self {
        Self {
            deployment_id: deployment.id.clone(),
            from_status: None,
            to_status: deployment.status,
            actor: deployment.deployed_by.clone(),
            notes: deployment.notes.clone(),
            transitioned_at: deployment.deployed_at,
        }
    }
}

/// Selects ledger rows. `application_id` spans every component of the application
/// and is resolved by the store, so [`DeploymentFilter::matches`] does not see it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DeploymentFilter {
    pub application_id: Option<String>,
    pub component_id: Option<String>,
    pub environment: Option<Environment>,
    pub status: Option<DeploymentStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DeploymentFilter {
    pub fn with_application(mut self, application_id: &str) -> Self {
        self.application_id = Some(application_id.to_string());
        self
    }

    pub fn with_component(mut self, component_id: &str) -> Self {
        self.component_id = Some(component_id.to_string());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_status(mut self, status: DeploymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, deployment: &Deployment) -> bool {
        if let Some(component_id) = &self.component_id {
            if &deployment.component_id != component_id {
                return false;
            }
        }

        if let Some(environment) = &self.environment {
            if &deployment.environment != environment {
                return false;
            }
        }

        if let Some(status) = self.status {
            if deployment.status != status {
                return false;
            }
        }

        true
    }
}
