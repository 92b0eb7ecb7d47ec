use serde::{Deserialize, Serialize};

use crate::{Deployment, DeploymentStatus};

/// Outcome of resolving a (component, environment) key against the ledger.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResolvedState {
    Deployed(Box<Deployment>),
    NoDeployment,
}

impl ResolvedState {
    pub fn deployment(&self) -> Option<&Deployment> {
        match self {
            Self::Deployed(deployment) => Some(deployment),
            Self::NoDeployment => None,
        }
    }

    pub fn status(&self) -> Option<DeploymentStatus> {
        self.deployment().map(|deployment| deployment.status)
    }

    pub fn is_deployed(&self) -> bool {
        matches!(self, Self::Deployed(_))
    }
}

impl From<Option<Deployment>> for ResolvedState {
    fn from(deployment: Option<Deployment>) -> Self {
        match deployment {
            Some(deployment) => Self::Deployed(Box::new(deployment)),
            None => Self::NoDeployment,
        }
    }
}

/// Latest-wins selection over any set of deployments sharing a key.
pub fn latest<'a, I>(deployments: I) -> Option<&'a Deployment>
where
    I: IntoIterator<Item = &'a Deployment>,
{
    deployments
        .into_iter()
        .max_by(|a, b| a.cmp_recency(b))
}

pub fn latest_successful<'a, I>(deployments: I) -> Option<&'a Deployment>
where
    I: IntoIterator<Item = &'a Deployment>,
{
    latest(
        deployments
            .into_iter()
            .filter(|deployment| deployment.status == DeploymentStatus::Success),
    )
}
