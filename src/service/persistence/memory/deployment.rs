use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deploytrack_core::{
    Component, Deployment, DeploymentFilter, DeploymentStatus, DeploymentTransition,
    Environment, EnvironmentStats,
};
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use super::MemoryPersistence;
use crate::persistence::{DeploymentPersistence, Persistable, Persistence, StatusChange};

type ResolutionKey = (String, Environment);

/// Orders like [`Deployment::cmp_recency`]: `String` compares byte-wise.
type Recency = (DateTime<Utc>, String);

#[derive(Debug, Default)]
struct Ledger {
    deployments: HashMap<String, Deployment>,
    transitions: HashMap<String, Vec<DeploymentTransition>>,
    // (component, environment) -> deployments ordered oldest to newest
    index: HashMap<ResolutionKey, BTreeSet<Recency>>,
}

impl Ledger {
    fn newest_first<'a>(
        &'a self,
        component_id: &str,
        environment: &Environment,
    ) -> impl Iterator<Item = &'a Deployment> + 'a {
        let key = (component_id.to_string(), environment.clone());

        self.index
            .get(&key)
            .into_iter()
            .flat_map(|entries| entries.iter().rev())
            .filter_map(move |(_, id)| self.deployments.get(id))
    }
}

#[derive(Debug, Default)]
pub struct DeploymentMemoryPersistence {
    ledger: Arc<Mutex<Ledger>>,
    // read only, to resolve application filters
    components: MemoryPersistence<Component>,
}

#[async_trait]
impl Persistence<Deployment> for DeploymentMemoryPersistence {
    async fn insert(&self, deployment: &Deployment) -> anyhow::Result<u64> {
        let mut locked_ledger = self.get_ledger_locked()?;

        if locked_ledger.deployments.contains_key(&deployment.id) {
            return Ok(0);
        }

        locked_ledger
            .index
            .entry((deployment.component_id.clone(), deployment.environment.clone()))
            .or_default()
            .insert((deployment.deployed_at, deployment.id.clone()));

        locked_ledger
            .transitions
            .entry(deployment.id.clone())
            .or_default()
            .push(DeploymentTransition::created(deployment));

        locked_ledger
            .deployments
            .insert(deployment.get_id(), deployment.clone());

        Ok(1)
    }

    async fn get_by_id(&self, deployment_id: &str) -> anyhow::Result<Option<Deployment>> {
        let locked_ledger = self.get_ledger_locked()?;

        Ok(locked_ledger.deployments.get(deployment_id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Deployment>> {
        self.query(&DeploymentFilter::default()).await
    }
}

#[async_trait]
impl DeploymentPersistence for DeploymentMemoryPersistence {
    async fn get_latest(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> anyhow::Result<Option<Deployment>> {
        let locked_ledger = self.get_ledger_locked()?;

        let latest = locked_ledger
            .newest_first(component_id, environment)
            .next()
            .cloned();

        Ok(latest)
    }

    async fn get_latest_successful(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> anyhow::Result<Option<Deployment>> {
        let locked_ledger = self.get_ledger_locked()?;

        let latest = locked_ledger
            .newest_first(component_id, environment)
            .find(|deployment| deployment.status == DeploymentStatus::Success)
            .cloned();

        Ok(latest)
    }

    async fn query(&self, filter: &DeploymentFilter) -> anyhow::Result<Vec<Deployment>> {
        let application_components = match &filter.application_id {
            Some(application_id) => Some(self.component_ids_of(application_id)?),
            None => None,
        };

        let locked_ledger = self.get_ledger_locked()?;

        let mut deployments: Vec<&Deployment> = locked_ledger
            .deployments
            .values()
            .filter(|deployment| filter.matches(deployment))
            .filter(|deployment| {
                application_components
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&deployment.component_id))
            })
            .collect();

        deployments.sort_by(|a, b| b.cmp_recency(a));

        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |limit| limit as usize);

        Ok(deployments
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_environment_stats(
        &self,
        environment: &Environment,
    ) -> anyhow::Result<EnvironmentStats> {
        let locked_ledger = self.get_ledger_locked()?;

        let stats = EnvironmentStats::from_deployments(
            locked_ledger
                .deployments
                .values()
                .filter(|deployment| &deployment.environment == environment),
        );

        Ok(stats)
    }

    async fn apply_status_change(
        &self,
        deployment_id: &str,
        change: &StatusChange,
    ) -> anyhow::Result<Option<(Deployment, DeploymentTransition)>> {
        let mut locked_ledger = self.get_ledger_locked()?;

        let deployment = match locked_ledger.deployments.get_mut(deployment_id) {
            Some(deployment) => deployment,
            None => return Ok(None),
        };

        let record = change.audit_record(deployment_id, deployment.status);

        deployment.status = change.transition.to;
        change
            .transition
            .apply_stamps(&mut deployment.started_at, &mut deployment.completed_at);
        if let Some(notes) = &change.notes {
            deployment.notes = notes.clone();
        }

        let updated = deployment.clone();

        locked_ledger
            .transitions
            .entry(deployment_id.to_string())
            .or_default()
            .push(record.clone());

        Ok(Some((updated, record)))
    }

    async fn get_transitions(
        &self,
        deployment_id: &str,
    ) -> anyhow::Result<Vec<DeploymentTransition>> {
        let locked_ledger = self.get_ledger_locked()?;

        Ok(locked_ledger
            .transitions
            .get(deployment_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl DeploymentMemoryPersistence {
    pub fn new(components: MemoryPersistence<Component>) -> Self {
        Self {
            ledger: Arc::default(),
            components,
        }
    }

    fn component_ids_of(&self, application_id: &str) -> anyhow::Result<HashSet<String>> {
        let locked_components = self.components.get_models_locked()?;

        Ok(locked_components
            .values()
            .filter(|component| component.application_id == application_id)
            .map(|component| component.id.clone())
            .collect())
    }

    fn get_ledger_locked(&self) -> anyhow::Result<MutexGuard<Ledger>> {
        match self.ledger.lock() {
            Ok(locked_ledger) => Ok(locked_ledger),
            Err(_) => Err(anyhow::anyhow!("failed to acquire lock")),
        }
    }
}
