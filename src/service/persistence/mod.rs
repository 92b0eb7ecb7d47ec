use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deploytrack_core::{
    Application, Component, Deployment, DeploymentFilter, DeploymentTransition, Environment,
    EnvironmentStats, NewVersion, Transition, Version,
};

pub mod memory;
pub mod relational;

#[async_trait]
pub trait Persistence<Model>: Send + Sync {
    /// Returns the number of rows written: 0 when a model with the same id exists.
    async fn insert(&self, model: &Model) -> anyhow::Result<u64>;
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Model>>;
    async fn list(&self) -> anyhow::Result<Vec<Model>>;
}

pub trait Persistable {
    fn get_id(&self) -> String;
}

impl Persistable for Application {
    fn get_id(&self) -> String {
        self.id.clone()
    }
}

impl Persistable for Component {
    fn get_id(&self) -> String {
        self.id.clone()
    }
}

impl Persistable for Deployment {
    fn get_id(&self) -> String {
        self.id.clone()
    }
}

#[async_trait]
pub trait ComponentPersistence: Persistence<Component> {
    async fn get_by_application_id(&self, application_id: &str)
        -> anyhow::Result<Vec<Component>>;
}

/// Versions get their id from the store, so they sit outside [`Persistence`].
#[async_trait]
pub trait VersionPersistence: Send + Sync {
    /// Returns `None` when `(component_id, version)` already exists.
    async fn create(
        &self,
        new_version: &NewVersion,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Version>>;
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Version>>;
    async fn get_by_component_id(&self, component_id: &str) -> anyhow::Result<Vec<Version>>;
    async fn get_by_component_and_version(
        &self,
        component_id: &str,
        version: &str,
    ) -> anyhow::Result<Option<Version>>;
}

/// A validated status change together with who made it and why.
#[derive(Clone, Debug)]
pub struct StatusChange {
    pub transition: Transition,
    pub actor: String,
    pub notes: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl StatusChange {
    pub fn audit_record(
        &self,
        deployment_id: &str,
        from_status: deploytrack_core::DeploymentStatus,
    ) -> DeploymentTransition {
        DeploymentTransition {
            deployment_id: deployment_id.to_string(),
            from_status: Some(from_status),
            to_status: self.transition.to,
            actor: self.actor.clone(),
            notes: self.notes.clone().unwrap_or_default(),
            transitioned_at: self.changed_at,
        }
    }
}

/// The ledger. `insert` writes the deployment and its creation audit record as one
/// unit; rows are never deleted.
#[async_trait]
pub trait DeploymentPersistence: Persistence<Deployment> {
    /// Latest deployment for the key: greatest `deployed_at`, then greatest id.
    async fn get_latest(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> anyhow::Result<Option<Deployment>>;
    async fn get_latest_successful(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> anyhow::Result<Option<Deployment>>;
    /// Newest first.
    async fn query(&self, filter: &DeploymentFilter) -> anyhow::Result<Vec<Deployment>>;
    async fn get_environment_stats(
        &self,
        environment: &Environment,
    ) -> anyhow::Result<EnvironmentStats>;
    /// Applies the change as one read-modify-write. Returns `None` for an unknown id.
    async fn apply_status_change(
        &self,
        deployment_id: &str,
        change: &StatusChange,
    ) -> anyhow::Result<Option<(Deployment, DeploymentTransition)>>;
    /// Oldest first.
    async fn get_transitions(&self, deployment_id: &str)
        -> anyhow::Result<Vec<DeploymentTransition>>;
}
