use chrono::Utc;
use deploytrack_core::{
    ledger_time, Deployment, DeploymentFilter, DeploymentStatus, DeploymentTransition,
    Environment, EnvironmentStats, LedgerError, LedgerResult, NewDeployment, RollbackRequest,
    StatusUpdate, Transition,
};
use std::{cmp::Ordering, sync::Arc};

use super::{ComponentService, VersionService};
use crate::persistence::{DeploymentPersistence, StatusChange};

/// The deployment ledger. Rows are appended and their status moved forward or back;
/// nothing is ever removed.
pub struct DeploymentService {
    pub persistence: Box<dyn DeploymentPersistence>,

    pub component_service: Arc<ComponentService>,
    pub version_service: Arc<VersionService>,
}

impl DeploymentService {
    #[tracing::instrument(name = "service::deployment::append", skip(self))]
    pub async fn append_deployment(
        &self,
        new_deployment: NewDeployment,
    ) -> LedgerResult<Deployment> {
        let environment = Environment::new(&new_deployment.environment)?;

        self.component_service
            .require(&new_deployment.component_id)
            .await?;

        let version = match self
            .version_service
            .get_by_id(new_deployment.version_id)
            .await?
        {
            Some(version) => version,
            None => {
                tracing::error!(
                    "version id {} not found: can't deploy component {}",
                    new_deployment.version_id,
                    new_deployment.component_id
                );
                return Err(LedgerError::not_found("version", new_deployment.version_id));
            }
        };

        if version.component_id != new_deployment.component_id {
            let message = format!(
                "version id {} belongs to component {}, not {}",
                version.id, version.component_id, new_deployment.component_id
            );

            tracing::error!(message);
            return Err(LedgerError::InvalidReference(message));
        }

        let status = new_deployment.initial_status.unwrap_or_default();

        match &new_deployment.rollback_from {
            Some(rollback_from) => {
                self.check_rollback_target(
                    rollback_from,
                    &new_deployment.component_id,
                    &environment,
                )
                .await?
            }
            None if status == DeploymentStatus::Rollback => {
                let message = "a rollback deployment must name the deployment it rolls back";

                tracing::error!(message);
                return Err(LedgerError::InvalidReference(message.to_owned()));
            }
            None => {}
        }

        let deployed_at = ledger_time(new_deployment.deployed_at.unwrap_or_else(Utc::now));
        let transition = Transition::to(status, deployed_at);

        let mut deployment = Deployment {
            id: Deployment::make_id(),
            component_id: new_deployment.component_id,
            version_id: new_deployment.version_id,
            environment,
            status,
            deployed_by: new_deployment.deployed_by,
            deployed_at,
            started_at: None,
            completed_at: None,
            rollback_from: new_deployment.rollback_from,
            notes: new_deployment.notes,
            metadata: new_deployment
                .metadata
                .unwrap_or_else(|| serde_json::json!({})),
        };
        transition.apply_stamps(&mut deployment.started_at, &mut deployment.completed_at);

        let inserted_count = self.persistence.insert(&deployment).await?;

        if inserted_count == 0 {
            let message = format!("deployment id {} already exists", deployment.id);

            tracing::error!(message);
            return Err(LedgerError::Conflict(message));
        }

        tracing::info!("deployment appended: {:?}", deployment);

        Ok(deployment)
    }

    async fn check_rollback_target(
        &self,
        rollback_from: &str,
        component_id: &str,
        environment: &Environment,
    ) -> LedgerResult<()> {
        let prior = match self.persistence.get_by_id(rollback_from).await? {
            Some(prior) => prior,
            None => {
                let message = format!("rollback target {rollback_from} does not exist");

                tracing::error!(message);
                return Err(LedgerError::InvalidReference(message));
            }
        };

        if prior.component_id != component_id || &prior.environment != environment {
            let message = format!(
                "rollback target {} is {} in {}, not {} in {}",
                prior.id, prior.component_id, prior.environment, component_id, environment
            );

            tracing::error!(message);
            return Err(LedgerError::InvalidReference(message));
        }

        Ok(())
    }

    /// Appends a `rollback` deployment undoing `deployment_id`. Without an explicit
    /// version the one from the last successful deployment before it is restored.
    #[tracing::instrument(name = "service::deployment::rollback", skip(self))]
    pub async fn rollback(
        &self,
        deployment_id: &str,
        request: RollbackRequest,
    ) -> LedgerResult<Deployment> {
        let prior = self.require(deployment_id).await?;

        let version_id = match request.version_id {
            Some(version_id) => version_id,
            None => self.restorable_version_id(&prior).await?,
        };

        self.append_deployment(NewDeployment {
            component_id: prior.component_id.clone(),
            version_id,
            environment: prior.environment.to_string(),
            deployed_by: request.deployed_by,
            notes: request.notes,
            initial_status: Some(DeploymentStatus::Rollback),
            rollback_from: Some(prior.id),
            ..Default::default()
        })
        .await
    }

    async fn restorable_version_id(&self, prior: &Deployment) -> LedgerResult<i64> {
        let successful = self
            .persistence
            .query(
                &DeploymentFilter::default()
                    .with_component(&prior.component_id)
                    .with_environment(prior.environment.clone())
                    .with_status(DeploymentStatus::Success),
            )
            .await?;

        successful
            .iter()
            .find(|deployment| deployment.cmp_recency(prior) == Ordering::Less)
            .map(|deployment| deployment.version_id)
            .ok_or_else(|| {
                let message = format!(
                    "no successful deployment of {} in {} precedes {}",
                    prior.component_id, prior.environment, prior.id
                );

                tracing::error!(message);
                LedgerError::InvalidReference(message)
            })
    }

    #[tracing::instrument(name = "service::deployment::update_status", skip(self))]
    pub async fn update_deployment_status(
        &self,
        deployment_id: &str,
        update: StatusUpdate,
    ) -> LedgerResult<Deployment> {
        let now = ledger_time(Utc::now());

        let transition = Transition::parse(&update.status, now).map_err(|error| {
            tracing::error!("rejected status update of {}: {}", deployment_id, error);
            error
        })?;

        let change = StatusChange {
            transition,
            actor: update.updated_by,
            notes: update.notes,
            changed_at: now,
        };

        let (deployment, record) = match self
            .persistence
            .apply_status_change(deployment_id, &change)
            .await?
        {
            Some(updated) => updated,
            None => {
                tracing::warn!("deployment id {} not found", deployment_id);
                return Err(LedgerError::not_found("deployment", deployment_id));
            }
        };

        tracing::info!(
            "deployment {} moved from {:?} to {} by {}",
            deployment.id,
            record.from_status,
            record.to_status,
            record.actor
        );

        Ok(deployment)
    }

    #[tracing::instrument(name = "service::deployment::get_by_id", skip(self))]
    pub async fn get_by_id(&self, deployment_id: &str) -> LedgerResult<Option<Deployment>> {
        Ok(self.persistence.get_by_id(deployment_id).await?)
    }

    #[tracing::instrument(name = "service::deployment::require", skip(self))]
    pub async fn require(&self, deployment_id: &str) -> LedgerResult<Deployment> {
        self.get_by_id(deployment_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("deployment", deployment_id))
    }

    #[tracing::instrument(name = "service::deployment::history", skip(self))]
    pub async fn history(&self, filter: &DeploymentFilter) -> LedgerResult<Vec<Deployment>> {
        if let Some(application_id) = &filter.application_id {
            let application = self
                .component_service
                .application_service
                .get_by_id(application_id)
                .await?;

            if application.is_none() {
                tracing::warn!("application id {} not found", application_id);
                return Err(LedgerError::not_found("application", application_id));
            }
        }

        Ok(self.persistence.query(filter).await?)
    }

    #[tracing::instrument(name = "service::deployment::transitions", skip(self))]
    pub async fn transitions(
        &self,
        deployment_id: &str,
    ) -> LedgerResult<Vec<DeploymentTransition>> {
        self.require(deployment_id).await?;

        Ok(self.persistence.get_transitions(deployment_id).await?)
    }

    #[tracing::instrument(name = "service::deployment::get_latest", skip(self))]
    pub async fn get_latest(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> LedgerResult<Option<Deployment>> {
        Ok(self
            .persistence
            .get_latest(component_id, environment)
            .await?)
    }

    #[tracing::instrument(name = "service::deployment::get_latest_successful", skip(self))]
    pub async fn get_latest_successful(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> LedgerResult<Option<Deployment>> {
        Ok(self
            .persistence
            .get_latest_successful(component_id, environment)
            .await?)
    }

    #[tracing::instrument(name = "service::deployment::get_environment_stats", skip(self))]
    pub async fn get_environment_stats(
        &self,
        environment: &Environment,
    ) -> LedgerResult<EnvironmentStats> {
        Ok(self.persistence.get_environment_stats(environment).await?)
    }
}
