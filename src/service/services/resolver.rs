use deploytrack_core::{
    Component, ComponentEnvironmentState, Deployment, Environment, LedgerResult, ResolvedState,
};
use std::sync::Arc;

use super::{ComponentService, DeploymentService};

/// Answers "what is running where" straight from the ledger on every call.
pub struct StateResolver {
    pub component_service: Arc<ComponentService>,
    pub deployment_service: Arc<DeploymentService>,
}

impl StateResolver {
    #[tracing::instrument(name = "service::resolver::resolve_current", skip(self))]
    pub async fn resolve_current(
        &self,
        component_id: &str,
        environment: &str,
    ) -> LedgerResult<ResolvedState> {
        let environment = Environment::new(environment)?;
        self.component_service.require(component_id).await?;

        let latest = self
            .deployment_service
            .get_latest(component_id, &environment)
            .await?;

        Ok(ResolvedState::from(latest))
    }

    #[tracing::instrument(name = "service::resolver::resolve_last_successful", skip(self))]
    pub async fn resolve_last_successful(
        &self,
        component_id: &str,
        environment: &str,
    ) -> LedgerResult<Option<Deployment>> {
        let environment = Environment::new(environment)?;
        self.component_service.require(component_id).await?;

        self.deployment_service
            .get_latest_successful(component_id, &environment)
            .await
    }

    #[tracing::instrument(name = "service::resolver::component_state", skip_all)]
    pub async fn component_state(
        &self,
        component: Component,
        environment: &Environment,
    ) -> LedgerResult<ComponentEnvironmentState> {
        let current = self
            .deployment_service
            .get_latest(&component.id, environment)
            .await?;
        let last_successful = self
            .deployment_service
            .get_latest_successful(&component.id, environment)
            .await?;

        Ok(ComponentEnvironmentState {
            component,
            current: ResolvedState::from(current),
            last_successful,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use deploytrack_core::{
        test::{
            fixture_time, get_new_application_fixture, get_new_component_fixture,
            get_new_deployment_fixture, get_new_version_fixture,
        },
        DeploymentStatus, LedgerError,
    };

    use super::*;
    use crate::services::Services;

    async fn seeded_services() -> (Services, i64) {
        let services = Services::in_memory();

        services
            .application
            .create_application(get_new_application_fixture(None))
            .await
            .unwrap();
        services
            .component
            .create_component(get_new_component_fixture(None))
            .await
            .unwrap();
        let version = services
            .version
            .create_version(get_new_version_fixture(None))
            .await
            .unwrap();

        (services, version.id)
    }

    #[tokio::test]
    async fn test_resolve_current_follows_deployed_at() {
        dotenvy::from_filename(".env.test").ok();

        let (services, version_id) = seeded_services().await;
        let component_id = get_new_component_fixture(None).id;

        let state = services
            .resolver
            .resolve_current(&component_id, "prod")
            .await
            .unwrap();
        assert_eq!(state, ResolvedState::NoDeployment);

        let mut later = get_new_deployment_fixture(version_id, Some("prod"));
        later.initial_status = Some(DeploymentStatus::Failed);
        later.deployed_at = Some(fixture_time() + Duration::hours(1));
        let later = services.deployment.append_deployment(later).await.unwrap();

        // reported late but happened earlier
        let mut earlier = get_new_deployment_fixture(version_id, Some("prod"));
        earlier.initial_status = Some(DeploymentStatus::Success);
        earlier.deployed_at = Some(fixture_time());
        let earlier = services.deployment.append_deployment(earlier).await.unwrap();

        let state = services
            .resolver
            .resolve_current(&component_id, "PROD")
            .await
            .unwrap();
        assert_eq!(state.deployment(), Some(&later));

        let last_successful = services
            .resolver
            .resolve_last_successful(&component_id, "prod")
            .await
            .unwrap();
        assert_eq!(last_successful, Some(earlier));
    }

    #[tokio::test]
    async fn test_resolve_current_tie_breaks_on_id() {
        dotenvy::from_filename(".env.test").ok();

        let (services, version_id) = seeded_services().await;
        let component_id = get_new_component_fixture(None).id;

        let mut ids = Vec::new();
        for _ in 0..3 {
            let mut new_deployment = get_new_deployment_fixture(version_id, Some("prod"));
            new_deployment.deployed_at = Some(fixture_time());
            let deployment = services
                .deployment
                .append_deployment(new_deployment)
                .await
                .unwrap();
            ids.push(deployment.id);
        }

        let greatest_id = ids.iter().max().cloned();

        let state = services
            .resolver
            .resolve_current(&component_id, "prod")
            .await
            .unwrap();
        assert_eq!(state.deployment().map(|d| d.id.clone()), greatest_id);
    }

    #[tokio::test]
    async fn test_resolve_unknown_component() {
        dotenvy::from_filename(".env.test").ok();

        let services = Services::in_memory();

        let error = services
            .resolver
            .resolve_current("missing", "prod")
            .await
            .unwrap_err();
        assert!(matches!(error, LedgerError::NotFound { entity: "component", .. }));
    }
}
