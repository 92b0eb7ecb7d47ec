use deploytrack_core::{DeploymentFilter, Environment, EnvironmentOverview, LedgerResult};
use std::sync::Arc;

use super::{ComponentService, DeploymentService, StateResolver};

pub const RECENT_ACTIVITY_LIMIT: u32 = 5;

pub struct EnvironmentHealthService {
    pub component_service: Arc<ComponentService>,
    pub deployment_service: Arc<DeploymentService>,
    pub state_resolver: Arc<StateResolver>,
}

impl EnvironmentHealthService {
    #[tracing::instrument(name = "service::health::resolve_environment_overview", skip(self))]
    pub async fn resolve_environment_overview(
        &self,
        environment: &str,
    ) -> LedgerResult<EnvironmentOverview> {
        let environment = Environment::new(environment)?;

        let mut components = Vec::new();
        for component in self.component_service.list().await? {
            components.push(
                self.state_resolver
                    .component_state(component, &environment)
                    .await?,
            );
        }

        let stats = self
            .deployment_service
            .get_environment_stats(&environment)
            .await?;

        let recent_activity = self
            .deployment_service
            .history(
                &DeploymentFilter::default()
                    .with_environment(environment.clone())
                    .with_limit(RECENT_ACTIVITY_LIMIT),
            )
            .await?;

        let overview = EnvironmentOverview::new(environment, components, stats, recent_activity);

        tracing::info!(
            "environment {} is {} ({} of {} components deployed)",
            overview.environment,
            overview.health_status,
            overview.deployed_components,
            overview.total_components
        );

        Ok(overview)
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
        DeploymentStatus, HealthStatus, ResolvedState,
    };

    use super::*;
    use crate::services::Services;

    #[tokio::test]
    async fn test_overview_counts_and_health() {
        dotenvy::from_filename(".env.test").ok();

        let services = Services::in_memory();
        services
            .application
            .create_application(get_new_application_fixture(None))
            .await
            .unwrap();

        for component_id in ["api", "web", "worker"] {
            services
                .component
                .create_component(get_new_component_fixture(Some(component_id)))
                .await
                .unwrap();
        }

        let mut api_version = get_new_version_fixture(None);
        api_version.component_id = "api".to_owned();
        let api_version = services.version.create_version(api_version).await.unwrap();

        let mut web_version = get_new_version_fixture(None);
        web_version.component_id = "web".to_owned();
        let web_version = services.version.create_version(web_version).await.unwrap();

        let statuses = [
            DeploymentStatus::Success,
            DeploymentStatus::Success,
            DeploymentStatus::Failed,
            DeploymentStatus::Success,
            DeploymentStatus::Success,
            DeploymentStatus::Success,
            DeploymentStatus::InProgress,
        ];

        for (minute, status) in statuses.iter().enumerate() {
            let mut new_deployment = get_new_deployment_fixture(api_version.id, Some("prod"));
            new_deployment.component_id = "api".to_owned();
            new_deployment.initial_status = Some(*status);
            new_deployment.deployed_at = Some(fixture_time() + Duration::minutes(minute as i64));
            services
                .deployment
                .append_deployment(new_deployment)
                .await
                .unwrap();
        }

        let mut web_deployment = get_new_deployment_fixture(web_version.id, Some("prod"));
        web_deployment.component_id = "web".to_owned();
        web_deployment.initial_status = Some(DeploymentStatus::Failed);
        web_deployment.deployed_at = Some(fixture_time());
        services
            .deployment
            .append_deployment(web_deployment)
            .await
            .unwrap();

        let overview = services
            .health
            .resolve_environment_overview("prod")
            .await
            .unwrap();

        assert_eq!(overview.total_components, 3);
        assert_eq!(overview.deployed_components, 2);
        assert_eq!(overview.no_deployment_components, 1);
        assert_eq!(overview.in_flight_components, 1);
        assert_eq!(overview.failed_components, 1);
        assert_eq!(overview.successful_components, 0);

        // 5 successes over 7 terminal rows; the in-progress row is left out
        assert_eq!(overview.stats.total(), 8);
        assert_eq!(overview.stats.terminal(), 7);
        let success_rate = overview.success_rate.unwrap();
        assert!((success_rate - 500.0 / 7.0).abs() < 1e-9);
        assert_eq!(overview.health_status, HealthStatus::Warning);

        assert_eq!(overview.recent_activity.len(), RECENT_ACTIVITY_LIMIT as usize);
        assert_eq!(
            overview.recent_activity[0].status,
            DeploymentStatus::InProgress
        );

        let worker = overview
            .components
            .iter()
            .find(|state| state.component.id == "worker")
            .unwrap();
        assert_eq!(worker.current, ResolvedState::NoDeployment);
        assert!(worker.last_successful.is_none());

        let api = overview
            .components
            .iter()
            .find(|state| state.component.id == "api")
            .unwrap();
        assert_eq!(api.current.status(), Some(DeploymentStatus::InProgress));
        assert_eq!(
            api.last_successful.as_ref().map(|d| d.deployed_at),
            Some(fixture_time() + Duration::minutes(5))
        );
    }

    #[tokio::test]
    async fn test_empty_environment_is_unknown() {
        dotenvy::from_filename(".env.test").ok();

        let services = Services::in_memory();

        let overview = services
            .health
            .resolve_environment_overview("qa")
            .await
            .unwrap();

        assert_eq!(overview.total_components, 0);
        assert_eq!(overview.success_rate, None);
        assert_eq!(overview.health_status, HealthStatus::Unknown);
        assert!(overview.recent_activity.is_empty());
    }
}
