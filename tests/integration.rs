use chrono::Duration;

use deploytrack::services::Services;
use deploytrack_core::{
    test::fixture_time, ComponentKind, DeploymentFilter, DeploymentStatus, HealthStatus,
    LedgerError, NewApplication, NewComponent, NewDeployment, NewVersion, ResolvedState,
    RollbackRequest, StatusUpdate,
};

fn new_version(component_id: &str, version: &str, features: &[&str]) -> NewVersion {
    NewVersion {
        component_id: component_id.to_owned(),
        version: version.to_owned(),
        branch: "main".to_owned(),
        commit_hash: format!("{:0>40}", version.replace('.', "")),
        features: features.iter().map(|feature| feature.to_string()).collect(),
        ..Default::default()
    }
}

fn new_deployment(
    component_id: &str,
    version_id: i64,
    status: DeploymentStatus,
    minutes: i64,
) -> NewDeployment {
    NewDeployment {
        component_id: component_id.to_owned(),
        version_id,
        environment: "prod".to_owned(),
        deployed_by: "pipeline".to_owned(),
        initial_status: Some(status),
        deployed_at: Some(fixture_time() + Duration::minutes(minutes)),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_e2e() {
    dotenvy::from_filename(".env.test").ok();

    let services = Services::in_memory();

    // register the application and its components
    services
        .application
        .create_application(NewApplication {
            id: "storefront".to_owned(),
            name: "Storefront".to_owned(),
            owner_team: "commerce".to_owned(),
            description: "public shop".to_owned(),
        })
        .await
        .unwrap();

    for (component_id, kind) in [("checkout", "backend"), ("catalog-ui", "Frontend")] {
        services
            .component
            .create_component(NewComponent {
                id: component_id.to_owned(),
                application_id: "storefront".to_owned(),
                name: component_id.to_owned(),
                kind: ComponentKind::from(kind),
                repository_url: None,
                health_check_url: None,
            })
            .await
            .unwrap();
    }

    let components = services
        .component
        .get_by_application_id("storefront")
        .await
        .unwrap();
    assert_eq!(components.len(), 2);
    assert!(components
        .iter()
        .any(|component| component.kind == ComponentKind::Frontend));

    // versions
    let v1 = services
        .version
        .create_version(new_version("checkout", "1.0.0", &["A"]))
        .await
        .unwrap();
    let v2 = services
        .version
        .create_version(new_version("checkout", "1.1.0", &["A", "B"]))
        .await
        .unwrap();
    let ui_version = services
        .version
        .create_version(new_version("catalog-ui", "3.2.0", &[]))
        .await
        .unwrap();

    let error = services
        .version
        .create_version(new_version("checkout", "1.1.0", &["C"]))
        .await
        .unwrap_err();
    assert!(matches!(error, LedgerError::Conflict(_)));
    assert_eq!(
        services
            .version
            .get_by_component_id("checkout")
            .await
            .unwrap()
            .len(),
        2
    );

    let changelog = services
        .version
        .diff_versions("checkout", "1.0.0", "1.1.0")
        .await
        .unwrap();
    assert_eq!(changelog.new_features, vec!["B"]);
    assert!(changelog.new_bug_fixes.is_empty());
    assert!(changelog.new_breaking_changes.is_empty());

    // nothing deployed yet
    let state = services
        .resolver
        .resolve_current("checkout", "prod")
        .await
        .unwrap();
    assert_eq!(state, ResolvedState::NoDeployment);

    let overview = services
        .health
        .resolve_environment_overview("prod")
        .await
        .unwrap();
    assert_eq!(overview.health_status, HealthStatus::Unknown);
    assert_eq!(overview.no_deployment_components, 2);

    // a version of another component is rejected and nothing is written
    let error = services
        .deployment
        .append_deployment(new_deployment(
            "checkout",
            ui_version.id,
            DeploymentStatus::Pending,
            0,
        ))
        .await
        .unwrap_err();
    assert!(matches!(error, LedgerError::InvalidReference(_)));
    assert!(services
        .deployment
        .history(&DeploymentFilter::default())
        .await
        .unwrap()
        .is_empty());

    // history: success, success, failed, success
    let mut deployments = Vec::new();
    for (minutes, status) in [
        DeploymentStatus::Success,
        DeploymentStatus::Success,
        DeploymentStatus::Failed,
        DeploymentStatus::Success,
    ]
    .into_iter()
    .enumerate()
    {
        let deployment = services
            .deployment
            .append_deployment(new_deployment("checkout", v1.id, status, minutes as i64))
            .await
            .unwrap();
        deployments.push(deployment);
    }

    let overview = services
        .health
        .resolve_environment_overview("prod")
        .await
        .unwrap();
    assert_eq!(overview.success_rate, Some(75.0));
    assert_eq!(overview.health_status, HealthStatus::Warning);
    assert_eq!(overview.deployed_components, 1);
    assert_eq!(overview.successful_components, 1);

    // a new rollout goes through its lifecycle
    let rollout = services
        .deployment
        .append_deployment(new_deployment(
            "checkout",
            v2.id,
            DeploymentStatus::Pending,
            10,
        ))
        .await
        .unwrap();

    let state = services
        .resolver
        .resolve_current("checkout", "prod")
        .await
        .unwrap();
    assert_eq!(state.deployment().map(|d| d.id.as_str()), Some(rollout.id.as_str()));

    let error = services
        .deployment
        .update_deployment_status(
            &rollout.id,
            StatusUpdate {
                status: "done".to_owned(),
                updated_by: "pipeline".to_owned(),
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(error, LedgerError::InvalidStatus(_)));
    assert_eq!(
        services
            .deployment
            .require(&rollout.id)
            .await
            .unwrap()
            .status,
        DeploymentStatus::Pending
    );

    for status in ["in_progress", "failed"] {
        services
            .deployment
            .update_deployment_status(
                &rollout.id,
                StatusUpdate {
                    status: status.to_owned(),
                    updated_by: "pipeline".to_owned(),
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    let failed = services.deployment.require(&rollout.id).await.unwrap();
    assert!(failed.duration().is_some());

    // roll back to the last good version
    let rollback = services
        .deployment
        .rollback(
            &rollout.id,
            RollbackRequest {
                deployed_by: "oncall".to_owned(),
                notes: "checkout errors".to_owned(),
                version_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(rollback.version_id, v1.id);
    assert_eq!(rollback.rollback_from.as_deref(), Some(rollout.id.as_str()));
    assert_eq!(
        services.deployment.require(&rollout.id).await.unwrap(),
        failed
    );

    let current = services
        .resolver
        .resolve_current("checkout", "prod")
        .await
        .unwrap();
    assert_eq!(current.status(), Some(DeploymentStatus::Rollback));

    let last_successful = services
        .resolver
        .resolve_last_successful("checkout", "prod")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last_successful.id, deployments[3].id);

    let history = services
        .deployment
        .history(
            &DeploymentFilter::default()
                .with_component("checkout")
                .with_status(DeploymentStatus::Success)
                .with_limit(2),
        )
        .await
        .unwrap();
    let history_ids: Vec<&str> = history.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(
        history_ids,
        vec![deployments[3].id.as_str(), deployments[1].id.as_str()]
    );

    let overview = services
        .health
        .resolve_environment_overview("prod")
        .await
        .unwrap();
    assert_eq!(overview.stats.total(), 6);
    assert_eq!(overview.recent_activity.len(), 5);
    assert_eq!(overview.recent_activity[0].id, rollback.id);
}
