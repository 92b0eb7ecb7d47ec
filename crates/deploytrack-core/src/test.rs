use chrono::{TimeZone, Utc};

use crate::{
    Application, Component, ComponentKind, Deployment, DeploymentStatus, Environment,
    NewApplication, NewComponent, NewDeployment, NewVersion, Version,
};

pub fn get_new_application_fixture(id: Option<&str>) -> NewApplication {
    let id = id.unwrap_or("application-fixture").to_string();

    NewApplication {
        name: format!("{id} name"),
        id,
        owner_team: "platform".to_owned(),
        description: "customer portal".to_owned(),
    }
}

pub fn get_application_fixture(id: Option<&str>) -> Application {
    Application::new(get_new_application_fixture(id), fixture_time())
}

pub fn get_new_component_fixture(id: Option<&str>) -> NewComponent {
    let application = get_new_application_fixture(None);
    let id = id.unwrap_or("component-fixture").to_string();

    NewComponent {
        name: id.clone(),
        id,
        application_id: application.id,
        kind: ComponentKind::Backend,
        repository_url: Some("git@github.com:example/portal-api".to_owned()),
        health_check_url: Some("https://portal.example.com/health".to_owned()),
    }
}

pub fn get_component_fixture(id: Option<&str>) -> Component {
    Component::new(get_new_component_fixture(id), fixture_time())
}

pub fn get_new_version_fixture(version: Option<&str>) -> NewVersion {
    let component = get_new_component_fixture(None);
    let version = version.unwrap_or("1.0.0").to_string();

    NewVersion {
        component_id: component.id,
        branch: "main".to_owned(),
        commit_hash: format!("{:0>40}", version.replace('.', "")),
        build_number: Some("42".to_owned()),
        version,
        features: vec![],
        bug_fixes: vec![],
        breaking_changes: vec![],
    }
}

pub fn get_version_fixture(version: Option<&str>) -> Version {
    Version::new(1, get_new_version_fixture(version), fixture_time())
}

pub fn get_new_deployment_fixture(version_id: i64, environment: Option<&str>) -> NewDeployment {
    let component = get_new_component_fixture(None);

    NewDeployment {
        component_id: component.id,
        version_id,
        environment: environment.unwrap_or("dev").to_owned(),
        deployed_by: "deployer@example.com".to_owned(),
        notes: "fixture deployment".to_owned(),
        ..Default::default()
    }
}

pub fn get_deployment_fixture(id: Option<&str>) -> Deployment {
    let component = get_new_component_fixture(None);

    Deployment {
        id: id.unwrap_or("deployment-fixture").to_string(),
        component_id: component.id,
        version_id: 1,
        environment: Environment::new("dev").expect("fixture environment is valid"),
        status: DeploymentStatus::Pending,
        deployed_by: "deployer@example.com".to_owned(),
        deployed_at: fixture_time(),
        started_at: None,
        completed_at: None,
        rollback_from: None,
        notes: String::new(),
        metadata: serde_json::json!({}),
    }
}

pub fn fixture_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 11, 1, 12, 0, 0)
        .single()
        .expect("fixture time is unambiguous")
}
