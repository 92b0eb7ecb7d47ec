mod application;
mod component;
mod deployment;
mod health;
mod resolver;
mod version;

pub use application::ApplicationService;
pub use component::ComponentService;
pub use deployment::DeploymentService;
pub use health::{EnvironmentHealthService, RECENT_ACTIVITY_LIMIT};
pub use resolver::StateResolver;
pub use version::VersionService;

use deploytrack_core::{Application, Component};
use sqlx::PgPool;
use std::sync::Arc;

use crate::persistence::{
    memory::{DeploymentMemoryPersistence, MemoryPersistence, VersionMemoryPersistence},
    relational::{
        ApplicationRelationalPersistence, ComponentRelationalPersistence,
        DeploymentRelationalPersistence, VersionRelationalPersistence,
    },
    ComponentPersistence, DeploymentPersistence, Persistence, VersionPersistence,
};

/// Every service, wired over one storage backend.
#[derive(Clone)]
pub struct Services {
    pub application: Arc<ApplicationService>,
    pub component: Arc<ComponentService>,
    pub version: Arc<VersionService>,
    pub deployment: Arc<DeploymentService>,
    pub resolver: Arc<StateResolver>,
    pub health: Arc<EnvironmentHealthService>,
}

impl Services {
    pub fn in_memory() -> Self {
        let component_persistence = MemoryPersistence::<Component>::default();
        let deployment_persistence =
            DeploymentMemoryPersistence::new(component_persistence.clone());

        Self::new(
            Box::new(MemoryPersistence::<Application>::default()),
            Box::new(component_persistence),
            Box::new(VersionMemoryPersistence::default()),
            Box::new(deployment_persistence),
        )
    }

    pub fn relational(db: &Arc<PgPool>) -> Self {
        Self::new(
            Box::new(ApplicationRelationalPersistence {
                db: Arc::clone(db),
            }),
            Box::new(ComponentRelationalPersistence {
                db: Arc::clone(db),
            }),
            Box::new(VersionRelationalPersistence {
                db: Arc::clone(db),
            }),
            Box::new(DeploymentRelationalPersistence {
                db: Arc::clone(db),
            }),
        )
    }

    pub fn new(
        application_persistence: Box<dyn Persistence<Application>>,
        component_persistence: Box<dyn ComponentPersistence>,
        version_persistence: Box<dyn VersionPersistence>,
        deployment_persistence: Box<dyn DeploymentPersistence>,
    ) -> Self {
        let application_service = Arc::new(ApplicationService {
            persistence: application_persistence,
        });

        let component_service = Arc::new(ComponentService {
            persistence: component_persistence,

            application_service: Arc::clone(&application_service),
        });

        let version_service = Arc::new(VersionService {
            persistence: version_persistence,

            component_service: Arc::clone(&component_service),
        });

        let deployment_service = Arc::new(DeploymentService {
            persistence: deployment_persistence,

            component_service: Arc::clone(&component_service),
            version_service: Arc::clone(&version_service),
        });

        let state_resolver = Arc::new(StateResolver {
            component_service: Arc::clone(&component_service),
            deployment_service: Arc::clone(&deployment_service),
        });

        let health_service = Arc::new(EnvironmentHealthService {
            component_service: Arc::clone(&component_service),
            deployment_service: Arc::clone(&deployment_service),
            state_resolver: Arc::clone(&state_resolver),
        });

        Self {
            application: application_service,
            component: component_service,
            version: version_service,
            deployment: deployment_service,
            resolver: state_resolver,
            health: health_service,
        }
    }
}
