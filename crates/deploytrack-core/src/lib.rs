mod application;
mod changelog;
mod component;
mod deployment;
mod environment;
mod error;
mod health;
mod resolution;
mod status;
mod version;

pub mod test;

pub use application::{Application, NewApplication};
pub use changelog::Changelog;
pub use component::{Component, ComponentKind, NewComponent};
pub use deployment::{
    ledger_time, Deployment, DeploymentFilter, DeploymentTransition, NewDeployment,
    RollbackRequest, StatusUpdate,
};
pub use environment::Environment;
pub use error::{LedgerError, LedgerResult};
pub use health::{
    ComponentEnvironmentState, EnvironmentOverview, EnvironmentStats, HealthStatus,
    HEALTHY_SUCCESS_RATE, WARNING_SUCCESS_RATE,
};
pub use resolution::{latest, latest_successful, ResolvedState};
pub use status::{DeploymentStatus, Transition, TransitionStamps};
pub use version::{NewVersion, Version};
