mod application;
mod component;
mod deployment;
mod version;

pub use application::ApplicationRelationalPersistence;
pub use component::ComponentRelationalPersistence;
pub use deployment::DeploymentRelationalPersistence;
pub use version::VersionRelationalPersistence;
