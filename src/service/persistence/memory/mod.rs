mod component;
mod deployment;
mod generic;
mod version;

pub use deployment::DeploymentMemoryPersistence;
pub use generic::MemoryPersistence;
pub use version::VersionMemoryPersistence;
