mod application;
mod component;
mod deployment;
mod transition;
mod version;

pub use application::ApplicationRow;
pub use component::ComponentRow;
pub use deployment::DeploymentRow;
pub use transition::TransitionRow;
pub use version::VersionRow;
