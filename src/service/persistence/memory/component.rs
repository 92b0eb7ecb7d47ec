use async_trait::async_trait;
use deploytrack_core::Component;

use super::MemoryPersistence;
use crate::persistence::ComponentPersistence;

#[async_trait]
impl ComponentPersistence for MemoryPersistence<Component> {
    async fn get_by_application_id(
        &self,
        application_id: &str,
    ) -> anyhow::Result<Vec<Component>> {
        let locked_components = self.get_models_locked()?;

        let components = locked_components
            .values()
            .filter(|component| component.application_id == application_id)
            .cloned()
            .collect();

        Ok(components)
    }
}
