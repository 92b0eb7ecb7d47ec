use chrono::Utc;
use deploytrack_core::{Component, LedgerError, LedgerResult, NewComponent};
use std::sync::Arc;

use super::ApplicationService;
use crate::persistence::ComponentPersistence;

pub struct ComponentService {
    pub persistence: Box<dyn ComponentPersistence>,

    pub application_service: Arc<ApplicationService>,
}

impl ComponentService {
    #[tracing::instrument(name = "service::component::create", skip(self))]
    pub async fn create_component(&self, new_component: NewComponent) -> LedgerResult<Component> {
        if new_component.id.trim().is_empty() {
            let message = "component id must not be empty".to_owned();

            tracing::error!(message);
            return Err(LedgerError::InvalidArgument(message));
        }

        let application = self
            .application_service
            .get_by_id(&new_component.application_id)
            .await?;

        if application.is_none() {
            tracing::error!(
                "application id {} not found: can't create component {}",
                new_component.application_id,
                new_component.id
            );
            return Err(LedgerError::not_found(
                "application",
                &new_component.application_id,
            ));
        }

        let component = Component::new(new_component, Utc::now());
        let inserted_count = self.persistence.insert(&component).await?;

        if inserted_count == 0 {
            let message = format!("component id {} already exists", component.id);

            tracing::error!(message);
            return Err(LedgerError::Conflict(message));
        }

        tracing::info!("component created: {:?}", component);

        Ok(component)
    }

    #[tracing::instrument(name = "service::component::get_by_id", skip(self))]
    pub async fn get_by_id(&self, component_id: &str) -> LedgerResult<Option<Component>> {
        Ok(self.persistence.get_by_id(component_id).await?)
    }

    /// Like [`Self::get_by_id`] but an unknown component is an error.
    #[tracing::instrument(name = "service::component::require", skip(self))]
    pub async fn require(&self, component_id: &str) -> LedgerResult<Component> {
        match self.persistence.get_by_id(component_id).await? {
            Some(component) => Ok(component),
            None => {
                tracing::warn!("component id {} not found", component_id);
                Err(LedgerError::not_found("component", component_id))
            }
        }
    }

    #[tracing::instrument(name = "service::component::get_by_application_id", skip(self))]
    pub async fn get_by_application_id(
        &self,
        application_id: &str,
    ) -> LedgerResult<Vec<Component>> {
        Ok(self
            .persistence
            .get_by_application_id(application_id)
            .await?)
    }

    #[tracing::instrument(name = "service::component::list", skip(self))]
    pub async fn list(&self) -> LedgerResult<Vec<Component>> {
        Ok(self.persistence.list().await?)
    }
}
