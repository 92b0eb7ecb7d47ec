use chrono::Utc;
use deploytrack_core::{Changelog, LedgerError, LedgerResult, NewVersion, Version};
use std::sync::Arc;

use super::ComponentService;
use crate::persistence::VersionPersistence;

pub struct VersionService {
    pub persistence: Box<dyn VersionPersistence>,

    pub component_service: Arc<ComponentService>,
}

impl VersionService {
    #[tracing::instrument(name = "service::version::create", skip(self))]
    pub async fn create_version(&self, new_version: NewVersion) -> LedgerResult<Version> {
        if new_version.version.trim().is_empty() {
            let message = "version must not be empty".to_owned();

            tracing::error!(message);
            return Err(LedgerError::InvalidArgument(message));
        }

        self.component_service
            .require(&new_version.component_id)
            .await?;

        let version = match self.persistence.create(&new_version, Utc::now()).await? {
            Some(version) => version,
            None => {
                let message = format!(
                    "version {} already exists for component {}",
                    new_version.version, new_version.component_id
                );

                tracing::error!(message);
                return Err(LedgerError::Conflict(message));
            }
        };

        tracing::info!("version created: {:?}", version);

        Ok(version)
    }

    #[tracing::instrument(name = "service::version::get_by_id", skip(self))]
    pub async fn get_by_id(&self, version_id: i64) -> LedgerResult<Option<Version>> {
        Ok(self.persistence.get_by_id(version_id).await?)
    }

    #[tracing::instrument(name = "service::version::get_by_component_id", skip(self))]
    pub async fn get_by_component_id(&self, component_id: &str) -> LedgerResult<Vec<Version>> {
        self.component_service.require(component_id).await?;

        Ok(self.persistence.get_by_component_id(component_id).await?)
    }

    #[tracing::instrument(name = "service::version::get_by_component_and_version", skip(self))]
    pub async fn get_by_component_and_version(
        &self,
        component_id: &str,
        version: &str,
    ) -> LedgerResult<Option<Version>> {
        Ok(self
            .persistence
            .get_by_component_and_version(component_id, version)
            .await?)
    }

    /// Lists what `to_version` introduces over `from_version` of the same component.
    #[tracing::instrument(name = "service::version::diff", skip(self))]
    pub async fn diff_versions(
        &self,
        component_id: &str,
        from_version: &str,
        to_version: &str,
    ) -> LedgerResult<Changelog> {
        self.component_service.require(component_id).await?;

        let from = self
            .get_by_component_and_version(component_id, from_version)
            .await?
            .ok_or_else(|| LedgerError::not_found("from version", from_version))?;

        let to = self
            .get_by_component_and_version(component_id, to_version)
            .await?
            .ok_or_else(|| LedgerError::not_found("to version", to_version))?;

        Ok(Changelog::between(&from, &to, Utc::now()))
    }
}
