use chrono::Utc;
use deploytrack_core::{Application, LedgerError, LedgerResult, NewApplication};

use crate::persistence::Persistence;

pub struct ApplicationService {
    pub persistence: Box<dyn Persistence<Application>>,
}

impl ApplicationService {
    #[tracing::instrument(name = "service::application::create", skip(self))]
    pub async fn create_application(
        &self,
        new_application: NewApplication,
    ) -> LedgerResult<Application> {
        if new_application.id.trim().is_empty() {
            let message = "application id must not be empty".to_owned();

            tracing::error!(message);
            return Err(LedgerError::InvalidArgument(message));
        }

        let application = Application::new(new_application, Utc::now());
        let inserted_count = self.persistence.insert(&application).await?;

        if inserted_count == 0 {
            let message = format!("application id {} already exists", application.id);

            tracing::error!(message);
            return Err(LedgerError::Conflict(message));
        }

        tracing::info!("application created: {:?}", application);

        Ok(application)
    }

    #[tracing::instrument(name = "service::application::get_by_id", skip(self))]
    pub async fn get_by_id(&self, application_id: &str) -> LedgerResult<Option<Application>> {
        Ok(self.persistence.get_by_id(application_id).await?)
    }

    #[tracing::instrument(name = "service::application::list", skip(self))]
    pub async fn list(&self) -> LedgerResult<Vec<Application>> {
        Ok(self.persistence.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use deploytrack_core::test::get_new_application_fixture;

    use super::*;
    use crate::persistence::memory::MemoryPersistence;

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        dotenvy::from_filename(".env.test").ok();

        let application_service = ApplicationService {
            persistence: Box::new(MemoryPersistence::<Application>::default()),
        };

        let application = application_service
            .create_application(get_new_application_fixture(None))
            .await
            .unwrap();

        let error = application_service
            .create_application(get_new_application_fixture(None))
            .await
            .unwrap_err();
        assert!(matches!(error, LedgerError::Conflict(_)));

        let applications = application_service.list().await.unwrap();
        assert_eq!(applications, vec![application]);
    }

    #[tokio::test]
    async fn test_create_empty_id_is_rejected() {
        dotenvy::from_filename(".env.test").ok();

        let application_service = ApplicationService {
            persistence: Box::new(MemoryPersistence::<Application>::default()),
        };

        let error = application_service
            .create_application(get_new_application_fixture(Some(" ")))
            .await
            .unwrap_err();
        assert!(matches!(error, LedgerError::InvalidArgument(_)));
    }
}
