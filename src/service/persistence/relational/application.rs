use async_trait::async_trait;
use deploytrack_core::Application;
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::ApplicationRow;
use crate::persistence::Persistence;

#[derive(Debug)]
pub struct ApplicationRelationalPersistence {
    pub db: Arc<PgPool>,
}

#[async_trait]
impl Persistence<Application> for ApplicationRelationalPersistence {
    #[tracing::instrument(name = "relational::application::insert", skip_all)]
    async fn insert(&self, application: &Application) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO applications
               (id, name, owner_team, description, created_at)
            VALUES
               ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&application.id)
        .bind(&application.name)
        .bind(&application.owner_team)
        .bind(&application.description)
        .bind(application.created_at)
        .execute(&*self.db)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::application::get_by_id", skip_all)]
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;

        Ok(row.map(Application::from))
    }

    #[tracing::instrument(name = "relational::application::list", skip_all)]
    async fn list(&self) -> anyhow::Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications ORDER BY id")
            .fetch_all(&*self.db)
            .await?;

        let models = rows.into_iter().map(Application::from).collect();

        Ok(models)
    }
}
