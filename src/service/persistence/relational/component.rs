use async_trait::async_trait;
use deploytrack_core::Component;
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::ComponentRow;
use crate::persistence::{ComponentPersistence, Persistence};

#[derive(Debug)]
pub struct ComponentRelationalPersistence {
    pub db: Arc<PgPool>,
}

#[async_trait]
impl Persistence<Component> for ComponentRelationalPersistence {
    #[tracing::instrument(name = "relational::component::insert", skip_all)]
    async fn insert(&self, component: &Component) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO components
               (id, application_id, name, kind, repository_url, health_check_url, created_at)
            VALUES
               ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&component.id)
        .bind(&component.application_id)
        .bind(&component.name)
        .bind(component.kind.as_str())
        .bind(&component.repository_url)
        .bind(&component.health_check_url)
        .bind(component.created_at)
        .execute(&*self.db)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::component::get_by_id", skip_all)]
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Component>> {
        let row = sqlx::query_as::<_, ComponentRow>("SELECT * FROM components WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;

        Ok(row.map(Component::from))
    }

    #[tracing::instrument(name = "relational::component::list", skip_all)]
    async fn list(&self) -> anyhow::Result<Vec<Component>> {
        let rows = sqlx::query_as::<_, ComponentRow>("SELECT * FROM components ORDER BY id")
            .fetch_all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(Component::from).collect())
    }
}

#[async_trait]
impl ComponentPersistence for ComponentRelationalPersistence {
    #[tracing::instrument(name = "relational::component::get_by_application_id", skip_all)]
    async fn get_by_application_id(
        &self,
        application_id: &str,
    ) -> anyhow::Result<Vec<Component>> {
        let rows = sqlx::query_as::<_, ComponentRow>(
            "SELECT * FROM components WHERE application_id = $1 ORDER BY id",
        )
        .bind(application_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(rows.into_iter().map(Component::from).collect())
    }
}
