use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deploytrack_core::{NewVersion, Version};
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::VersionRow;
use crate::persistence::VersionPersistence;

#[derive(Debug)]
pub struct VersionRelationalPersistence {
    pub db: Arc<PgPool>,
}

#[async_trait]
impl VersionPersistence for VersionRelationalPersistence {
    #[tracing::instrument(name = "relational::version::create", skip_all)]
    async fn create(
        &self,
        new_version: &NewVersion,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Version>> {
        let row = sqlx::query_as::<_, VersionRow>(
            r#"
            INSERT INTO versions
               (component_id, version, branch, commit_hash, build_number,
                features, bug_fixes, breaking_changes, created_at)
            VALUES
               ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (component_id, version) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&new_version.component_id)
        .bind(&new_version.version)
        .bind(&new_version.branch)
        .bind(&new_version.commit_hash)
        .bind(&new_version.build_number)
        .bind(&new_version.features)
        .bind(&new_version.bug_fixes)
        .bind(&new_version.breaking_changes)
        .bind(created_at)
        .fetch_optional(&*self.db)
        .await?;

        Ok(row.map(Version::from))
    }

    #[tracing::instrument(name = "relational::version::get_by_id", skip_all)]
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Version>> {
        let row = sqlx::query_as::<_, VersionRow>("SELECT * FROM versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;

        Ok(row.map(Version::from))
    }

    #[tracing::instrument(name = "relational::version::get_by_component_id", skip_all)]
    async fn get_by_component_id(&self, component_id: &str) -> anyhow::Result<Vec<Version>> {
        let rows = sqlx::query_as::<_, VersionRow>(
            "SELECT * FROM versions WHERE component_id = $1 ORDER BY id",
        )
        .bind(component_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(rows.into_iter().map(Version::from).collect())
    }

    #[tracing::instrument(name = "relational::version::get_by_component_and_version", skip_all)]
    async fn get_by_component_and_version(
        &self,
        component_id: &str,
        version: &str,
    ) -> anyhow::Result<Option<Version>> {
        let row = sqlx::query_as::<_, VersionRow>(
            "SELECT * FROM versions WHERE component_id = $1 AND version = $2",
        )
        .bind(component_id)
        .bind(version)
        .fetch_optional(&*self.db)
        .await?;

        Ok(row.map(Version::from))
    }
}

#[cfg(test)]
mod tests {
    use deploytrack_core::test::get_new_version_fixture;

    use super::*;
    use crate::persistence::relational::tests::ensure_fixtures;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_create_get_duplicate() {
        dotenvy::from_filename(".env.test").ok();
        let db = ensure_fixtures().await;

        let version_persistence = VersionRelationalPersistence { db };
        let version_name = format!("1.0.0+{}", uuid::Uuid::new_v4());
        let mut new_version = get_new_version_fixture(Some(&version_name));
        new_version.features = vec!["search".to_owned(), "export".to_owned()];

        let version = version_persistence
            .create(&new_version, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(version.features, new_version.features);

        let duplicate = version_persistence
            .create(&new_version, Utc::now())
            .await
            .unwrap();
        assert!(duplicate.is_none());

        let fetched = version_persistence
            .get_by_component_and_version(&new_version.component_id, &version_name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, version.id);

        let fetched = version_persistence
            .get_by_id(version.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.version, version_name);
    }
}
