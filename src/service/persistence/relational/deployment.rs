use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deploytrack_core::{
    Deployment, DeploymentFilter, DeploymentStatus, DeploymentTransition, Environment,
    EnvironmentStats,
};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::{str::FromStr, sync::Arc};

use crate::models::{DeploymentRow, TransitionRow};
use crate::persistence::{DeploymentPersistence, Persistence, StatusChange};

const NEWEST_FIRST: &str = r#" ORDER BY deployed_at DESC, id COLLATE "C" DESC"#;

#[derive(Debug)]
pub struct DeploymentRelationalPersistence {
    pub db: Arc<PgPool>,
}

#[derive(sqlx::FromRow)]
struct StatusCountRow {
    status: String,
    count: i64,
    last_deployed_at: Option<DateTime<Utc>>,
}

fn to_deployments(rows: Vec<DeploymentRow>) -> anyhow::Result<Vec<Deployment>> {
    rows.into_iter().map(Deployment::try_from).collect()
}

async fn insert_transition(
    tx: &mut Transaction<'_, Postgres>,
    transition: &DeploymentTransition,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO deployment_transitions
           (deployment_id, from_status, to_status, actor, notes, transitioned_at)
        VALUES
           ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&transition.deployment_id)
    .bind(transition.from_status.map(|status| status.as_str()))
    .bind(transition.to_status.as_str())
    .bind(&transition.actor)
    .bind(&transition.notes)
    .bind(transition.transitioned_at)
    .execute(&mut *tx)
    .await?;

    Ok(())
}

#[async_trait]
impl Persistence<Deployment> for DeploymentRelationalPersistence {
    #[tracing::instrument(name = "relational::deployment::insert", skip_all)]
    async fn insert(&self, deployment: &Deployment) -> anyhow::Result<u64> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO deployments
               (id, component_id, version_id, environment, status, deployed_by, deployed_at,
                started_at, completed_at, rollback_from, notes, metadata)
            VALUES
               ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&deployment.id)
        .bind(&deployment.component_id)
        .bind(deployment.version_id)
        .bind(deployment.environment.as_str())
        .bind(deployment.status.as_str())
        .bind(&deployment.deployed_by)
        .bind(deployment.deployed_at)
        .bind(deployment.started_at)
        .bind(deployment.completed_at)
        .bind(&deployment.rollback_from)
        .bind(&deployment.notes)
        .bind(&deployment.metadata)
        .execute(&mut tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        insert_transition(&mut tx, &DeploymentTransition::created(deployment)).await?;

        tx.commit().await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::deployment::get_by_id", skip_all)]
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Deployment>> {
        let row = sqlx::query_as::<_, DeploymentRow>("SELECT * FROM deployments WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;

        row.map(Deployment::try_from).transpose()
    }

    #[tracing::instrument(name = "relational::deployment::list", skip_all)]
    async fn list(&self) -> anyhow::Result<Vec<Deployment>> {
        self.query(&DeploymentFilter::default()).await
    }
}

#[async_trait]
impl DeploymentPersistence for DeploymentRelationalPersistence {
    #[tracing::instrument(name = "relational::deployment::get_latest", skip_all)]
    async fn get_latest(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> anyhow::Result<Option<Deployment>> {
        let row = sqlx::query_as::<_, DeploymentRow>(&format!(
            "SELECT * FROM deployments WHERE component_id = $1 AND environment = $2{NEWEST_FIRST} LIMIT 1"
        ))
        .bind(component_id)
        .bind(environment.as_str())
        .fetch_optional(&*self.db)
        .await?;

        row.map(Deployment::try_from).transpose()
    }

    #[tracing::instrument(name = "relational::deployment::get_latest_successful", skip_all)]
    async fn get_latest_successful(
        &self,
        component_id: &str,
        environment: &Environment,
    ) -> anyhow::Result<Option<Deployment>> {
        let row = sqlx::query_as::<_, DeploymentRow>(&format!(
            "SELECT * FROM deployments WHERE component_id = $1 AND environment = $2 AND status = $3{NEWEST_FIRST} LIMIT 1"
        ))
        .bind(component_id)
        .bind(environment.as_str())
        .bind(DeploymentStatus::Success.as_str())
        .fetch_optional(&*self.db)
        .await?;

        row.map(Deployment::try_from).transpose()
    }

    #[tracing::instrument(name = "relational::deployment::query", skip_all)]
    async fn query(&self, filter: &DeploymentFilter) -> anyhow::Result<Vec<Deployment>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM deployments WHERE TRUE");

        if let Some(application_id) = &filter.application_id {
            builder
                .push(" AND component_id IN (SELECT id FROM components WHERE application_id = ")
                .push_bind(application_id)
                .push(")");
        }

        if let Some(component_id) = &filter.component_id {
            builder.push(" AND component_id = ").push_bind(component_id);
        }

        if let Some(environment) = &filter.environment {
            builder
                .push(" AND environment = ")
                .push_bind(environment.as_str());
        }

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }

        builder.push(NEWEST_FIRST);

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        if let Some(offset) = filter.offset {
            builder.push(" OFFSET ").push_bind(i64::from(offset));
        }

        let rows = builder
            .build_query_as::<DeploymentRow>()
            .fetch_all(&*self.db)
            .await?;

        to_deployments(rows)
    }

    #[tracing::instrument(name = "relational::deployment::get_environment_stats", skip_all)]
    async fn get_environment_stats(
        &self,
        environment: &Environment,
    ) -> anyhow::Result<EnvironmentStats> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            r#"
            SELECT
                status,
                COUNT(*) AS count,
                MAX(deployed_at) AS last_deployed_at
            FROM deployments
            WHERE environment = $1
            GROUP BY status
            "#,
        )
        .bind(environment.as_str())
        .fetch_all(&*self.db)
        .await?;

        let duration = sqlx::query_as::<_, (Option<f64>,)>(
            r#"
            SELECT AVG(EXTRACT(EPOCH FROM (completed_at - started_at)))::FLOAT8
            FROM deployments
            WHERE environment = $1
              AND started_at IS NOT NULL
              AND completed_at IS NOT NULL
            "#,
        )
        .bind(environment.as_str())
        .fetch_one(&*self.db)
        .await?;

        let mut stats = EnvironmentStats {
            average_duration_seconds: duration.0,
            ..EnvironmentStats::default()
        };

        for row in rows {
            let status = DeploymentStatus::from_str(&row.status)?;
            stats.status_counts.insert(status, row.count as u64);

            if row.last_deployed_at > stats.last_deployed_at {
                stats.last_deployed_at = row.last_deployed_at;
            }
        }

        Ok(stats)
    }

    #[tracing::instrument(name = "relational::deployment::apply_status_change", skip_all)]
    async fn apply_status_change(
        &self,
        deployment_id: &str,
        change: &StatusChange,
    ) -> anyhow::Result<Option<(Deployment, DeploymentTransition)>> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, DeploymentRow>(
            "SELECT * FROM deployments WHERE id = $1 FOR UPDATE",
        )
        .bind(deployment_id)
        .fetch_optional(&mut tx)
        .await?;

        let mut deployment = match current {
            Some(row) => Deployment::try_from(row)?,
            None => {
                tx.rollback().await?;
                return Ok(None);
            }
        };

        let record = change.audit_record(deployment_id, deployment.status);

        deployment.status = change.transition.to;
        change
            .transition
            .apply_stamps(&mut deployment.started_at, &mut deployment.completed_at);
        if let Some(notes) = &change.notes {
            deployment.notes = notes.clone();
        }

        sqlx::query(
            r#"
            UPDATE deployments
            SET status = $2, started_at = $3, completed_at = $4, notes = $5
            WHERE id = $1
            "#,
        )
        .bind(deployment_id)
        .bind(deployment.status.as_str())
        .bind(deployment.started_at)
        .bind(deployment.completed_at)
        .bind(&deployment.notes)
        .execute(&mut tx)
        .await?;

        insert_transition(&mut tx, &record).await?;

        tx.commit().await?;

        Ok(Some((deployment, record)))
    }

    #[tracing::instrument(name = "relational::deployment::get_transitions", skip_all)]
    async fn get_transitions(
        &self,
        deployment_id: &str,
    ) -> anyhow::Result<Vec<DeploymentTransition>> {
        let rows = sqlx::query_as::<_, TransitionRow>(
            r#"
            SELECT deployment_id, from_status, to_status, actor, notes, transitioned_at
            FROM deployment_transitions
            WHERE deployment_id = $1
            ORDER BY id
            "#,
        )
        .bind(deployment_id)
        .fetch_all(&*self.db)
        .await?;

        rows.into_iter().map(DeploymentTransition::try_from).collect()
    }
}
