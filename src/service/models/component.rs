use chrono::{DateTime, Utc};
use deploytrack_core::{Component, ComponentKind};

#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct ComponentRow {
    pub id: String,
    pub application_id: String,
    pub name: String,
    pub kind: String,
    pub repository_url: Option<String>,
    pub health_check_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ComponentRow> for Component {
    fn from(row: ComponentRow) -> Self {
        Self {
            id: row.id,
            application_id: row.application_id,
            name: row.name,
            kind: ComponentKind::from(row.kind),
            repository_url: row.repository_url,
            health_check_url: row.health_check_url,
            created_at: row.created_at,
        }
    }
}
