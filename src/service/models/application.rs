use chrono::{DateTime, Utc};
use deploytrack_core::Application;

#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct ApplicationRow {
    pub id: String,
    pub name: String,
    pub owner_team: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            owner_team: row.owner_team,
            description: row.description,
            created_at: row.created_at,
        }
    }
}
