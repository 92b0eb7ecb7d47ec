use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    pub owner_team: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NewApplication {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_team: String,
    #[serde(default)]
    pub description: String,
}

impl Application {
    pub fn new(new_application: NewApplication, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_application.id,
            name: new_application.name,
            owner_team: new_application.owner_team,
            description: new_application.description,
            created_at,
        }
    }
}
