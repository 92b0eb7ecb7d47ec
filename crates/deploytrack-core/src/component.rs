use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a component is. Deployment targets name their own kinds, so anything
/// outside the well-known set is carried as `Other`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Frontend,
    Backend,
    Microservice,
    Database,
    Infrastructure,
    Other(String),
}

impl ComponentKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Microservice => "microservice",
            Self::Database => "database",
            Self::Infrastructure => "infrastructure",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for ComponentKind {
    fn from(kind: &str) -> Self {
        let kind = kind.trim().to_lowercase();

        match kind.as_str() {
            "frontend" => Self::Frontend,
            "backend" => Self::Backend,
            "microservice" => Self::Microservice,
            "database" => Self::Database,
            "infrastructure" => Self::Infrastructure,
            _ => Self::Other(kind),
        }
    }
}

impl From<String> for ComponentKind {
    fn from(kind: String) -> Self {
        Self::from(kind.as_str())
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Component {
    pub id: String,
    pub application_id: String,
    pub name: String,
    pub kind: ComponentKind,
    pub repository_url: Option<String>,
    pub health_check_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NewComponent {
    pub id: String,
    pub application_id: String,
    pub name: String,
    pub kind: ComponentKind,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub health_check_url: Option<String>,
}

impl Component {
    pub fn new(new_component: NewComponent, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_component.id,
            application_id: new_component.application_id,
            name: new_component.name,
            kind: new_component.kind,
            repository_url: new_component.repository_url,
            health_check_url: new_component.health_check_url,
            created_at,
        }
    }
}
