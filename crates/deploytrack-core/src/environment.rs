use serde::{Deserialize, Serialize};
use std::fmt;

use crate::LedgerError;

/// A named deploy target. Environment sets differ per organization, so names are
/// an open set compared by their normalized (trimmed, lowercase) form.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Environment(String);

impl Environment {
    pub fn new(name: &str) -> Result<Self, LedgerError> {
        let normalized = name.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "environment name must not be empty".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Environment {
    type Error = LedgerError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(&name)
    }
}

impl From<Environment> for String {
    fn from(environment: Environment) -> Self {
        environment.0
    }
}
