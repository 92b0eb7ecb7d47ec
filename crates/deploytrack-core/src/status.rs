use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::LedgerError;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    #[default]
    Pending,
    InProgress,
    Success,
    Failed,
    Rollback,
}

impl DeploymentStatus {
    pub const ALL: [DeploymentStatus; 5] = [
        DeploymentStatus::Pending,
        DeploymentStatus::InProgress,
        DeploymentStatus::Success,
        DeploymentStatus::Failed,
        DeploymentStatus::Rollback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Rollback => "rollback",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Rollback)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentStatus {
    type Err = LedgerError;

    fn from_str(status: &str) -> Result<Self, Self::Err> {
        match status {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "rollback" => Ok(Self::Rollback),
            _ => Err(LedgerError::InvalidStatus(status.to_string())),
        }
    }
}

/// Timestamps a transition wants written. Stores only fill fields that are still unset.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TransitionStamps {
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A validated move of a deployment into `to`.
///
/// Transitions are never rejected for their direction: `success -> failed` is a
/// legitimate operational correction and is recorded in the audit trail instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    pub to: DeploymentStatus,
    pub stamps: TransitionStamps,
}

impl Transition {
    pub fn to(status: DeploymentStatus, now: DateTime<Utc>) -> Self {
        let stamps = match status {
            DeploymentStatus::InProgress => TransitionStamps {
                started_at: Some(now),
                completed_at: None,
            },
            status if status.is_terminal() => TransitionStamps {
                started_at: None,
                completed_at: Some(now),
            },
            _ => TransitionStamps::default(),
        };

        Self { to: status, stamps }
    }

    /// Validates a raw status value and plans its timestamp stamps.
    pub fn parse(status: &str, now: DateTime<Utc>) -> Result<Self, LedgerError> {
        let status = DeploymentStatus::from_str(status)?;

        Ok(Self::to(status, now))
    }

    /// Fills in the planned stamps on fields that are still unset.
    pub fn apply_stamps(
        &self,
        started_at: &mut Option<DateTime<Utc>>,
        completed_at: &mut Option<DateTime<Utc>>,
    ) {
        if started_at.is_none() {
            *started_at = self.stamps.started_at;
        }

        if completed_at.is_none() {
            *completed_at = self.stamps.completed_at;
        }
    }
}
