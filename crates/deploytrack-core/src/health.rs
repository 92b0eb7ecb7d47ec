use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

use crate::{Component, Deployment, DeploymentStatus, Environment, ResolvedState};

pub const HEALTHY_SUCCESS_RATE: f64 = 80.0;
pub const WARNING_SUCCESS_RATE: f64 = 60.0;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
    Unknown,
}

impl HealthStatus {
    /// Maps a historical success rate (percent) onto a health label. `None` means
    /// there was nothing to measure.
    pub fn from_success_rate(success_rate: Option<f64>) -> Self {
        match success_rate {
            None => Self::Unknown,
            Some(rate) if rate >= HEALTHY_SUCCESS_RATE => Self::Healthy,
            Some(rate) if rate >= WARNING_SUCCESS_RATE => Self::Warning,
            Some(_) => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregates over every deployment ever appended to one environment.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct EnvironmentStats {
    pub status_counts: BTreeMap<DeploymentStatus, u64>,
    pub average_duration_seconds: Option<f64>,
    pub last_deployed_at: Option<DateTime<Utc>>,
}

impl EnvironmentStats {
    pub fn from_deployments<'a, I>(deployments: I) -> Self
    where
        I: IntoIterator<Item = &'a Deployment>,
    {
        let mut stats = Self::default();
        let mut duration_total = 0.0;
        let mut duration_count = 0u64;

        for deployment in deployments {
            *stats.status_counts.entry(deployment.status).or_insert(0) += 1;

            if let Some(duration) = deployment.duration() {
                duration_total += duration.num_milliseconds() as f64 / 1000.0;
                duration_count += 1;
            }

            if stats
                .last_deployed_at
                .map_or(true, |last| deployment.deployed_at > last)
            {
                stats.last_deployed_at = Some(deployment.deployed_at);
            }
        }

        if duration_count > 0 {
            stats.average_duration_seconds = Some(duration_total / duration_count as f64);
        }

        stats
    }

    pub fn count(&self, status: DeploymentStatus) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.status_counts.values().sum()
    }

    pub fn terminal(&self) -> u64 {
        self.status_counts
            .iter()
            .filter(|(status, _)| status.is_terminal())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn in_flight(&self) -> u64 {
        self.total() - self.terminal()
    }

    /// Percentage of terminal deployments that succeeded. In-flight deployments are
    /// left out of the denominator.
    pub fn success_rate(&self) -> Option<f64> {
        let terminal = self.terminal();

        if terminal == 0 {
            return None;
        }

        Some(self.count(DeploymentStatus::Success) as f64 * 100.0 / terminal as f64)
    }

    pub fn health_status(&self) -> HealthStatus {
        HealthStatus::from_success_rate(self.success_rate())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ComponentEnvironmentState {
    pub component: Component,
    pub current: ResolvedState,
    pub last_successful: Option<Deployment>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EnvironmentOverview {
    pub environment: Environment,
    pub components: Vec<ComponentEnvironmentState>,

    pub total_components: usize,
    pub deployed_components: usize,
    pub no_deployment_components: usize,
    pub successful_components: usize,
    pub failed_components: usize,
    pub in_flight_components: usize,

    pub stats: EnvironmentStats,
    pub success_rate: Option<f64>,
    pub health_status: HealthStatus,

    pub recent_activity: Vec<Deployment>,
}

impl EnvironmentOverview {
    pub fn new(
        environment: Environment,
        components: Vec<ComponentEnvironmentState>,
        stats: EnvironmentStats,
        recent_activity: Vec<Deployment>,
    ) -> Self {
        let current_count = |predicate: fn(DeploymentStatus) -> bool| {
            components
                .iter()
                .filter(|state| state.current.status().map_or(false, predicate))
                .count()
        };

        let deployed_components = components
            .iter()
            .filter(|state| state.current.is_deployed())
            .count();
        let successful_components = current_count(|status| status == DeploymentStatus::Success);
        let failed_components = current_count(|status| status == DeploymentStatus::Failed);
        let in_flight_components = current_count(|status| !status.is_terminal());

        Self {
            environment,
            total_components: components.len(),
            deployed_components,
            no_deployment_components: components.len() - deployed_components,
            successful_components,
            failed_components,
            in_flight_components,
            success_rate: stats.success_rate(),
            health_status: stats.health_status(),
            stats,
            components,
            recent_activity,
        }
    }
}
