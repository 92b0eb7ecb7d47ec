use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::Version;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Changelog {
    pub component_id: String,
    pub from_version: String,
    pub to_version: String,
    pub new_features: Vec<String>,
    pub new_bug_fixes: Vec<String>,
    pub new_breaking_changes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Changelog {
    /// Everything `to` lists that `from` does not. Entries compare by exact value;
    /// version labels are never ordered.
    pub fn between(from: &Version, to: &Version, generated_at: DateTime<Utc>) -> Self {
        Self {
            component_id: to.component_id.clone(),
            from_version: from.version.clone(),
            to_version: to.version.clone(),
            new_features: added(&from.features, &to.features),
            new_bug_fixes: added(&from.bug_fixes, &to.bug_fixes),
            new_breaking_changes: added(&from.breaking_changes, &to.breaking_changes),
            generated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new_features.is_empty()
            && self.new_bug_fixes.is_empty()
            && self.new_breaking_changes.is_empty()
    }
}

fn added(from: &[String], to: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = from.iter().map(String::as_str).collect();

    to.iter()
        .filter(|entry| seen.insert(entry.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::get_version_fixture;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_reports_only_new_features() {
        let mut from = get_version_fixture(Some("1.0.0"));
        from.features = strings(&["A"]);

        let mut to = get_version_fixture(Some("1.1.0"));
        to.features = strings(&["A", "B"]);

        let changelog = Changelog::between(&from, &to, Utc::now());

        assert_eq!(changelog.new_features, strings(&["B"]));
        assert!(changelog.new_bug_fixes.is_empty());
        assert!(changelog.new_breaking_changes.is_empty());
        assert_eq!(changelog.from_version, "1.0.0");
        assert_eq!(changelog.to_version, "1.1.0");
    }

    #[test]
    fn test_keeps_order_and_collapses_duplicates() {
        let from = get_version_fixture(Some("a"));

        let mut to = get_version_fixture(Some("b"));
        to.bug_fixes = strings(&["fix-2", "fix-1", "fix-2"]);
        to.breaking_changes = strings(&["drop v1 api"]);

        let changelog = Changelog::between(&from, &to, Utc::now());

        assert_eq!(changelog.new_bug_fixes, strings(&["fix-2", "fix-1"]));
        assert_eq!(changelog.new_breaking_changes, strings(&["drop v1 api"]));
    }

    #[test]
    fn test_diff_is_directional() {
        let mut from = get_version_fixture(Some("2.0.0"));
        from.features = strings(&["A", "B"]);

        let mut to = get_version_fixture(Some("1.0.0"));
        to.features = strings(&["A"]);

        assert!(Changelog::between(&from, &to, Utc::now()).is_empty());
    }
}
