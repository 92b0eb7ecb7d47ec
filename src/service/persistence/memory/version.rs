use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deploytrack_core::{NewVersion, Version};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::persistence::VersionPersistence;

#[derive(Debug, Default)]
struct VersionTable {
    last_id: i64,
    versions: BTreeMap<i64, Version>,
}

#[derive(Debug, Default)]
pub struct VersionMemoryPersistence {
    table: Arc<Mutex<VersionTable>>,
}

#[async_trait]
impl VersionPersistence for VersionMemoryPersistence {
    async fn create(
        &self,
        new_version: &NewVersion,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Version>> {
        let mut locked_table = self.get_table_locked()?;

        let exists = locked_table.versions.values().any(|version| {
            version.component_id == new_version.component_id
                && version.version == new_version.version
        });

        if exists {
            return Ok(None);
        }

        locked_table.last_id += 1;
        let version = Version::new(locked_table.last_id, new_version.clone(), created_at);
        locked_table.versions.insert(version.id, version.clone());

        Ok(Some(version))
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Version>> {
        let locked_table = self.get_table_locked()?;

        Ok(locked_table.versions.get(&id).cloned())
    }

    async fn get_by_component_id(&self, component_id: &str) -> anyhow::Result<Vec<Version>> {
        let locked_table = self.get_table_locked()?;

        let versions = locked_table
            .versions
            .values()
            .filter(|version| version.component_id == component_id)
            .cloned()
            .collect();

        Ok(versions)
    }

    async fn get_by_component_and_version(
        &self,
        component_id: &str,
        version: &str,
    ) -> anyhow::Result<Option<Version>> {
        let locked_table = self.get_table_locked()?;

        let found = locked_table
            .versions
            .values()
            .find(|candidate| {
                candidate.component_id == component_id && candidate.version == version
            })
            .cloned();

        Ok(found)
    }
}

impl VersionMemoryPersistence {
    fn get_table_locked(&self) -> anyhow::Result<MutexGuard<VersionTable>> {
        match self.table.lock() {
            Ok(locked_table) => Ok(locked_table),
            Err(_) => Err(anyhow::anyhow!("failed to acquire lock")),
        }
    }
}
