use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::persistence::{Persistable, Persistence};

#[derive(Debug)]
pub struct MemoryPersistence<Model>
where
    Model: Persistable + Clone + Debug + Send,
{
    models: Arc<Mutex<BTreeMap<String, Model>>>,
}

#[async_trait]
impl<Model> Persistence<Model> for MemoryPersistence<Model>
where
    Model: Persistable + Clone + Debug + Send + Sync,
{
    async fn insert(&self, model: &Model) -> anyhow::Result<u64> {
        let mut locked_models = self.get_models_locked()?;

        if locked_models.contains_key(&model.get_id()) {
            return Ok(0);
        }

        locked_models.insert(model.get_id(), model.clone());

        Ok(1)
    }

    async fn get_by_id(&self, model_id: &str) -> anyhow::Result<Option<Model>> {
        let locked_models = self.get_models_locked()?;

        Ok(locked_models.get(model_id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Model>> {
        let locked_models = self.get_models_locked()?;

        let models = locked_models.values().cloned().collect();

        Ok(models)
    }
}

impl<Model> Default for MemoryPersistence<Model>
where
    Model: Persistable + Clone + Debug + Send,
{
    fn default() -> Self {
        Self {
            models: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

// clones share the same table
impl<Model> Clone for MemoryPersistence<Model>
where
    Model: Persistable + Clone + Debug + Send,
{
    fn clone(&self) -> Self {
        Self {
            models: Arc::clone(&self.models),
        }
    }
}

impl<Model> MemoryPersistence<Model>
where
    Model: Persistable + Clone + Debug + Send,
{
    pub(super) fn get_models_locked(
        &self,
    ) -> anyhow::Result<MutexGuard<BTreeMap<String, Model>>> {
        match self.models.lock() {
            Ok(locked_models) => Ok(locked_models),
            Err(_) => Err(anyhow::anyhow!("failed to acquire lock")),
        }
    }
}
