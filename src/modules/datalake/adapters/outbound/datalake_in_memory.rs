use crate::modules::datalake::adapters::outbound::datalake_repository::DatalakeRepository;
use crate::modules::datalake::core::datalake_entry::DatalakeEntry;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryDatalake {
    rows: RwLock<BTreeMap<Uuid, DatalakeEntry>>,
    is_offline: bool,
}

impl InMemoryDatalake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn ensure_online(&self) -> anyhow::Result<()> {
        if self.is_offline {
            anyhow::bail!("Datalake offline");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatalakeRepository for InMemoryDatalake {
    async fn upsert(&self, entry: &DatalakeEntry) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.rows.write().await.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.rows.write().await.clear();
        Ok(())
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<DatalakeEntry>> {
        self.ensure_online()?;
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<DatalakeEntry>> {
        self.ensure_online()?;
        Ok(self.rows.read().await.values().cloned().collect())
    }
}
