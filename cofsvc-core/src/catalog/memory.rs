//! In-process catalog backend.

use crate::entities::coffee::{
    CoffeeRecord, DeleteAllCoffees, GetCoffeeById, ListCoffees, SaveCoffee,
};
use kanau::processor::Processor;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Catalog held in memory, in insertion order.
///
/// Cloning is cheap; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    records: Arc<RwLock<Vec<CoffeeRecord>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = CoffeeRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records.into_iter().collect())),
        }
    }
}

impl Processor<ListCoffees> for MemoryCatalog {
    type Output = Vec<CoffeeRecord>;
    type Error = Infallible;

    async fn process(&self, _query: ListCoffees) -> Result<Vec<CoffeeRecord>, Infallible> {
        Ok(self.records.read().await.clone())
    }
}

impl Processor<GetCoffeeById> for MemoryCatalog {
    type Output = Option<CoffeeRecord>;
    type Error = Infallible;

    async fn process(&self, query: GetCoffeeById) -> Result<Option<CoffeeRecord>, Infallible> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == query.id).cloned())
    }
}

impl Processor<DeleteAllCoffees> for MemoryCatalog {
    type Output = u64;
    type Error = Infallible;

    async fn process(&self, _command: DeleteAllCoffees) -> Result<u64, Infallible> {
        let mut records = self.records.write().await;
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }
}

impl Processor<SaveCoffee> for MemoryCatalog {
    type Output = CoffeeRecord;
    type Error = Infallible;

    async fn process(&self, command: SaveCoffee) -> Result<CoffeeRecord, Infallible> {
        let mut records = self.records.write().await;
        let record = command.record;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => existing.name = record.name.clone(),
            None => records.push(record.clone()),
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryCatalog {
        MemoryCatalog::with_records([
            CoffeeRecord::new("000-TEST-111", "Tester's Choice"),
            CoffeeRecord::new("000-TEST-222", "Maxfail House"),
        ])
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let catalog = sample();
        let all = catalog.process(ListCoffees).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["000-TEST-111", "000-TEST-222"]);

        // Restartable: a second listing yields the same records.
        assert_eq!(catalog.process(ListCoffees).await.unwrap(), all);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let catalog = sample();
        let found = catalog
            .process(GetCoffeeById {
                id: "000-TEST-222".into(),
            })
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.name), Some("Maxfail House".to_string()));

        let missing = catalog
            .process(GetCoffeeById {
                id: "000-TEST-999".into(),
            })
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing_id() {
        let catalog = sample();
        catalog
            .process(SaveCoffee {
                record: CoffeeRecord::new("000-TEST-111", "Renamed"),
            })
            .await
            .unwrap();
        let all = catalog.process(ListCoffees).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_all() {
        let catalog = sample();
        assert_eq!(catalog.process(DeleteAllCoffees).await.unwrap(), 2);
        assert!(catalog.process(ListCoffees).await.unwrap().is_empty());
        assert_eq!(catalog.process(DeleteAllCoffees).await.unwrap(), 0);
    }
}
