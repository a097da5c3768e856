//! Catalog lookup over a pluggable storage backend.
//!
//! Every operation is a request struct from [`crate::entities::coffee`]
//! handled through [`Processor`]. [`Catalog`] dispatches to the configured
//! backend and folds backend errors into [`CatalogError`].

mod memory;
mod seed;

pub use memory::MemoryCatalog;
pub use seed::seed_catalog;

use crate::entities::coffee::{
    CoffeeRecord, DeleteAllCoffees, GetCoffeeById, ListCoffees, SaveCoffee,
};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use std::convert::Infallible;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<Infallible> for CatalogError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// The catalog backend selected at startup.
#[derive(Clone)]
pub enum Catalog {
    Memory(MemoryCatalog),
    Postgres(DatabaseProcessor),
}

impl Catalog {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Catalog::Memory(_) => "memory",
            Catalog::Postgres(_) => "postgres",
        }
    }
}

impl Processor<ListCoffees> for Catalog {
    type Output = Vec<CoffeeRecord>;
    type Error = CatalogError;

    async fn process(&self, query: ListCoffees) -> Result<Vec<CoffeeRecord>, CatalogError> {
        match self {
            Catalog::Memory(memory) => Ok(memory.process(query).await?),
            Catalog::Postgres(db) => Ok(db.process(query).await?),
        }
    }
}

impl Processor<GetCoffeeById> for Catalog {
    type Output = Option<CoffeeRecord>;
    type Error = CatalogError;

    async fn process(&self, query: GetCoffeeById) -> Result<Option<CoffeeRecord>, CatalogError> {
        match self {
            Catalog::Memory(memory) => Ok(memory.process(query).await?),
            Catalog::Postgres(db) => Ok(db.process(query).await?),
        }
    }
}

impl Processor<DeleteAllCoffees> for Catalog {
    type Output = u64;
    type Error = CatalogError;

    async fn process(&self, command: DeleteAllCoffees) -> Result<u64, CatalogError> {
        match self {
            Catalog::Memory(memory) => Ok(memory.process(command).await?),
            Catalog::Postgres(db) => Ok(db.process(command).await?),
        }
    }
}

impl Processor<SaveCoffee> for Catalog {
    type Output = CoffeeRecord;
    type Error = CatalogError;

    async fn process(&self, command: SaveCoffee) -> Result<CoffeeRecord, CatalogError> {
        match self {
            Catalog::Memory(memory) => Ok(memory.process(command).await?),
            Catalog::Postgres(db) => Ok(db.process(command).await?),
        }
    }
}
