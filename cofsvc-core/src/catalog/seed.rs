use super::{Catalog, CatalogError};
use crate::entities::coffee::{
    CoffeeRecord, DeleteAllCoffees, ListCoffees, SaveCoffee,
};
use kanau::processor::Processor;
use tracing::info;
use uuid::Uuid;

/// Replace the catalog contents with one fresh record per name.
///
/// Must run once, before the server accepts connections. Every record gets
/// a new random UUID, so ids differ between runs. Returns the catalog as
/// listed after seeding.
pub async fn seed_catalog<S: AsRef<str>>(
    catalog: &Catalog,
    names: &[S],
) -> Result<Vec<CoffeeRecord>, CatalogError> {
    let removed = catalog.process(DeleteAllCoffees).await?;
    if removed > 0 {
        info!(removed, "Cleared existing catalog entries");
    }

    for name in names {
        let record = CoffeeRecord::new(Uuid::new_v4().to_string(), name.as_ref());
        catalog.process(SaveCoffee { record }).await?;
    }

    let seeded = catalog.process(ListCoffees).await?;
    for coffee in &seeded {
        info!(id = %coffee.id, name = %coffee.name, "Seeded coffee");
    }
    Ok(seeded)
}
