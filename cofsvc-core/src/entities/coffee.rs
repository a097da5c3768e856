use crate::framework::DatabaseProcessor;
use cofsvc_sdk::objects::Coffee;
use kanau::processor::Processor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CoffeeRecord {
    pub id: String,
    pub name: String,
}

impl CoffeeRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<CoffeeRecord> for Coffee {
    fn from(record: CoffeeRecord) -> Self {
        Coffee {
            id: record.id,
            name: record.name,
        }
    }
}

/// List every coffee in storage order.
#[derive(Debug, Clone, Copy)]
pub struct ListCoffees;

/// Look a coffee up by its identifier.
#[derive(Debug, Clone)]
pub struct GetCoffeeById {
    pub id: String,
}

/// Remove every coffee. Yields the number of removed records.
#[derive(Debug, Clone, Copy)]
pub struct DeleteAllCoffees;

/// Insert a coffee, replacing the name of an existing record with the same id.
#[derive(Debug, Clone)]
pub struct SaveCoffee {
    pub record: CoffeeRecord,
}

impl Processor<ListCoffees> for DatabaseProcessor {
    type Output = Vec<CoffeeRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCoffees")]
    async fn process(&self, _query: ListCoffees) -> Result<Vec<CoffeeRecord>, sqlx::Error> {
        sqlx::query_as::<_, CoffeeRecord>(
            r#"
            SELECT id, name
            FROM coffees
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

impl Processor<GetCoffeeById> for DatabaseProcessor {
    type Output = Option<CoffeeRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCoffeeById")]
    async fn process(&self, query: GetCoffeeById) -> Result<Option<CoffeeRecord>, sqlx::Error> {
        sqlx::query_as::<_, CoffeeRecord>(
            r#"
            SELECT id, name
            FROM coffees
            WHERE id = $1
            "#,
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

impl Processor<DeleteAllCoffees> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteAllCoffees")]
    async fn process(&self, _command: DeleteAllCoffees) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM coffees")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl Processor<SaveCoffee> for DatabaseProcessor {
    type Output = CoffeeRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SaveCoffee")]
    async fn process(&self, command: SaveCoffee) -> Result<CoffeeRecord, sqlx::Error> {
        sqlx::query_as::<_, CoffeeRecord>(
            r#"
            INSERT INTO coffees (id, name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(command.record.id)
        .bind(command.record.name)
        .fetch_one(&self.pool)
        .await
    }
}
