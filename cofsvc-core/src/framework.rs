use sqlx::PgPool;

/// Runs catalog operations against PostgreSQL.
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
