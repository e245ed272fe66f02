use crate::model::error::DatabaseResult;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const MAX_POOL_CONNECTIONS: u32 = 10;

/// Handle to the postgres pool. Cloning is cheap, PgPool is an Arc inside.
#[derive(Debug, Clone)]
pub struct DbConnection {
    pool: PgPool,
}

impl DbConnection {
    /// Lazy connect: the first query opens the actual connection, so this
    /// never blocks startup on an unreachable database.
    pub fn connect(connection_str: &str) -> DatabaseResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_POOL_CONNECTIONS)
            .connect_lazy(connection_str)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
