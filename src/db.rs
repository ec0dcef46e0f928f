use anyhow::Context;
use diesel::{
    prelude::*,
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};

use crate::config::Config;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_POSTS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS posts (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Builds the shared connection pool and prepares the schema.
///
/// Checks out one connection to verify the database is actually reachable,
/// then ensures the `posts` table exists. Any failure here is fatal to
/// startup; the caller exits before serving traffic.
pub fn init_pool(config: &Config) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    // Refer to the `r2d2` documentation for more methods to use
    // when building a connection pool
    let pool = Pool::builder()
        .test_on_check_out(true)
        .build(manager)
        .context("could not build connection pool")?;

    let mut conn = pool
        .get()
        .context("failed to check out a database connection")?;

    diesel::sql_query("SELECT 1")
        .execute(&mut conn)
        .context("failed to ping database")?;
    tracing::info!("successfully connected to database");

    diesel::sql_query(CREATE_POSTS_TABLE)
        .execute(&mut conn)
        .context("failed to create posts table")?;
    tracing::info!("posts table created or already exists");

    Ok(pool)
}
