use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub type DbPool = Pool<Postgres>;

pub async fn connect_to_db(connection_string: &str) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(connection_string)?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect_with(options)
        .await?;

    info!("✅ Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("✅ Database migrations applied");

    Ok(pool)
}
