use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;

use crate::{
    ENV,
    api::error,
    constants::StorageBackend,
    modules::friendship::{
        repository::FriendshipRepository, repository_memory::FriendshipRepositoryMemory,
        repository_pg::FriendshipRepositoryPg,
    },
};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let database_url = ENV
        .database_url
        .as_deref()
        .ok_or_else(|| error::SystemError::internal("DATABASE_URL is not configured"))?;

    let pool = PgPoolOptions::new()
        .max_connections(ENV.database_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), error::SystemError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations applied");
    Ok(())
}

pub async fn build_friendship_repository()
-> Result<Arc<dyn FriendshipRepository>, error::SystemError> {
    match ENV.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_database().await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(FriendshipRepositoryPg::new(pool)))
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory friendship store; data is lost on restart");
            Ok(Arc::new(FriendshipRepositoryMemory::new()))
        }
    }
}
