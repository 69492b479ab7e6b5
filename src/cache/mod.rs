use crate::{database::Database, redis_client::RedisClient};
use tracing::info;

pub mod drawing;
pub mod raffles;

#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    db: Database,
}

impl CacheService {
    pub fn new(redis: RedisClient, db: Database) -> Self {
        Self { redis, db }
    }

    // Прогрев кеша при старте
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");

        // Список розыгрышей нужен всем страницам
        let _ = self.get_raffles().await;

        info!("Cache warmup done");
    }
}
