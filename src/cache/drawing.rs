use crate::cache::CacheService;
use redis::AsyncCommands;
use tracing::debug;

// Кеш собранного drawing-пейлоада (метаданные + секции + места + победители).
// Инвалидируется при каждом розыгрыше и при сбросе.
impl CacheService {
    pub async fn get_cached_drawing(&self, raffle_id: i64) -> Result<Option<String>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        conn.get(drawing_key(raffle_id)).await
    }

    pub async fn cache_drawing(
        &self,
        raffle_id: i64,
        json: &str,
        ttl_seconds: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        conn.set_ex(drawing_key(raffle_id), json, ttl_seconds).await
    }

    pub async fn invalidate_drawing(&self, raffle_id: i64) {
        let mut conn = self.redis.conn.clone();
        if let Err(e) = conn.del::<_, ()>(drawing_key(raffle_id)).await {
            debug!("failed to invalidate drawing cache for raffle {}: {:?}", raffle_id, e);
        }
    }
}

fn drawing_key(raffle_id: i64) -> String {
    format!("drawing:{}", raffle_id)
}
