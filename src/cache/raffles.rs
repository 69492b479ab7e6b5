use crate::cache::CacheService;
use crate::models::Raffle;
use redis::AsyncCommands;

impl CacheService {
    // Получить список розыгрышей
    pub async fn get_raffles(&self) -> Vec<Raffle> {
        // Сначала пробуем кеш
        if let Ok(raffles) = self.get_raffles_from_cache().await {
            return raffles;
        }

        // Если кеш не работает - идем в БД
        if let Ok(raffles) = self.load_raffles_from_db().await {
            let _ = self.save_raffles_to_cache(&raffles).await;
            return raffles;
        }

        vec![]
    }

    async fn load_raffles_from_db(&self) -> Result<Vec<Raffle>, sqlx::Error> {
        sqlx::query_as::<_, Raffle>(
            "SELECT id, title, status, created_at
             FROM raffles
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.db.pool)
        .await
    }

    // === Работа с кешем ===
    async fn get_raffles_from_cache(&self) -> Result<Vec<Raffle>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: String = conn.get("raffles").await?;
        let raffles: Vec<Raffle> = serde_json::from_str(&data).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error"))
        })?;
        Ok(raffles)
    }

    async fn save_raffles_to_cache(&self, raffles: &[Raffle]) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(raffles).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex("raffles", data, 3600).await
    }
}
