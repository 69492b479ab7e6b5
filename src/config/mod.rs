use serde::Deserialize;
use std::env;

use crate::raffle::DrawTuning;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub draw: DrawConfig,
    pub notify: NotifyConfig,
    pub features: FeatureFlags,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Настройки Redis
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

// Тюнинг анимации розыгрыша
#[derive(Debug, Clone, Deserialize)]
pub struct DrawConfig {
    pub steps: usize,
    pub honing_steps: usize,
    pub near_window: usize,
    pub step_delay_min_ms: u64,
    pub step_delay_max_ms: u64,
    pub confetti_particles: usize,
}

// Уведомление о победителе (опциональный вебхук)
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub timeout_seconds: u64,
}

// Feature flags для включения/выключения функциональности
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_auth: bool,
    pub enable_notify: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "seat_raffle=debug,tower_http=debug".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                pool_size: env::var("DB_POOL_SIZE")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("DB_POOL_SIZE must be a valid number"),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").expect("REDIS_URL must be set"),
            },
            draw: DrawConfig {
                steps: env_or("DRAW_STEPS", 35),
                honing_steps: env_or("DRAW_HONING_STEPS", 8),
                // Окно "прицеливания" из оригинального эффекта; свободный параметр
                near_window: env_or("DRAW_NEAR_WINDOW", 15),
                step_delay_min_ms: env_or("DRAW_STEP_DELAY_MIN_MS", 50),
                step_delay_max_ms: env_or("DRAW_STEP_DELAY_MAX_MS", 450),
                confetti_particles: env_or("DRAW_CONFETTI_PARTICLES", 80),
            },
            notify: NotifyConfig {
                webhook_url: env::var("WINNER_WEBHOOK_URL").ok(),
                timeout_seconds: env_or("WINNER_WEBHOOK_TIMEOUT_SECONDS", 5),
            },
            features: FeatureFlags {
                enable_auth: env::var("ENABLE_AUTH")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .expect("ENABLE_AUTH must be true or false"),
                enable_notify: env::var("ENABLE_NOTIFY")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .expect("ENABLE_NOTIFY must be true or false"),
            },
        }
    }
}

impl DrawConfig {
    pub fn tuning(&self) -> DrawTuning {
        DrawTuning {
            steps: self.steps,
            honing_steps: self.honing_steps,
            near_window: self.near_window,
            step_delay_min_ms: self.step_delay_min_ms,
            step_delay_max_ms: self.step_delay_max_ms,
            confetti_particles: self.confetti_particles,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T
where
    T::Err: std::fmt::Debug,
{
    match env::var(key) {
        Ok(v) => v.parse().unwrap_or_else(|e| panic!("{key} must be a valid number: {e:?}")),
        Err(_) => default,
    }
}
