use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Raffle {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RaffleWinner {
    pub id: i64,
    pub raffle_id: i64,
    pub seat_id: i64,
    pub is_manual: bool,
    pub drawn_at: NaiveDateTime,
}
