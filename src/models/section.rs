use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub raffle_id: i64,
    pub name: String,
    pub sort_order: i32,
}
