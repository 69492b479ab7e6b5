use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub section_id: i64,
    pub row_label: String,
    pub seat_number: i32,
    pub attendee_name: Option<String>,
    pub is_excluded: bool,
    /// Вычисляется на сервере: занято, не исключено и еще не выигрывало.
    pub is_eligible: bool,
}
