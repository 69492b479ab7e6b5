use crate::database::Database;
use crate::models::{Raffle, RaffleWinner, Seat, Section};

/// Полное состояние розыгрыша для страницы зала. Флаг is_eligible считается
/// в запросе: место занято, не исключено и еще не выигрывало в этом розыгрыше.
#[derive(Debug, Clone)]
pub struct DrawingData {
    pub raffle: Raffle,
    pub sections: Vec<Section>,
    pub seats: Vec<Seat>,
    pub winners: Vec<RaffleWinner>,
}

pub async fn load_drawing_data(
    db: &Database,
    raffle_id: i64,
) -> Result<Option<DrawingData>, sqlx::Error> {
    let raffle = sqlx::query_as::<_, Raffle>(
        "SELECT id, title, status, created_at FROM raffles WHERE id = $1",
    )
    .bind(raffle_id)
    .fetch_optional(&db.pool)
    .await?;

    let Some(raffle) = raffle else {
        return Ok(None);
    };

    let sections = sqlx::query_as::<_, Section>(
        "SELECT id, raffle_id, name, sort_order
         FROM sections
         WHERE raffle_id = $1
         ORDER BY sort_order, id",
    )
    .bind(raffle_id)
    .fetch_all(&db.pool)
    .await?;

    // Порядок мест фиксирован: он же является порядком пула для анимации
    let seats = sqlx::query_as::<_, Seat>(
        r#"
        SELECT s.id, s.section_id, s.row_label, s.seat_number, s.attendee_name, s.is_excluded,
               (s.attendee_name IS NOT NULL
                AND NOT s.is_excluded
                AND w.seat_id IS NULL) AS is_eligible
        FROM seats s
        JOIN sections sec ON sec.id = s.section_id
        LEFT JOIN raffle_winners w ON w.seat_id = s.id AND w.raffle_id = $1
        WHERE sec.raffle_id = $1
        ORDER BY sec.sort_order, sec.id, s.row_label, s.seat_number
        "#,
    )
    .bind(raffle_id)
    .fetch_all(&db.pool)
    .await?;

    let winners = sqlx::query_as::<_, RaffleWinner>(
        "SELECT id, raffle_id, seat_id, is_manual, drawn_at
         FROM raffle_winners
         WHERE raffle_id = $1
         ORDER BY drawn_at",
    )
    .bind(raffle_id)
    .fetch_all(&db.pool)
    .await?;

    Ok(Some(DrawingData {
        raffle,
        sections,
        seats,
        winners,
    }))
}

/// Записывает победителя. Уникальный индекс (raffle_id, seat_id) страхует
/// от повторной записи того же места.
pub async fn record_winner(
    db: &Database,
    raffle_id: i64,
    seat_id: i64,
    is_manual: bool,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO raffle_winners (raffle_id, seat_id, is_manual)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(raffle_id)
    .bind(seat_id)
    .bind(is_manual)
    .fetch_one(&db.pool)
    .await
}

/// Сброс: удаляет всех записанных победителей розыгрыша одной транзакцией.
/// Возвращает количество удаленных записей.
pub async fn reset_raffle(db: &Database, raffle_id: i64) -> Result<u64, sqlx::Error> {
    let mut tx = db.pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM raffle_winners WHERE raffle_id = $1")
        .bind(raffle_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted)
}
