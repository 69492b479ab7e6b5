use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::raffle::draw::{pick_winner, RevealPlan};
use crate::raffle::pool::EligiblePool;
use crate::services::drawing::{load_drawing_data, record_winner, reset_raffle};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/raffles/{raffle_id}/draw", post(draw))
        .route("/raffles/{raffle_id}/draw/progress", get(draw_progress))
        .route("/raffles/{raffle_id}/reset", post(reset))
}

fn action_conflict(msg: &str) -> (StatusCode, String) {
    (StatusCode::CONFLICT, msg.to_string())
}

// POST /api/raffles/{id}/draw
#[derive(Debug, Deserialize)]
struct DrawRequest {
    #[serde(rename = "isManual", default)]
    is_manual: bool,
    #[serde(rename = "winningSeatId")]
    winning_seat_id: Option<i64>,
}

async fn draw(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
    Path(raffle_id): Path<i64>,
    Json(req): Json<DrawRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if raffle_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "raffle_id должен быть > 0".to_string()));
    }

    // Прокрутка уже идет - второй розыгрыш не запускаем
    if state.animator.is_live(raffle_id) {
        return Err(action_conflict("Розыгрыш уже идет"));
    }

    // Всегда свежие данные: кеш для розыгрыша не используется
    let data = load_drawing_data(&state.db, raffle_id)
        .await
        .map_err(|e| {
            tracing::error!("draw: failed to load raffle {}: {:?}", raffle_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось загрузить данные розыгрыша".to_string())
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Розыгрыш не найден".to_string()))?;

    let pool = EligiblePool::from_seats(&data.seats);
    if pool.is_empty() {
        // Не ошибка, а недоступное действие: все места уже разыграны/исключены
        return Err(action_conflict("Нет мест, доступных для розыгрыша"));
    }

    // Победитель фиксируется ДО анимации; план - только эффект раскрытия
    let (winner_seat, plan) = if req.is_manual {
        let seat_id = req
            .winning_seat_id
            .ok_or((StatusCode::BAD_REQUEST, "Для ручного розыгрыша нужен winningSeatId".to_string()))?;
        let index = pool
            .index_of(seat_id)
            .ok_or_else(|| action_conflict("Указанное место недоступно для розыгрыша"))?;
        (pool.get(index).expect("index from index_of"), None)
    } else {
        // ThreadRng не живет через await: выбор и план строим одним блоком
        let tuning = state.config.draw.tuning();
        let mut rng = rand::rng();
        let winner_index = pick_winner(&pool, &mut rng).map_err(|e| {
            tracing::error!("draw: sampler failed: {:?}", e);
            action_conflict("Нет мест, доступных для розыгрыша")
        })?;
        let plan = RevealPlan::build(&pool, winner_index, &tuning, &state.audio, &mut rng)
            .map_err(|e| {
                tracing::error!("draw: failed to build reveal plan: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось построить анимацию".to_string())
            })?;
        (pool.get(winner_index).expect("winner index in pool"), Some(plan))
    };

    // Записываем победителя до старта прокрутки: результат авторитетен,
    // анимация его только показывает
    record_winner(&state.db, raffle_id, winner_seat.id, req.is_manual)
        .await
        .map_err(|e| {
            tracing::error!("draw: failed to record winner: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось записать победителя".to_string())
        })?;

    tracing::info!(
        "raffle {}: seat {} drawn (manual={}) by {}",
        raffle_id,
        winner_seat.id,
        req.is_manual,
        user.email
    );

    if let Some(ref plan) = plan {
        // Гонка со вторым запросом возможна; победитель уже записан,
        // проигравший запуск просто остается без серверной прокрутки
        if let Err(e) = state.animator.start(raffle_id, plan.clone()) {
            tracing::warn!("draw: {}", e);
        }
    }

    // Вебхук и кеш не влияют на ответ
    if state.config.features.enable_notify {
        state.notifier.notify_winner(raffle_id, winner_seat.id, req.is_manual);
    }
    state.cache.invalidate_drawing(raffle_id).await;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "winner": {
                "seatId": winner_seat.id,
                "sectionId": winner_seat.section_id,
                "rowLabel": winner_seat.row_label,
                "seatNumber": winner_seat.seat_number,
                "attendeeName": winner_seat.attendee_name,
            },
            "plan": plan
        })),
    ))
}

// GET /api/raffles/{id}/draw/progress
async fn draw_progress(
    State(state): State<Arc<AppState>>,
    Path(raffle_id): Path<i64>,
) -> impl IntoResponse {
    match state.animator.progress(raffle_id) {
        Some(progress) => Json(json!({ "active": true, "progress": progress })),
        None => Json(json!({ "active": false })),
    }
}

// POST /api/raffles/{id}/reset
async fn reset(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
    Path(raffle_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if raffle_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "raffle_id должен быть > 0".to_string()));
    }

    tracing::warn!("RESET: raffle {} by {}", raffle_id, user.email);

    // Останавливаем прокрутку, если идет
    state.animator.cancel(raffle_id);

    let deleted = reset_raffle(&state.db, raffle_id).await.map_err(|e| {
        tracing::error!("RESET: failed for raffle {}: {:?}", raffle_id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось сбросить розыгрыш".to_string())
    })?;

    state.cache.invalidate_drawing(raffle_id).await;

    tracing::info!("RESET: raffle {} cleared, {} winners deleted", raffle_id, deleted);

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Все победители розыгрыша сброшены",
            "details": {
                "winnersDeleted": deleted
            }
        })),
    ))
}
