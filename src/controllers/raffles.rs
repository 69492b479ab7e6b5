use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::raffle::pool::group_for_layout;
use crate::services::drawing::{load_drawing_data, DrawingData};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/raffles", get(list_raffles))
        .route("/raffles/{raffle_id}/drawing", get(get_drawing))
}

// GET /api/raffles
async fn list_raffles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let raffles = state.cache.get_raffles().await;
    Json(json!({
        "success": true,
        "raffles": raffles,
        "count": raffles.len()
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionResponse {
    id: i64,
    name: String,
    sort_order: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeatResponse {
    id: i64,
    section_id: i64,
    row_label: String,
    seat_number: i32,
    attendee_name: Option<String>,
    is_excluded: bool,
    is_eligible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WinnerResponse {
    seat_id: i64,
    is_manual: bool,
    drawn_at: chrono::NaiveDateTime,
}

fn drawing_payload(data: &DrawingData) -> serde_json::Value {
    let sections: Vec<SectionResponse> = data
        .sections
        .iter()
        .map(|s| SectionResponse {
            id: s.id,
            name: s.name.clone(),
            sort_order: s.sort_order,
        })
        .collect();

    let seats: Vec<SeatResponse> = data
        .seats
        .iter()
        .map(|s| SeatResponse {
            id: s.id,
            section_id: s.section_id,
            row_label: s.row_label.clone(),
            seat_number: s.seat_number,
            attendee_name: s.attendee_name.clone(),
            is_excluded: s.is_excluded,
            is_eligible: s.is_eligible,
        })
        .collect();

    let winners: Vec<WinnerResponse> = data
        .winners
        .iter()
        .map(|w| WinnerResponse {
            seat_id: w.seat_id,
            is_manual: w.is_manual,
            drawn_at: w.drawn_at,
        })
        .collect();

    // Раскладка зала: секция -> ряды -> места, уже отсортировано
    let layout: Vec<serde_json::Value> = group_for_layout(&data.seats)
        .into_iter()
        .map(|group| {
            json!({
                "sectionId": group.section_id,
                "rows": group.rows.iter().map(|row| json!({
                    "rowLabel": row.row_label,
                    "seatIds": row.seats.iter().map(|s| s.id).collect::<Vec<_>>()
                })).collect::<Vec<_>>()
            })
        })
        .collect();

    json!({
        "success": true,
        "raffle": data.raffle,
        "sections": sections,
        "seats": seats,
        "layout": layout,
        "winners": winners,
        "eligibleCount": data.seats.iter().filter(|s| s.is_eligible).count()
    })
}

// Флаг живой прокрутки добавляется поверх пейлоада на каждый запрос:
// в кеш он попадать не должен (кеш живет минуты, прокрутка - секунды)
fn with_live_flag(mut payload: serde_json::Value, live: bool) -> serde_json::Value {
    payload["drawInProgress"] = json!(live);
    payload
}

fn cached_response(payload: serde_json::Value, x_cache: &'static str) -> Response {
    let mut response = Json(payload).into_response();
    response
        .headers_mut()
        .insert("X-Cache", HeaderValue::from_static(x_cache));
    response
}

// GET /api/raffles/{id}/drawing
async fn get_drawing(
    State(state): State<Arc<AppState>>,
    Path(raffle_id): Path<i64>,
) -> Result<Response, (StatusCode, String)> {
    if raffle_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "raffle_id должен быть > 0".to_string()));
    }

    let live = state.animator.is_live(raffle_id);

    // 1. Пытаемся отдать из кеша
    if let Ok(Some(cached_json)) = state.cache.get_cached_drawing(raffle_id).await {
        if let Ok(payload) = serde_json::from_str::<serde_json::Value>(&cached_json) {
            return Ok(cached_response(with_live_flag(payload, live), "HIT"));
        }
    }

    // 2. Cache Miss: собираем пейлоад из БД
    let data = load_drawing_data(&state.db, raffle_id)
        .await
        .map_err(|e| {
            tracing::error!("get_drawing sql error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось загрузить данные розыгрыша".to_string())
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Розыгрыш не найден".to_string()))?;

    let payload = drawing_payload(&data);

    // 3. Сохраняем в кеш (без флага прокрутки); ошибка кеша не мешает ответу
    if let Ok(json_str) = serde_json::to_string(&payload) {
        if let Err(e) = state.cache.cache_drawing(raffle_id, &json_str, 300).await {
            tracing::error!("failed to cache drawing payload: {:?}", e);
        }
    }

    Ok(cached_response(with_live_flag(payload, live), "MISS"))
}
