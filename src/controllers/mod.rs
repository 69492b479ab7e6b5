pub mod raffles;
pub mod drawing;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(raffles::routes())
        .merge(drawing::routes())
}
