//! Credit score route definitions

use axum::{routing::get, Router};

use crate::handlers::score::get_score;
use crate::state::AppState;

pub fn score_routes() -> Router<AppState> {
    Router::new().route("/api/score", get(get_score))
}
