use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{delete_nota, get_nota, update_nota};

pub fn init_notas_router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_nota).put(update_nota).delete(delete_nota))
}
