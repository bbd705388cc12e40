use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    add_nota_to_nucleo, create_nucleo, delete_nucleo, get_nucleo, update_nucleo,
};

pub fn init_nucleos_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_nucleo))
        .route(
            "/{id}",
            get(get_nucleo).put(update_nucleo).delete(delete_nucleo),
        )
        .route("/{id}/notas", post(add_nota_to_nucleo))
}
