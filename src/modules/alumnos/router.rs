use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_alumno, delete_alumno, desinscribir, get_alumno, get_alumno_cursos, get_alumnos,
    inscribir, update_alumno,
};

pub fn init_alumnos_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_alumno).get(get_alumnos))
        .route(
            "/{id}",
            get(get_alumno).put(update_alumno).delete(delete_alumno),
        )
        .route("/{id}/cursos", get(get_alumno_cursos))
        .route("/{id}/inscribir/{curso_id}", post(inscribir))
        .route("/{id}/desinscribir/{curso_id}", post(desinscribir))
}
