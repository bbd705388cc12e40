use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    add_nucleo_to_curso, create_curso, delete_curso, get_curso, get_curso_alumnos,
    get_curso_nucleos, get_cursos, get_promedio_nucleo, update_curso,
};

pub fn init_cursos_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cursos).post(create_curso))
        .route(
            "/{id}",
            get(get_curso).put(update_curso).delete(delete_curso),
        )
        .route("/{id}/alumnos", get(get_curso_alumnos))
        .route(
            "/{id}/nucleos",
            get(get_curso_nucleos).post(add_nucleo_to_curso),
        )
        .route("/{id}/promedio/{nucleo_id}", get(get_promedio_nucleo))
}
