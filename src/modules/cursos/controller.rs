use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use gradebook_core::{AppError, ErrorResponse};
use gradebook_models::MessageResponse;

use crate::extractors::{JsonBody, PathParams};
use crate::modules::alumnos::model::Alumno;
use crate::modules::cursos::model::{
    CreateCursoDto, Curso, CursoDetail, CursoFilterParams, CursoId, UpdateCursoDto,
};
use crate::modules::cursos::service::CursoService;
use crate::modules::nucleos::model::{CreateNucleoDto, NucleoDetail, NucleoId};
use crate::modules::nucleos::service::NucleoService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/cursos",
    params(CursoFilterParams),
    responses(
        (status = 200, description = "List of courses", body = Vec<Curso>)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn get_cursos(
    State(state): State<AppState>,
    Query(filters): Query<CursoFilterParams>,
) -> Result<Json<Vec<Curso>>, AppError> {
    let cursos = CursoService::find_all(&state.db, filters).await?;
    Ok(Json(cursos))
}

#[utoipa::path(
    post,
    path = "/api/cursos",
    request_body = CreateCursoDto,
    responses(
        (status = 201, description = "Course created", body = Curso),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "A course with the same name already exists", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn create_curso(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<CreateCursoDto>,
) -> Result<(StatusCode, Json<Curso>), AppError> {
    let curso = CursoService::save(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(curso)))
}

#[utoipa::path(
    get,
    path = "/api/cursos/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course with units, grades and students", body = CursoDetail),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn get_curso(
    State(state): State<AppState>,
    PathParams(id): PathParams<CursoId>,
) -> Result<Json<CursoDetail>, AppError> {
    let curso = CursoService::find_by_id(&state.db, id).await?;
    Ok(Json(curso))
}

#[utoipa::path(
    put,
    path = "/api/cursos/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    request_body = UpdateCursoDto,
    responses(
        (status = 200, description = "Course updated", body = Curso),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "A course with the same name already exists", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn update_curso(
    State(state): State<AppState>,
    PathParams(id): PathParams<CursoId>,
    JsonBody(dto): JsonBody<UpdateCursoDto>,
) -> Result<Json<Curso>, AppError> {
    let curso = CursoService::update(&state.db, id, dto).await?;
    Ok(Json(curso))
}

#[utoipa::path(
    delete,
    path = "/api/cursos/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course, its units and grades deleted", body = MessageResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn delete_curso(
    State(state): State<AppState>,
    PathParams(id): PathParams<CursoId>,
) -> Result<Json<MessageResponse>, AppError> {
    CursoService::delete_by_id(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/cursos/{id}/alumnos",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Students enrolled in the course", body = Vec<Alumno>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn get_curso_alumnos(
    State(state): State<AppState>,
    PathParams(id): PathParams<CursoId>,
) -> Result<Json<Vec<Alumno>>, AppError> {
    let alumnos = CursoService::alumnos_of(&state.db, id).await?;
    Ok(Json(alumnos))
}

#[utoipa::path(
    get,
    path = "/api/cursos/{id}/nucleos",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Units of the course with their grades", body = Vec<NucleoDetail>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn get_curso_nucleos(
    State(state): State<AppState>,
    PathParams(id): PathParams<CursoId>,
) -> Result<Json<Vec<NucleoDetail>>, AppError> {
    let nucleos = NucleoService::list_by_curso(&state.db, id).await?;
    Ok(Json(nucleos))
}

#[utoipa::path(
    post,
    path = "/api/cursos/{id}/nucleos",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    request_body = CreateNucleoDto,
    responses(
        (status = 200, description = "Unit added; returns the updated course", body = CursoDetail),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn add_nucleo_to_curso(
    State(state): State<AppState>,
    PathParams(id): PathParams<CursoId>,
    JsonBody(dto): JsonBody<CreateNucleoDto>,
) -> Result<Json<CursoDetail>, AppError> {
    let curso = NucleoService::crear_nucleo(&state.db, id, dto).await?;
    Ok(Json(curso))
}

#[utoipa::path(
    get,
    path = "/api/cursos/{id}/promedio/{nucleo_id}",
    params(
        ("id" = i64, Path, description = "Course ID"),
        ("nucleo_id" = i64, Path, description = "Unit ID")
    ),
    responses(
        (status = 200, description = "Average grade of the unit, 0.0 without grades", body = f64),
        (status = 404, description = "Course not found or unit not in course", body = ErrorResponse)
    ),
    tag = "Cursos"
)]
#[instrument(skip(state))]
pub async fn get_promedio_nucleo(
    State(state): State<AppState>,
    PathParams((curso_id, nucleo_id)): PathParams<(CursoId, NucleoId)>,
) -> Result<Json<f64>, AppError> {
    let promedio = CursoService::calcular_promedio_nucleo(&state.db, curso_id, nucleo_id).await?;
    Ok(Json(promedio))
}
