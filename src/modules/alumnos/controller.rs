use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use gradebook_core::{AppError, ErrorResponse};
use gradebook_models::MessageResponse;

use crate::extractors::{JsonBody, PathParams};
use crate::modules::alumnos::model::{
    Alumno, AlumnoDetail, AlumnoFilterParams, AlumnoId, CreateAlumnoDto, UpdateAlumnoDto,
};
use crate::modules::alumnos::service::AlumnoService;
use crate::modules::cursos::model::{Curso, CursoId};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/alumnos",
    params(AlumnoFilterParams),
    responses(
        (status = 200, description = "Students ordered by surname", body = Vec<Alumno>)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn get_alumnos(
    State(state): State<AppState>,
    Query(filters): Query<AlumnoFilterParams>,
) -> Result<Json<Vec<Alumno>>, AppError> {
    let alumnos = AlumnoService::find_all(&state.db, filters).await?;
    Ok(Json(alumnos))
}

#[utoipa::path(
    post,
    path = "/api/alumnos",
    request_body = CreateAlumnoDto,
    responses(
        (status = 201, description = "Student created", body = Alumno),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "A student with this id already exists", body = ErrorResponse)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn create_alumno(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<CreateAlumnoDto>,
) -> Result<(StatusCode, Json<Alumno>), AppError> {
    let alumno = AlumnoService::save(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(alumno)))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/{id}",
    params(
        ("id" = String, Path, description = "Student national id")
    ),
    responses(
        (status = 200, description = "Student with enrolled courses", body = AlumnoDetail),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn get_alumno(
    State(state): State<AppState>,
    PathParams(id): PathParams<AlumnoId>,
) -> Result<Json<AlumnoDetail>, AppError> {
    let alumno = AlumnoService::find_by_id(&state.db, &id).await?;
    Ok(Json(alumno))
}

#[utoipa::path(
    put,
    path = "/api/alumnos/{id}",
    params(
        ("id" = String, Path, description = "Student national id")
    ),
    request_body = UpdateAlumnoDto,
    responses(
        (status = 200, description = "Student updated", body = Alumno),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn update_alumno(
    State(state): State<AppState>,
    PathParams(id): PathParams<AlumnoId>,
    JsonBody(dto): JsonBody<UpdateAlumnoDto>,
) -> Result<Json<Alumno>, AppError> {
    let alumno = AlumnoService::update(&state.db, &id, dto).await?;
    Ok(Json(alumno))
}

#[utoipa::path(
    delete,
    path = "/api/alumnos/{id}",
    params(
        ("id" = String, Path, description = "Student national id")
    ),
    responses(
        (status = 200, description = "Student and enrollments deleted", body = MessageResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn delete_alumno(
    State(state): State<AppState>,
    PathParams(id): PathParams<AlumnoId>,
) -> Result<Json<MessageResponse>, AppError> {
    AlumnoService::delete_by_id(&state.db, &id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/alumnos/{id}/cursos",
    params(
        ("id" = String, Path, description = "Student national id")
    ),
    responses(
        (status = 200, description = "Courses the student is enrolled in", body = Vec<Curso>),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn get_alumno_cursos(
    State(state): State<AppState>,
    PathParams(id): PathParams<AlumnoId>,
) -> Result<Json<Vec<Curso>>, AppError> {
    let cursos = AlumnoService::cursos_of(&state.db, &id).await?;
    Ok(Json(cursos))
}

#[utoipa::path(
    post,
    path = "/api/alumnos/{id}/inscribir/{curso_id}",
    params(
        ("id" = String, Path, description = "Student national id"),
        ("curso_id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Student enrolled (idempotent)", body = AlumnoDetail),
        (status = 404, description = "Student or course not found", body = ErrorResponse)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn inscribir(
    State(state): State<AppState>,
    PathParams((alumno_id, curso_id)): PathParams<(AlumnoId, CursoId)>,
) -> Result<Json<AlumnoDetail>, AppError> {
    let alumno = AlumnoService::inscribir(&state.db, &alumno_id, curso_id).await?;
    Ok(Json(alumno))
}

#[utoipa::path(
    post,
    path = "/api/alumnos/{id}/desinscribir/{curso_id}",
    params(
        ("id" = String, Path, description = "Student national id"),
        ("curso_id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Student unenrolled", body = AlumnoDetail),
        (status = 400, description = "Student is not enrolled in this course", body = ErrorResponse),
        (status = 404, description = "Student or course not found", body = ErrorResponse)
    ),
    tag = "Alumnos"
)]
#[instrument(skip(state))]
pub async fn desinscribir(
    State(state): State<AppState>,
    PathParams((alumno_id, curso_id)): PathParams<(AlumnoId, CursoId)>,
) -> Result<Json<AlumnoDetail>, AppError> {
    let alumno = AlumnoService::desinscribir(&state.db, &alumno_id, curso_id).await?;
    Ok(Json(alumno))
}
