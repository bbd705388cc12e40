use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use gradebook_core::{AppError, ErrorResponse};
use gradebook_models::MessageResponse;

use crate::extractors::{JsonBody, PathParams};
use crate::modules::notas::model::CreateNotaDto;
use crate::modules::notas::service::NotaService;
use crate::modules::nucleos::model::{
    CreateNucleoForCursoDto, NucleoDetail, NucleoId, NucleoPedagogico, UpdateNucleoDto,
};
use crate::modules::nucleos::service::NucleoService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/nucleos",
    request_body = CreateNucleoForCursoDto,
    responses(
        (status = 201, description = "Unit created", body = NucleoPedagogico),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Nucleos"
)]
#[instrument(skip(state))]
pub async fn create_nucleo(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<CreateNucleoForCursoDto>,
) -> Result<(StatusCode, Json<NucleoPedagogico>), AppError> {
    let nucleo =
        NucleoService::crear_nucleo_returning_child(&state.db, dto.curso_id, dto.nucleo).await?;
    Ok((StatusCode::CREATED, Json(nucleo)))
}

#[utoipa::path(
    get,
    path = "/api/nucleos/{id}",
    params(
        ("id" = i64, Path, description = "Unit ID")
    ),
    responses(
        (status = 200, description = "Unit with its grades", body = NucleoDetail),
        (status = 404, description = "Unit not found", body = ErrorResponse)
    ),
    tag = "Nucleos"
)]
#[instrument(skip(state))]
pub async fn get_nucleo(
    State(state): State<AppState>,
    PathParams(id): PathParams<NucleoId>,
) -> Result<Json<NucleoDetail>, AppError> {
    let nucleo = NucleoService::find_by_id(&state.db, id).await?;
    Ok(Json(nucleo))
}

#[utoipa::path(
    put,
    path = "/api/nucleos/{id}",
    params(
        ("id" = i64, Path, description = "Unit ID")
    ),
    request_body = UpdateNucleoDto,
    responses(
        (status = 200, description = "Unit updated", body = NucleoPedagogico),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse)
    ),
    tag = "Nucleos"
)]
#[instrument(skip(state))]
pub async fn update_nucleo(
    State(state): State<AppState>,
    PathParams(id): PathParams<NucleoId>,
    JsonBody(dto): JsonBody<UpdateNucleoDto>,
) -> Result<Json<NucleoPedagogico>, AppError> {
    let nucleo = NucleoService::update(&state.db, id, dto).await?;
    Ok(Json(nucleo))
}

#[utoipa::path(
    delete,
    path = "/api/nucleos/{id}",
    params(
        ("id" = i64, Path, description = "Unit ID")
    ),
    responses(
        (status = 200, description = "Unit and its grades deleted", body = MessageResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse)
    ),
    tag = "Nucleos"
)]
#[instrument(skip(state))]
pub async fn delete_nucleo(
    State(state): State<AppState>,
    PathParams(id): PathParams<NucleoId>,
) -> Result<Json<MessageResponse>, AppError> {
    NucleoService::delete_by_id(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Unit deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/nucleos/{id}/notas",
    params(
        ("id" = i64, Path, description = "Unit ID")
    ),
    request_body = CreateNotaDto,
    responses(
        (status = 201, description = "Grade recorded; returns the updated unit", body = NucleoDetail),
        (status = 400, description = "Grade value must be between 1 and 10", body = ErrorResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse)
    ),
    tag = "Nucleos"
)]
#[instrument(skip(state))]
pub async fn add_nota_to_nucleo(
    State(state): State<AppState>,
    PathParams(id): PathParams<NucleoId>,
    JsonBody(dto): JsonBody<CreateNotaDto>,
) -> Result<(StatusCode, Json<NucleoDetail>), AppError> {
    let nucleo = NotaService::agregar_nota_a_nucleo(&state.db, id, dto).await?;
    Ok((StatusCode::CREATED, Json(nucleo)))
}
