use axum::{
    Json,
    extract::State,
};
use tracing::instrument;

use gradebook_core::{AppError, ErrorResponse};
use gradebook_models::MessageResponse;

use crate::extractors::{JsonBody, PathParams};
use crate::modules::notas::model::{Nota, NotaId, UpdateNotaDto};
use crate::modules::notas::service::NotaService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/notas/{id}",
    params(
        ("id" = i64, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade details", body = Nota),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Notas"
)]
#[instrument(skip(state))]
pub async fn get_nota(
    State(state): State<AppState>,
    PathParams(id): PathParams<NotaId>,
) -> Result<Json<Nota>, AppError> {
    let nota = NotaService::find_by_id(&state.db, id).await?;
    Ok(Json(nota))
}

#[utoipa::path(
    put,
    path = "/api/notas/{id}",
    params(
        ("id" = i64, Path, description = "Grade ID")
    ),
    request_body = UpdateNotaDto,
    responses(
        (status = 200, description = "Grade updated", body = Nota),
        (status = 400, description = "Grade value must be between 1 and 10", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Notas"
)]
#[instrument(skip(state))]
pub async fn update_nota(
    State(state): State<AppState>,
    PathParams(id): PathParams<NotaId>,
    JsonBody(dto): JsonBody<UpdateNotaDto>,
) -> Result<Json<Nota>, AppError> {
    let nota = NotaService::update(&state.db, id, dto).await?;
    Ok(Json(nota))
}

#[utoipa::path(
    delete,
    path = "/api/notas/{id}",
    params(
        ("id" = i64, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade deleted", body = MessageResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    tag = "Notas"
)]
#[instrument(skip(state))]
pub async fn delete_nota(
    State(state): State<AppState>,
    PathParams(id): PathParams<NotaId>,
) -> Result<Json<MessageResponse>, AppError> {
    NotaService::delete_by_id(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Grade deleted successfully")))
}
