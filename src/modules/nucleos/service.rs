use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument};

use gradebook_core::{AppError, validate_dto};
use gradebook_db::is_foreign_key_violation;

use crate::modules::cursos::model::{CursoDetail, CursoId};
use crate::modules::cursos::service::CursoService;
use crate::modules::notas::model::Nota;
use crate::modules::nucleos::model::{
    CreateNucleoDto, NucleoDetail, NucleoId, NucleoPedagogico, UpdateNucleoDto,
};

pub struct NucleoService;

impl NucleoService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: NucleoId) -> Result<NucleoDetail, AppError> {
        let nucleo = Self::find_nucleo(db, id).await?;
        let notas = sqlx::query_as::<_, Nota>(
            r#"SELECT id, valor, descripcion, nucleo_id, created_at, updated_at
               FROM nota
               WHERE nucleo_id = $1
               ORDER BY id"#,
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(NucleoDetail::new(nucleo, notas))
    }

    /// Adds a unit to the course and returns the refreshed course.
    #[instrument(skip(db))]
    pub async fn crear_nucleo(
        db: &PgPool,
        curso_id: CursoId,
        dto: CreateNucleoDto,
    ) -> Result<CursoDetail, AppError> {
        Self::crear_nucleo_returning_child(db, curso_id, dto).await?;
        CursoService::find_by_id(db, curso_id).await
    }

    /// Adds a unit to the course and returns the new unit.
    #[instrument(skip(db))]
    pub async fn crear_nucleo_returning_child(
        db: &PgPool,
        curso_id: CursoId,
        dto: CreateNucleoDto,
    ) -> Result<NucleoPedagogico, AppError> {
        CursoService::ensure_exists(db, curso_id).await?;

        let dto = dto.normalized();
        validate_dto(&dto)?;

        let nucleo = sqlx::query_as::<_, NucleoPedagogico>(
            r#"INSERT INTO nucleo_pedagogico (tema, descripcion, curso_id)
               VALUES ($1, $2, $3)
               RETURNING id, tema, descripcion, curso_id, created_at, updated_at"#,
        )
        .bind(&dto.tema)
        .bind(&dto.descripcion)
        .bind(curso_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            // The course was deleted between the check and the insert.
            if is_foreign_key_violation(&e) {
                return AppError::not_found(anyhow!("Course not found"));
            }
            AppError::database(e)
        })?;

        info!(nucleo_id = %nucleo.id, curso_id = %curso_id, "Unit created");

        Ok(nucleo)
    }

    #[instrument(skip(db))]
    pub async fn update(
        db: &PgPool,
        id: NucleoId,
        dto: UpdateNucleoDto,
    ) -> Result<NucleoPedagogico, AppError> {
        Self::ensure_exists(db, id).await?;

        let dto = dto.normalized();
        validate_dto(&dto)?;

        let nucleo = sqlx::query_as::<_, NucleoPedagogico>(
            r#"UPDATE nucleo_pedagogico
               SET tema = COALESCE($2, tema),
                   descripcion = COALESCE($3, descripcion),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, tema, descripcion, curso_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.tema)
        .bind(&dto.descripcion)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Unit not found")))?;

        Ok(nucleo)
    }

    #[instrument(skip(db))]
    pub async fn list_by_curso(
        db: &PgPool,
        curso_id: CursoId,
    ) -> Result<Vec<NucleoDetail>, AppError> {
        CursoService::ensure_exists(db, curso_id).await?;
        Self::details_of_curso(db, curso_id).await
    }

    /// Deletes the unit; its grades cascade.
    #[instrument(skip(db))]
    pub async fn delete_by_id(db: &PgPool, id: NucleoId) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM nucleo_pedagogico WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow!("Unit not found")));
        }

        info!(nucleo_id = %id, "Unit deleted");
        Ok(())
    }

    /// Units of a course with their grades, in insertion order.
    pub(crate) async fn details_of_curso(
        db: &PgPool,
        curso_id: CursoId,
    ) -> Result<Vec<NucleoDetail>, AppError> {
        let nucleos = sqlx::query_as::<_, NucleoPedagogico>(
            r#"SELECT id, tema, descripcion, curso_id, created_at, updated_at
               FROM nucleo_pedagogico
               WHERE curso_id = $1
               ORDER BY id"#,
        )
        .bind(curso_id)
        .fetch_all(db)
        .await?;

        if nucleos.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<NucleoId> = nucleos.iter().map(|n| n.id).collect();
        let notas = sqlx::query_as::<_, Nota>(
            r#"SELECT id, valor, descripcion, nucleo_id, created_at, updated_at
               FROM nota
               WHERE nucleo_id = ANY($1)
               ORDER BY id"#,
        )
        .bind(&ids)
        .fetch_all(db)
        .await?;

        let mut by_nucleo: HashMap<NucleoId, Vec<Nota>> = HashMap::new();
        for nota in notas {
            by_nucleo.entry(nota.nucleo_id).or_default().push(nota);
        }

        Ok(nucleos
            .into_iter()
            .map(|nucleo| {
                let notas = by_nucleo.remove(&nucleo.id).unwrap_or_default();
                NucleoDetail::new(nucleo, notas)
            })
            .collect())
    }

    pub(crate) async fn ensure_exists<'e, E>(executor: E, id: NucleoId) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM nucleo_pedagogico WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Unit not found")));
        }
        Ok(())
    }

    async fn find_nucleo(db: &PgPool, id: NucleoId) -> Result<NucleoPedagogico, AppError> {
        sqlx::query_as::<_, NucleoPedagogico>(
            r#"SELECT id, tema, descripcion, curso_id, created_at, updated_at
               FROM nucleo_pedagogico
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Unit not found")))
    }
}
