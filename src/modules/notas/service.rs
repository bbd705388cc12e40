use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use gradebook_core::{AppError, validate_dto};
use gradebook_db::is_foreign_key_violation;

use crate::metrics::track_nota_recorded;
use crate::modules::notas::model::{CreateNotaDto, Nota, NotaId, NotaValor, UpdateNotaDto};
use crate::modules::nucleos::model::{NucleoDetail, NucleoId};
use crate::modules::nucleos::service::NucleoService;

const VALOR_OUT_OF_RANGE: &str = "grade value must be between 1 and 10";

pub struct NotaService;

impl NotaService {
    /// Records a grade under the unit and returns the refreshed unit.
    ///
    /// A missing unit is reported before an out-of-range value.
    #[instrument(skip(db))]
    pub async fn agregar_nota_a_nucleo(
        db: &PgPool,
        nucleo_id: NucleoId,
        dto: CreateNotaDto,
    ) -> Result<NucleoDetail, AppError> {
        let mut tx = db.begin().await?;

        NucleoService::ensure_exists(&mut *tx, nucleo_id).await?;

        let dto = dto.normalized();
        let valor = NotaValor::new(dto.valor)
            .map_err(|_| AppError::bad_request(anyhow!(VALOR_OUT_OF_RANGE)))?;
        validate_dto(&dto)?;

        let nota = sqlx::query_as::<_, Nota>(
            r#"INSERT INTO nota (valor, descripcion, nucleo_id)
               VALUES ($1, $2, $3)
               RETURNING id, valor, descripcion, nucleo_id, created_at, updated_at"#,
        )
        .bind(valor)
        .bind(&dto.descripcion)
        .bind(nucleo_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::not_found(anyhow!("Unit not found"));
            }
            AppError::database(e)
        })?;

        tx.commit().await?;

        track_nota_recorded(nota.valor.get());
        info!(nota_id = %nota.id, nucleo_id = %nucleo_id, valor = %nota.valor, "Grade recorded");

        NucleoService::find_by_id(db, nucleo_id).await
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: NotaId) -> Result<Nota, AppError> {
        sqlx::query_as::<_, Nota>(
            r#"SELECT id, valor, descripcion, nucleo_id, created_at, updated_at
               FROM nota
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Grade not found")))
    }

    #[instrument(skip(db))]
    pub async fn update(db: &PgPool, id: NotaId, dto: UpdateNotaDto) -> Result<Nota, AppError> {
        // A missing grade is reported before an invalid body.
        Self::find_by_id(db, id).await?;

        let dto = dto.normalized();
        let valor = dto
            .valor
            .map(NotaValor::new)
            .transpose()
            .map_err(|_| AppError::bad_request(anyhow!(VALOR_OUT_OF_RANGE)))?;
        validate_dto(&dto)?;

        let nota = sqlx::query_as::<_, Nota>(
            r#"UPDATE nota
               SET valor = COALESCE($2, valor),
                   descripcion = COALESCE($3, descripcion),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, valor, descripcion, nucleo_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(valor)
        .bind(&dto.descripcion)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Grade not found")))?;

        Ok(nota)
    }

    #[instrument(skip(db))]
    pub async fn delete_by_id(db: &PgPool, id: NotaId) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM nota WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow!("Grade not found")));
        }

        info!(nota_id = %id, "Grade deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_nucleo(pool: &PgPool) -> NucleoId {
        let curso_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO curso (nombre_completo, nombre_materia, anio, division)
               VALUES ('Historia - 3º C', 'Historia', 3, 'C')
               RETURNING id"#,
        )
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar(
            "INSERT INTO nucleo_pedagogico (tema, curso_id) VALUES ('Revolución de Mayo', $1) RETURNING id",
        )
        .bind(curso_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn count_notas(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM nota")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn nota(valor: i32) -> CreateNotaDto {
        CreateNotaDto {
            valor,
            descripcion: Some("  Oral  ".to_string()),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_agregar_nota_updates_promedio(pool: PgPool) {
        let nucleo_id = setup_nucleo(&pool).await;

        NotaService::agregar_nota_a_nucleo(&pool, nucleo_id, nota(8))
            .await
            .unwrap();
        let detail = NotaService::agregar_nota_a_nucleo(&pool, nucleo_id, nota(5))
            .await
            .unwrap();

        assert_eq!(detail.notas.len(), 2);
        assert_eq!(detail.promedio, 6.5);
        assert_eq!(detail.notas[0].descripcion.as_deref(), Some("Oral"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_agregar_nota_out_of_range(pool: PgPool) {
        let nucleo_id = setup_nucleo(&pool).await;

        for valor in [0, 11, -3] {
            let err = NotaService::agregar_nota_a_nucleo(&pool, nucleo_id, nota(valor))
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }

        assert_eq!(count_notas(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_missing_nucleo_reported_before_invalid_valor(pool: PgPool) {
        let err = NotaService::agregar_nota_a_nucleo(&pool, NucleoId::new(404), nota(42))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_rejects_out_of_range(pool: PgPool) {
        let nucleo_id = setup_nucleo(&pool).await;
        let detail = NotaService::agregar_nota_a_nucleo(&pool, nucleo_id, nota(7))
            .await
            .unwrap();
        let id = detail.notas[0].id;

        let dto = UpdateNotaDto {
            valor: Some(11),
            ..Default::default()
        };
        let err = NotaService::update(&pool, id, dto).await.unwrap_err();
        assert!(err.is_validation());

        let unchanged = NotaService::find_by_id(&pool, id).await.unwrap();
        assert_eq!(unchanged.valor.get(), 7);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_missing_nota_reported_before_invalid_valor(pool: PgPool) {
        let dto = UpdateNotaDto {
            valor: Some(0),
            ..Default::default()
        };
        let err = NotaService::update(&pool, NotaId::new(404), dto)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_nota_not_found(pool: PgPool) {
        let err = NotaService::delete_by_id(&pool, NotaId::new(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
