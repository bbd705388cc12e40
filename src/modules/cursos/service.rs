use anyhow::anyhow;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument};

use gradebook_core::{AppError, validate_dto};
use gradebook_db::is_unique_violation;

use crate::metrics::track_curso_created;
use crate::modules::alumnos::model::Alumno;
use crate::modules::alumnos::service::AlumnoService;
use crate::modules::cursos::model::{
    CreateCursoDto, Curso, CursoDetail, CursoFilterParams, CursoId, UpdateCursoDto,
    nombre_completo,
};
use crate::modules::notas::model::{NotaValor, promedio};
use crate::modules::nucleos::model::NucleoId;
use crate::modules::nucleos::service::NucleoService;

pub struct CursoService;

impl CursoService {
    #[instrument(skip(db))]
    pub async fn find_all(db: &PgPool, filters: CursoFilterParams) -> Result<Vec<Curso>, AppError> {
        let nombre = filters
            .nombre_completo
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let cursos = match nombre {
            Some(nombre) => {
                sqlx::query_as::<_, Curso>(
                    r#"SELECT id, nombre_completo, nombre_materia, anio, division, created_at, updated_at
                       FROM curso
                       WHERE nombre_completo = $1
                       ORDER BY id"#,
                )
                .bind(nombre)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Curso>(
                    r#"SELECT id, nombre_completo, nombre_materia, anio, division, created_at, updated_at
                       FROM curso
                       ORDER BY id"#,
                )
                .fetch_all(db)
                .await?
            }
        };

        Ok(cursos)
    }

    /// The course with its units (and their grades) and enrolled students.
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: CursoId) -> Result<CursoDetail, AppError> {
        let curso = Self::find_curso(db, id).await?;
        let nucleos = NucleoService::details_of_curso(db, id).await?;
        let alumnos = AlumnoService::enrolled_in(db, id).await?;

        Ok(CursoDetail {
            curso,
            nucleos,
            alumnos,
        })
    }

    #[instrument(skip(db))]
    pub async fn save(db: &PgPool, dto: CreateCursoDto) -> Result<Curso, AppError> {
        let dto = dto.normalized();
        validate_dto(&dto)?;

        let nombre = nombre_completo(&dto.nombre_materia, dto.anio, &dto.division);

        let curso = sqlx::query_as::<_, Curso>(
            r#"INSERT INTO curso (nombre_completo, nombre_materia, anio, division)
               VALUES ($1, $2, $3, $4)
               RETURNING id, nombre_completo, nombre_materia, anio, division, created_at, updated_at"#,
        )
        .bind(&nombre)
        .bind(&dto.nombre_materia)
        .bind(dto.anio)
        .bind(&dto.division)
        .fetch_one(db)
        .await
        .map_err(|e| duplicate_name_or(e, &nombre))?;

        track_curso_created();
        info!(curso_id = %curso.id, nombre_completo = %curso.nombre_completo, "Course created");

        Ok(curso)
    }

    /// Partial update; `nombre_completo` is rebuilt from the merged fields.
    #[instrument(skip(db))]
    pub async fn update(db: &PgPool, id: CursoId, dto: UpdateCursoDto) -> Result<Curso, AppError> {
        let existing = Self::find_curso(db, id).await?;

        let dto = dto.normalized();
        validate_dto(&dto)?;

        let nombre_materia = dto.nombre_materia.unwrap_or(existing.nombre_materia);
        let anio = dto.anio.unwrap_or(existing.anio);
        let division = dto.division.unwrap_or(existing.division);
        let nombre = nombre_completo(&nombre_materia, anio, &division);

        let curso = sqlx::query_as::<_, Curso>(
            r#"UPDATE curso
               SET nombre_completo = $2, nombre_materia = $3, anio = $4, division = $5,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, nombre_completo, nombre_materia, anio, division, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&nombre)
        .bind(&nombre_materia)
        .bind(anio)
        .bind(&division)
        .fetch_optional(db)
        .await
        .map_err(|e| duplicate_name_or(e, &nombre))?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        Ok(curso)
    }

    /// Clears enrollments and deletes the course; units and grades cascade.
    #[instrument(skip(db))]
    pub async fn delete_by_id(db: &PgPool, id: CursoId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let unenrolled = sqlx::query("DELETE FROM alumno_curso WHERE curso_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM curso WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }

        tx.commit().await?;
        info!(curso_id = %id, unenrolled, "Course deleted");

        Ok(())
    }

    /// Unweighted mean of the grades of a unit that belongs to the course.
    #[instrument(skip(db))]
    pub async fn calcular_promedio_nucleo(
        db: &PgPool,
        curso_id: CursoId,
        nucleo_id: NucleoId,
    ) -> Result<f64, AppError> {
        Self::ensure_exists(db, curso_id).await?;

        let belongs = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM nucleo_pedagogico WHERE id = $1 AND curso_id = $2)",
        )
        .bind(nucleo_id)
        .bind(curso_id)
        .fetch_one(db)
        .await?;

        if !belongs {
            return Err(AppError::not_found(anyhow!(
                "Unit not found in this course"
            )));
        }

        let valores = sqlx::query_scalar::<_, NotaValor>(
            "SELECT valor FROM nota WHERE nucleo_id = $1 ORDER BY id",
        )
        .bind(nucleo_id)
        .fetch_all(db)
        .await?;

        Ok(promedio(&valores))
    }

    #[instrument(skip(db))]
    pub async fn alumnos_of(db: &PgPool, id: CursoId) -> Result<Vec<Alumno>, AppError> {
        Self::ensure_exists(db, id).await?;
        AlumnoService::enrolled_in(db, id).await
    }

    pub(crate) async fn ensure_exists<'e, E>(executor: E, id: CursoId) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM curso WHERE id = $1)")
                .bind(id)
                .fetch_one(executor)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }
        Ok(())
    }

    async fn find_curso(db: &PgPool, id: CursoId) -> Result<Curso, AppError> {
        sqlx::query_as::<_, Curso>(
            r#"SELECT id, nombre_completo, nombre_materia, anio, division, created_at, updated_at
               FROM curso
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }
}

fn duplicate_name_or(err: sqlx::Error, nombre: &str) -> AppError {
    if is_unique_violation(&err) {
        return AppError::conflict(anyhow!("A course named '{}' already exists", nombre));
    }
    AppError::database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::nucleos::model::CreateNucleoDto;

    fn matematica_1a() -> CreateCursoDto {
        CreateCursoDto {
            nombre_materia: "Matemática".to_string(),
            anio: 1,
            division: "A".to_string(),
        }
    }

    async fn nucleo_with_notas(pool: &PgPool, curso_id: CursoId, valores: &[i32]) -> NucleoId {
        let nucleo = NucleoService::crear_nucleo_returning_child(
            pool,
            curso_id,
            CreateNucleoDto {
                tema: "Fracciones".to_string(),
                descripcion: None,
            },
        )
        .await
        .unwrap();

        for valor in valores {
            sqlx::query("INSERT INTO nota (valor, nucleo_id) VALUES ($1, $2)")
                .bind(valor)
                .bind(nucleo.id)
                .execute(pool)
                .await
                .unwrap();
        }

        nucleo.id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_save_derives_nombre_completo(pool: PgPool) {
        let curso = CursoService::save(&pool, matematica_1a()).await.unwrap();

        assert_eq!(curso.nombre_completo, "Matemática - 1º A");
        assert_eq!(curso.anio, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_recomputes_nombre_completo(pool: PgPool) {
        let curso = CursoService::save(&pool, matematica_1a()).await.unwrap();

        let dto = UpdateCursoDto {
            anio: Some(2),
            division: Some("B".to_string()),
            ..Default::default()
        };
        let updated = CursoService::update(&pool, curso.id, dto).await.unwrap();

        assert_eq!(updated.nombre_completo, "Matemática - 2º B");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_save_duplicate_name_conflicts(pool: PgPool) {
        CursoService::save(&pool, matematica_1a()).await.unwrap();

        let err = CursoService::save(&pool, matematica_1a()).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_promedio_nucleo(pool: PgPool) {
        let curso = CursoService::save(&pool, matematica_1a()).await.unwrap();
        let nucleo_id = nucleo_with_notas(&pool, curso.id, &[8, 6, 10]).await;

        let promedio = CursoService::calcular_promedio_nucleo(&pool, curso.id, nucleo_id)
            .await
            .unwrap();
        assert_eq!(promedio, 8.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_promedio_empty_nucleo_is_zero(pool: PgPool) {
        let curso = CursoService::save(&pool, matematica_1a()).await.unwrap();
        let nucleo_id = nucleo_with_notas(&pool, curso.id, &[]).await;

        let promedio = CursoService::calcular_promedio_nucleo(&pool, curso.id, nucleo_id)
            .await
            .unwrap();
        assert_eq!(promedio, 0.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_promedio_nucleo_of_other_curso_not_found(pool: PgPool) {
        let curso = CursoService::save(&pool, matematica_1a()).await.unwrap();
        let otro = CursoService::save(
            &pool,
            CreateCursoDto {
                nombre_materia: "Lengua".to_string(),
                anio: 1,
                division: "A".to_string(),
            },
        )
        .await
        .unwrap();
        let nucleo_id = nucleo_with_notas(&pool, otro.id, &[7]).await;

        let err = CursoService::calcular_promedio_nucleo(&pool, curso.id, nucleo_id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_cascades_to_nucleos_and_notas(pool: PgPool) {
        let curso = CursoService::save(&pool, matematica_1a()).await.unwrap();
        nucleo_with_notas(&pool, curso.id, &[4, 5, 6]).await;
        nucleo_with_notas(&pool, curso.id, &[7, 8, 9]).await;

        CursoService::delete_by_id(&pool, curso.id).await.unwrap();

        let nucleos: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nucleo_pedagogico")
            .fetch_one(&pool)
            .await
            .unwrap();
        let notas: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nota")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(nucleos, 0);
        assert_eq!(notas, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_curso_not_found(pool: PgPool) {
        let err = CursoService::delete_by_id(&pool, CursoId::new(999))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
