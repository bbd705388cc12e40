use anyhow::anyhow;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument};

use gradebook_core::{AppError, validate_dto};
use gradebook_db::{is_foreign_key_violation, is_unique_violation};

use crate::metrics::{track_alumno_created, track_inscripcion};
use crate::modules::alumnos::model::{
    Alumno, AlumnoDetail, AlumnoFilterParams, AlumnoId, CreateAlumnoDto, UpdateAlumnoDto,
};
use crate::modules::cursos::model::{Curso, CursoId};
use crate::modules::cursos::service::CursoService;

pub struct AlumnoService;

impl AlumnoService {
    #[instrument(skip(db))]
    pub async fn find_all(
        db: &PgPool,
        filters: AlumnoFilterParams,
    ) -> Result<Vec<Alumno>, AppError> {
        let apellido = filters
            .apellido
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let alumnos = match apellido {
            Some(apellido) => {
                sqlx::query_as::<_, Alumno>(
                    r#"SELECT id, nombre, apellido, email, fecha_nacimiento, direccion, created_at, updated_at
                       FROM alumno
                       WHERE LOWER(apellido) = LOWER($1)
                       ORDER BY apellido, nombre, id"#,
                )
                .bind(apellido)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Alumno>(
                    r#"SELECT id, nombre, apellido, email, fecha_nacimiento, direccion, created_at, updated_at
                       FROM alumno
                       ORDER BY apellido, nombre, id"#,
                )
                .fetch_all(db)
                .await?
            }
        };

        Ok(alumnos)
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: &AlumnoId) -> Result<AlumnoDetail, AppError> {
        let alumno = Self::find_alumno(db, id).await?;
        let cursos = Self::cursos_for(db, id).await?;

        Ok(AlumnoDetail::new(alumno, cursos))
    }

    #[instrument(skip(db, dto), fields(alumno_id = %dto.id))]
    pub async fn save(db: &PgPool, dto: CreateAlumnoDto) -> Result<Alumno, AppError> {
        let dto = dto.normalized();
        validate_dto(&dto)?;

        let id = AlumnoId::new(dto.id);

        let alumno = sqlx::query_as::<_, Alumno>(
            r#"INSERT INTO alumno (id, nombre, apellido, email, fecha_nacimiento, direccion)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, nombre, apellido, email, fecha_nacimiento, direccion, created_at, updated_at"#,
        )
        .bind(&id)
        .bind(&dto.nombre)
        .bind(&dto.apellido)
        .bind(&dto.email)
        .bind(dto.fecha_nacimiento)
        .bind(&dto.direccion)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::conflict(anyhow!("A student with id '{}' already exists", id));
            }
            AppError::database(e)
        })?;

        track_alumno_created();
        info!(alumno_id = %alumno.id, "Student created");

        Ok(alumno)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: &AlumnoId,
        dto: UpdateAlumnoDto,
    ) -> Result<Alumno, AppError> {
        Self::ensure_exists(db, id).await?;

        let clear_email = dto.clears_email();
        let clear_direccion = dto.clears_direccion();
        let dto = dto.normalized();
        validate_dto(&dto)?;

        // An empty string clears an optional field; an absent one keeps it.
        let alumno = sqlx::query_as::<_, Alumno>(
            r#"UPDATE alumno
               SET nombre = COALESCE($2, nombre),
                   apellido = COALESCE($3, apellido),
                   email = CASE WHEN $7 THEN NULL ELSE COALESCE($4, email) END,
                   fecha_nacimiento = COALESCE($5, fecha_nacimiento),
                   direccion = CASE WHEN $8 THEN NULL ELSE COALESCE($6, direccion) END,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, nombre, apellido, email, fecha_nacimiento, direccion, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.nombre)
        .bind(&dto.apellido)
        .bind(&dto.email)
        .bind(dto.fecha_nacimiento)
        .bind(&dto.direccion)
        .bind(clear_email)
        .bind(clear_direccion)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        Ok(alumno)
    }

    /// Removes the student's enrollments, then the student, atomically.
    #[instrument(skip(db))]
    pub async fn delete_by_id(db: &PgPool, id: &AlumnoId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let unenrolled = sqlx::query("DELETE FROM alumno_curso WHERE alumno_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM alumno WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        tx.commit().await?;
        info!(alumno_id = %id, unenrolled, "Student deleted");

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn cursos_of(db: &PgPool, id: &AlumnoId) -> Result<Vec<Curso>, AppError> {
        Self::find_alumno(db, id).await?;
        Self::cursos_for(db, id).await
    }

    /// Enrolls the student in the course.
    ///
    /// Re-enrolling an already enrolled pair is a no-op that still succeeds.
    #[instrument(skip(db))]
    pub async fn inscribir(
        db: &PgPool,
        alumno_id: &AlumnoId,
        curso_id: CursoId,
    ) -> Result<AlumnoDetail, AppError> {
        let mut tx = db.begin().await?;

        Self::ensure_exists(&mut *tx, alumno_id).await?;
        CursoService::ensure_exists(&mut *tx, curso_id).await?;

        let inserted = sqlx::query(
            r#"INSERT INTO alumno_curso (alumno_id, curso_id)
               VALUES ($1, $2)
               ON CONFLICT (alumno_id, curso_id) DO NOTHING"#,
        )
        .bind(alumno_id)
        .bind(curso_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::not_found(anyhow!("Student or course not found"));
            }
            AppError::database(e)
        })?
        .rows_affected();

        tx.commit().await?;

        if inserted > 0 {
            track_inscripcion();
            info!(alumno_id = %alumno_id, curso_id = %curso_id, "Student enrolled");
        }

        Self::find_by_id(db, alumno_id).await
    }

    #[instrument(skip(db))]
    pub async fn desinscribir(
        db: &PgPool,
        alumno_id: &AlumnoId,
        curso_id: CursoId,
    ) -> Result<AlumnoDetail, AppError> {
        let mut tx = db.begin().await?;

        Self::ensure_exists(&mut *tx, alumno_id).await?;
        CursoService::ensure_exists(&mut *tx, curso_id).await?;

        let removed = sqlx::query("DELETE FROM alumno_curso WHERE alumno_id = $1 AND curso_id = $2")
            .bind(alumno_id)
            .bind(curso_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(AppError::bad_request(anyhow!(
                "student is not enrolled in this course"
            )));
        }

        tx.commit().await?;
        info!(alumno_id = %alumno_id, curso_id = %curso_id, "Student unenrolled");

        Self::find_by_id(db, alumno_id).await
    }

    pub(crate) async fn ensure_exists<'e, E>(executor: E, id: &AlumnoId) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM alumno WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }
        Ok(())
    }

    /// Students enrolled in a course, ordered by surname.
    pub(crate) async fn enrolled_in(
        db: &PgPool,
        curso_id: CursoId,
    ) -> Result<Vec<Alumno>, AppError> {
        let alumnos = sqlx::query_as::<_, Alumno>(
            r#"SELECT a.id, a.nombre, a.apellido, a.email, a.fecha_nacimiento, a.direccion,
                      a.created_at, a.updated_at
               FROM alumno a
               JOIN alumno_curso ac ON ac.alumno_id = a.id
               WHERE ac.curso_id = $1
               ORDER BY a.apellido, a.nombre, a.id"#,
        )
        .bind(curso_id)
        .fetch_all(db)
        .await?;

        Ok(alumnos)
    }

    async fn find_alumno(db: &PgPool, id: &AlumnoId) -> Result<Alumno, AppError> {
        sqlx::query_as::<_, Alumno>(
            r#"SELECT id, nombre, apellido, email, fecha_nacimiento, direccion, created_at, updated_at
               FROM alumno
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    async fn cursos_for(db: &PgPool, id: &AlumnoId) -> Result<Vec<Curso>, AppError> {
        let cursos = sqlx::query_as::<_, Curso>(
            r#"SELECT c.id, c.nombre_completo, c.nombre_materia, c.anio, c.division,
                      c.created_at, c.updated_at
               FROM curso c
               JOIN alumno_curso ac ON ac.curso_id = c.id
               WHERE ac.alumno_id = $1
               ORDER BY c.id"#,
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(cursos)
    }
}
