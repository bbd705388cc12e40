//! Student and enrollment seeding.
//!
//! Students get sequential national ids starting from a random base so that
//! repeated runs rarely collide; colliding rows are skipped on insert.

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, StreetName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use gradebook_models::{AlumnoId, CursoId};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::time::Instant;

use super::models::AlumnoSeed;

const BATCH_SIZE: usize = 500;

pub fn generate_alumnos(count: usize) -> Vec<AlumnoSeed> {
    let dni_base: u32 = (20_000_000..45_000_000).fake();

    (0..count)
        .into_par_iter()
        .map(|idx| generate_alumno(dni_base + idx as u32))
        .collect()
}

fn generate_alumno(dni: u32) -> AlumnoSeed {
    let nombre: String = FirstName().fake();
    let apellido: String = LastName().fake();
    let email: String = SafeEmail().fake();
    let street: String = StreetName().fake();
    let number: String = BuildingNumber().fake();

    AlumnoSeed {
        id: AlumnoId::new(dni.to_string()),
        nombre: pad_name(nombre),
        apellido: pad_name(apellido),
        email: Some(email),
        fecha_nacimiento: random_birth_date(),
        direccion: Some(format!("{} {}", street, number)),
    }
}

// Some fake names are a single letter; the API requires at least two.
fn pad_name(name: String) -> String {
    if name.chars().count() < 2 {
        format!("{}a", name)
    } else {
        name
    }
}

fn random_birth_date() -> Option<NaiveDate> {
    let year: i32 = (2005..2015).fake();
    let month: u32 = (1..=12).fake();
    let day: u32 = (1..=28).fake();
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Picks up to `per_alumno` distinct courses for each student.
pub fn generate_inscripciones(
    alumno_ids: &[AlumnoId],
    curso_ids: &[CursoId],
    per_alumno: usize,
) -> Vec<(AlumnoId, CursoId)> {
    let mut rng = rand::thread_rng();
    let per_alumno = per_alumno.min(curso_ids.len());

    alumno_ids
        .iter()
        .flat_map(|alumno_id| {
            curso_ids
                .choose_multiple(&mut rng, per_alumno)
                .map(|&curso_id| (alumno_id.clone(), curso_id))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_alumnos(
    db: &PgPool,
    count: usize,
) -> Result<Vec<AlumnoId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} alumnos...", count);

    let alumnos = generate_alumnos(count);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(alumnos.len());
    for chunk in alumnos.chunks(BATCH_SIZE) {
        ids.extend(insert_alumnos_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} alumnos in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn seed_inscripciones(
    db: &PgPool,
    alumno_ids: &[AlumnoId],
    curso_ids: &[CursoId],
    per_alumno: usize,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🔗 Enrolling alumnos in up to {} cursos each...", per_alumno);

    let inscripciones = generate_inscripciones(alumno_ids, curso_ids, per_alumno);

    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for chunk in inscripciones.chunks(BATCH_SIZE) {
        inserted += insert_inscripciones_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Created {} inscripciones in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_alumnos_chunk(
    tx: &mut Transaction<'_, Postgres>,
    alumnos: &[AlumnoSeed],
) -> Result<Vec<AlumnoId>, sqlx::Error> {
    if alumnos.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Postgres>::new(
        "INSERT INTO alumno (id, nombre, apellido, email, fecha_nacimiento, direccion) ",
    );
    query.push_values(alumnos, |mut row, alumno| {
        row.push_bind(alumno.id.as_str().to_string())
            .push_bind(alumno.nombre.clone())
            .push_bind(alumno.apellido.clone())
            .push_bind(alumno.email.clone())
            .push_bind(alumno.fecha_nacimiento)
            .push_bind(alumno.direccion.clone());
    });
    query.push(" ON CONFLICT (id) DO NOTHING RETURNING id");

    let ids: Vec<String> = query.build_query_scalar().fetch_all(&mut **tx).await?;
    Ok(ids.into_iter().map(AlumnoId::new).collect())
}

async fn insert_inscripciones_chunk(
    tx: &mut Transaction<'_, Postgres>,
    inscripciones: &[(AlumnoId, CursoId)],
) -> Result<u64, sqlx::Error> {
    if inscripciones.is_empty() {
        return Ok(0);
    }

    let mut query = QueryBuilder::<Postgres>::new("INSERT INTO alumno_curso (alumno_id, curso_id) ");
    query.push_values(inscripciones, |mut row, (alumno_id, curso_id)| {
        row.push_bind(alumno_id.as_str().to_string())
            .push_bind(*curso_id);
    });
    query.push(" ON CONFLICT DO NOTHING");

    let result = query.build().execute(&mut **tx).await?;
    Ok(result.rows_affected())
}
