//! Course, unit and grade seeding.

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence, Words};
use gradebook_models::{CursoId, NotaValor, NucleoId};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::time::Instant;

use super::models::{CursoSeed, NotaSeed, NucleoSeed};

const BATCH_SIZE: usize = 500;

const MATERIAS: &[&str] = &[
    "Matemática",
    "Lengua",
    "Historia",
    "Geografía",
    "Biología",
    "Física",
    "Química",
    "Inglés",
    "Educación Física",
    "Música",
];

const DIVISIONES: &[&str] = &["A", "B", "C", "D"];

/// Generates `count` courses with distinct names.
///
/// Combinations of subject, year (1-6) and division are enumerated in order,
/// so names only repeat once every combination is used; those extra rows are
/// skipped on insert.
pub fn generate_cursos(count: usize) -> Vec<CursoSeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let materia = MATERIAS[i % MATERIAS.len()];
            let anio = (i / MATERIAS.len()) % 6 + 1;
            let division = DIVISIONES[(i / (MATERIAS.len() * 6)) % DIVISIONES.len()];

            CursoSeed {
                nombre_materia: materia.to_string(),
                anio: anio as i32,
                division: division.to_string(),
            }
        })
        .collect()
}

pub fn generate_nucleos(curso_ids: &[CursoId], per_curso: usize) -> Vec<NucleoSeed> {
    curso_ids
        .par_iter()
        .flat_map_iter(|&curso_id| {
            (0..per_curso).map(move |_| {
                let words: Vec<String> = Words(2..5).fake();
                let descripcion: String = Paragraph(1..3).fake();
                NucleoSeed {
                    tema: capitalize(&words.join(" ")),
                    descripcion: Some(descripcion),
                    curso_id,
                }
            })
        })
        .collect()
}

pub fn generate_notas(nucleo_ids: &[NucleoId], per_nucleo: usize) -> Vec<NotaSeed> {
    nucleo_ids
        .par_iter()
        .flat_map_iter(|&nucleo_id| {
            (0..per_nucleo).map(move |_| {
                let descripcion: String = Sentence(2..6).fake();
                NotaSeed {
                    valor: (NotaValor::MIN..=NotaValor::MAX).fake(),
                    descripcion: Some(descripcion.trim_end_matches('.').to_string()),
                    nucleo_id,
                }
            })
        })
        .collect()
}

pub async fn seed_cursos(
    db: &PgPool,
    count: usize,
) -> Result<Vec<CursoId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} cursos...", count);

    let cursos = generate_cursos(count);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(cursos.len());
    for chunk in cursos.chunks(BATCH_SIZE) {
        ids.extend(insert_cursos_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} cursos in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn seed_nucleos(
    db: &PgPool,
    curso_ids: &[CursoId],
    per_curso: usize,
) -> Result<Vec<NucleoId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧩 Seeding {} núcleos per curso...", per_curso);

    let nucleos = generate_nucleos(curso_ids, per_curso);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(nucleos.len());
    for chunk in nucleos.chunks(BATCH_SIZE) {
        ids.extend(insert_nucleos_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} núcleos in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn seed_notas(
    db: &PgPool,
    nucleo_ids: &[NucleoId],
    per_nucleo: usize,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📝 Seeding {} notas per núcleo...", per_nucleo);

    let notas = generate_notas(nucleo_ids, per_nucleo);

    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for chunk in notas.chunks(BATCH_SIZE) {
        inserted += insert_notas_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} notas in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_cursos_chunk(
    tx: &mut Transaction<'_, Postgres>,
    cursos: &[CursoSeed],
) -> Result<Vec<CursoId>, sqlx::Error> {
    if cursos.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Postgres>::new(
        "INSERT INTO curso (nombre_completo, nombre_materia, anio, division) ",
    );
    query.push_values(cursos, |mut row, curso| {
        row.push_bind(curso.nombre_completo())
            .push_bind(curso.nombre_materia.clone())
            .push_bind(curso.anio)
            .push_bind(curso.division.clone());
    });
    query.push(" ON CONFLICT (nombre_completo) DO NOTHING RETURNING id");

    query
        .build_query_scalar::<CursoId>()
        .fetch_all(&mut **tx)
        .await
}

async fn insert_nucleos_chunk(
    tx: &mut Transaction<'_, Postgres>,
    nucleos: &[NucleoSeed],
) -> Result<Vec<NucleoId>, sqlx::Error> {
    if nucleos.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        QueryBuilder::<Postgres>::new("INSERT INTO nucleo_pedagogico (tema, descripcion, curso_id) ");
    query.push_values(nucleos, |mut row, nucleo| {
        row.push_bind(nucleo.tema.clone())
            .push_bind(nucleo.descripcion.clone())
            .push_bind(nucleo.curso_id);
    });
    query.push(" RETURNING id");

    query
        .build_query_scalar::<NucleoId>()
        .fetch_all(&mut **tx)
        .await
}

async fn insert_notas_chunk(
    tx: &mut Transaction<'_, Postgres>,
    notas: &[NotaSeed],
) -> Result<u64, sqlx::Error> {
    if notas.is_empty() {
        return Ok(0);
    }

    let mut query = QueryBuilder::<Postgres>::new("INSERT INTO nota (valor, descripcion, nucleo_id) ");
    query.push_values(notas, |mut row, nota| {
        row.push_bind(nota.valor)
            .push_bind(nota.descripcion.clone())
            .push_bind(nota.nucleo_id);
    });

    let result = query.build().execute(&mut **tx).await?;
    Ok(result.rows_affected())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
