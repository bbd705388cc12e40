//! Database seeding for local development and demos.
//!
//! Data is generated in parallel with `rayon` and `fake`, then inserted in
//! batched multi-row statements inside one transaction per entity.

pub mod alumnos;
pub mod cursos;
pub mod models;

pub use models::SeedConfig;

use sqlx::PgPool;
use std::time::Instant;

/// Row counts removed by [`clear_all`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClearSummary {
    pub inscripciones: u64,
    pub notas: u64,
    pub nucleos: u64,
    pub cursos: u64,
    pub alumnos: u64,
}

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   Cursos: {}, Núcleos: {}, Notas: {}, Alumnos: {}",
        config.num_cursos,
        config.total_nucleos(),
        config.total_notas(),
        config.num_alumnos
    );
    println!();

    let curso_ids = cursos::seed_cursos(db, config.num_cursos).await?;
    let nucleo_ids = cursos::seed_nucleos(db, &curso_ids, config.nucleos_per_curso).await?;
    cursos::seed_notas(db, &nucleo_ids, config.notas_per_nucleo).await?;

    let alumno_ids = alumnos::seed_alumnos(db, config.num_alumnos).await?;
    alumnos::seed_inscripciones(db, &alumno_ids, &curso_ids, config.cursos_per_alumno).await?;

    println!();
    println!("✅ Seeding completed in {:?}", start_time.elapsed());

    Ok(())
}

/// Removes every row from the gradebook tables.
pub async fn clear_all(db: &PgPool) -> Result<ClearSummary, Box<dyn std::error::Error>> {
    println!("🗑️  Clearing gradebook data...");

    let mut tx = db.begin().await?;

    let inscripciones = sqlx::query("DELETE FROM alumno_curso")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let notas = sqlx::query("DELETE FROM nota")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let nucleos = sqlx::query("DELETE FROM nucleo_pedagogico")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let cursos = sqlx::query("DELETE FROM curso")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let alumnos = sqlx::query("DELETE FROM alumno")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    let summary = ClearSummary {
        inscripciones,
        notas,
        nucleos,
        cursos,
        alumnos,
    };

    println!("   ✓ Deleted {} inscripciones", summary.inscripciones);
    println!("   ✓ Deleted {} notas", summary.notas);
    println!("   ✓ Deleted {} núcleos", summary.nucleos);
    println!("   ✓ Deleted {} cursos", summary.cursos);
    println!("   ✓ Deleted {} alumnos", summary.alumnos);

    Ok(summary)
}
