//! Plain-text course report: enrolled students and each unit's average.

use gradebook_models::{CursoId, NotaValor, NucleoId, promedio};
use sqlx::PgPool;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct NucleoReport {
    pub tema: String,
    pub notas: usize,
    pub promedio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursoReport {
    pub nombre_completo: String,
    pub alumnos: i64,
    pub nucleos: Vec<NucleoReport>,
}

impl fmt::Display for CursoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📘 {}", self.nombre_completo)?;
        writeln!(f, "   Alumnos inscriptos: {}", self.alumnos)?;

        if self.nucleos.is_empty() {
            return writeln!(f, "   (sin núcleos pedagógicos)");
        }

        for nucleo in &self.nucleos {
            writeln!(
                f,
                "   • {:<40} {:>3} notas  promedio {:>5.2}",
                nucleo.tema, nucleo.notas, nucleo.promedio
            )?;
        }
        Ok(())
    }
}

/// Builds the report for one course, or `None` when the course does not exist.
pub async fn build_report(
    db: &PgPool,
    curso_id: CursoId,
) -> Result<Option<CursoReport>, sqlx::Error> {
    let nombre_completo: Option<String> =
        sqlx::query_scalar("SELECT nombre_completo FROM curso WHERE id = $1")
            .bind(curso_id)
            .fetch_optional(db)
            .await?;

    let Some(nombre_completo) = nombre_completo else {
        return Ok(None);
    };

    let alumnos: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alumno_curso WHERE curso_id = $1")
        .bind(curso_id)
        .fetch_one(db)
        .await?;

    let temas: Vec<(NucleoId, String)> =
        sqlx::query_as("SELECT id, tema FROM nucleo_pedagogico WHERE curso_id = $1 ORDER BY id")
            .bind(curso_id)
            .fetch_all(db)
            .await?;

    let mut nucleos = Vec::with_capacity(temas.len());
    for (nucleo_id, tema) in temas {
        let valores: Vec<NotaValor> =
            sqlx::query_scalar("SELECT valor FROM nota WHERE nucleo_id = $1")
                .bind(nucleo_id)
                .fetch_all(db)
                .await?;

        nucleos.push(NucleoReport {
            tema,
            notas: valores.len(),
            promedio: promedio(&valores),
        });
    }

    Ok(Some(CursoReport {
        nombre_completo,
        alumnos,
        nucleos,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_each_nucleo() {
        let report = CursoReport {
            nombre_completo: "Matemática - 1º A".to_string(),
            alumnos: 2,
            nucleos: vec![
                NucleoReport {
                    tema: "Fracciones".to_string(),
                    notas: 3,
                    promedio: 8.0,
                },
                NucleoReport {
                    tema: "Geometría".to_string(),
                    notas: 0,
                    promedio: 0.0,
                },
            ],
        };

        let output = report.to_string();
        assert!(output.starts_with("📘 Matemática - 1º A\n"));
        assert!(output.contains("Alumnos inscriptos: 2"));
        assert!(output.contains("Fracciones"));
        assert!(output.contains(" 8.00"));
        assert!(output.contains(" 0.00"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn test_report_without_nucleos() {
        let report = CursoReport {
            nombre_completo: "Lengua - 2º B".to_string(),
            alumnos: 0,
            nucleos: Vec::new(),
        };

        assert!(report.to_string().contains("sin núcleos pedagógicos"));
    }
}
