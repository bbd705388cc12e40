//! Data models for database seeding configuration.

use chrono::NaiveDate;
use gradebook_models::{AlumnoId, CursoId, NucleoId};

/// Seed data for creating a course.
pub struct CursoSeed {
    pub nombre_materia: String,
    pub anio: i32,
    pub division: String,
}

impl CursoSeed {
    pub fn nombre_completo(&self) -> String {
        gradebook_models::cursos::nombre_completo(&self.nombre_materia, self.anio, &self.division)
    }
}

/// Seed data for creating a teaching unit.
pub struct NucleoSeed {
    pub tema: String,
    pub descripcion: Option<String>,
    pub curso_id: CursoId,
}

/// Seed data for creating a grade.
pub struct NotaSeed {
    pub valor: i32,
    pub descripcion: Option<String>,
    pub nucleo_id: NucleoId,
}

/// Seed data for creating a student.
pub struct AlumnoSeed {
    pub id: AlumnoId,
    pub nombre: String,
    pub apellido: String,
    pub email: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub direccion: Option<String>,
}

/// Complete configuration for database seeding.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub num_cursos: usize,
    pub nucleos_per_curso: usize,
    pub notas_per_nucleo: usize,
    pub num_alumnos: usize,
    /// Upper bound; a student is never enrolled in more courses than exist.
    pub cursos_per_alumno: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_cursos: 6,
            nucleos_per_curso: 4,
            notas_per_nucleo: 5,
            num_alumnos: 60,
            cursos_per_alumno: 3,
        }
    }
}

impl SeedConfig {
    pub fn total_nucleos(&self) -> usize {
        self.num_cursos * self.nucleos_per_curso
    }

    pub fn total_notas(&self) -> usize {
        self.total_nucleos() * self.notas_per_nucleo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_totals() {
        let config = SeedConfig {
            num_cursos: 2,
            nucleos_per_curso: 2,
            notas_per_nucleo: 3,
            ..Default::default()
        };
        assert_eq!(config.total_nucleos(), 4);
        assert_eq!(config.total_notas(), 12);
    }

    #[test]
    fn test_curso_seed_nombre_completo() {
        let seed = CursoSeed {
            nombre_materia: "Matemática".to_string(),
            anio: 1,
            division: "A".to_string(),
        };
        assert_eq!(seed.nombre_completo(), "Matemática - 1º A");
    }
}
