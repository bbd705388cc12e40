use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::alumnos::Alumno;
use crate::ids::CursoId;
use crate::nucleos::NucleoDetail;
use crate::validation::{clean, not_blank};

/// Builds the display name of a course, e.g. `"Matemática - 1º A"`.
///
/// The stored `nombre_completo` is always produced by this function and is
/// unique across courses.
pub fn nombre_completo(nombre_materia: &str, anio: i32, division: &str) -> String {
    format!("{} - {}º {}", nombre_materia, anio, division)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Curso {
    pub id: CursoId,
    /// Derived from subject, year and division.
    #[schema(example = "Matemática - 1º A")]
    pub nombre_completo: String,
    pub nombre_materia: String,
    pub anio: i32,
    pub division: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course with its units (each carrying its grades) and enrolled students.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CursoDetail {
    #[serde(flatten)]
    pub curso: Curso,
    pub nucleos: Vec<NucleoDetail>,
    pub alumnos: Vec<Alumno>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCursoDto {
    #[validate(
        length(min = 2, max = 100, message = "nombre_materia must have between 2 and 100 characters"),
        custom(function = "not_blank", message = "nombre_materia is required")
    )]
    #[schema(example = "Matemática")]
    pub nombre_materia: String,
    #[validate(range(min = 1, message = "anio must be at least 1"))]
    #[schema(example = 1)]
    pub anio: i32,
    #[validate(
        length(min = 1, max = 10, message = "division must have between 1 and 10 characters"),
        custom(function = "not_blank", message = "division is required")
    )]
    #[schema(example = "A")]
    pub division: String,
}

impl CreateCursoDto {
    pub fn normalized(self) -> Self {
        Self {
            nombre_materia: clean(&self.nombre_materia),
            anio: self.anio,
            division: clean(&self.division),
        }
    }
}

/// Partial update; `nombre_completo` is recomputed from the resulting values.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCursoDto {
    #[validate(
        length(min = 2, max = 100, message = "nombre_materia must have between 2 and 100 characters"),
        custom(function = "not_blank", message = "nombre_materia is required")
    )]
    pub nombre_materia: Option<String>,
    #[validate(range(min = 1, message = "anio must be at least 1"))]
    pub anio: Option<i32>,
    #[validate(
        length(min = 1, max = 10, message = "division must have between 1 and 10 characters"),
        custom(function = "not_blank", message = "division is required")
    )]
    pub division: Option<String>,
}

impl UpdateCursoDto {
    pub fn normalized(self) -> Self {
        Self {
            nombre_materia: self.nombre_materia.as_deref().map(clean),
            anio: self.anio,
            division: self.division.as_deref().map(clean),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CursoFilterParams {
    /// Exact match on the derived course name.
    pub nombre_completo: Option<String>,
}
