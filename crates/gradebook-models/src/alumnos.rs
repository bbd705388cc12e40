//! Student domain models and DTOs.
//!
//! A student is identified by an externally assigned national id. The
//! courses a student attends are not stored on the student row: they are
//! read from the `alumno_curso` edge table, the same table that backs the
//! course's list of enrolled students.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::cursos::Curso;
use crate::ids::AlumnoId;
use crate::validation::{clean, clean_optional, is_blank, not_blank};

/// A student as stored in the `alumno` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Alumno {
    pub id: AlumnoId,
    pub nombre: String,
    pub apellido: String,
    pub email: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub direccion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alumno {
    /// `"{nombre} {apellido}"`.
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

/// A student together with the courses they are enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlumnoDetail {
    #[serde(flatten)]
    pub alumno: Alumno,
    pub nombre_completo: String,
    pub cursos: Vec<Curso>,
}

impl AlumnoDetail {
    pub fn new(alumno: Alumno, cursos: Vec<Curso>) -> Self {
        Self {
            nombre_completo: alumno.nombre_completo(),
            alumno,
            cursos,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAlumnoDto {
    /// National id (DNI); must not be in use by another student.
    #[validate(
        length(min = 1, max = 20, message = "id must have between 1 and 20 characters"),
        custom(function = "not_blank", message = "id is required")
    )]
    pub id: String,
    #[validate(
        length(min = 2, max = 100, message = "nombre must have between 2 and 100 characters"),
        custom(function = "not_blank", message = "nombre is required")
    )]
    pub nombre: String,
    #[validate(
        length(min = 2, max = 100, message = "apellido must have between 2 and 100 characters"),
        custom(function = "not_blank", message = "apellido is required")
    )]
    pub apellido: String,
    #[validate(
        email(message = "email must be a valid address"),
        length(max = 150, message = "email must not exceed 150 characters")
    )]
    pub email: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    #[validate(length(max = 150, message = "direccion must not exceed 150 characters"))]
    pub direccion: Option<String>,
}

impl CreateAlumnoDto {
    /// Trims text fields; blank optional fields become `None`.
    pub fn normalized(self) -> Self {
        Self {
            id: clean(&self.id),
            nombre: clean(&self.nombre),
            apellido: clean(&self.apellido),
            email: clean_optional(self.email),
            fecha_nacimiento: self.fecha_nacimiento,
            direccion: clean_optional(self.direccion),
        }
    }
}

/// Partial update; absent fields keep their stored value and an empty
/// `email` or `direccion` clears it. The id is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAlumnoDto {
    #[validate(
        length(min = 2, max = 100, message = "nombre must have between 2 and 100 characters"),
        custom(function = "not_blank", message = "nombre is required")
    )]
    pub nombre: Option<String>,
    #[validate(
        length(min = 2, max = 100, message = "apellido must have between 2 and 100 characters"),
        custom(function = "not_blank", message = "apellido is required")
    )]
    pub apellido: Option<String>,
    #[validate(
        email(message = "email must be a valid address"),
        length(max = 150, message = "email must not exceed 150 characters")
    )]
    pub email: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    #[validate(length(max = 150, message = "direccion must not exceed 150 characters"))]
    pub direccion: Option<String>,
}

impl UpdateAlumnoDto {
    /// `email` was sent as an empty string, which clears the stored value.
    pub fn clears_email(&self) -> bool {
        is_blank(self.email.as_deref())
    }

    /// `direccion` was sent as an empty string, which clears the stored value.
    pub fn clears_direccion(&self) -> bool {
        is_blank(self.direccion.as_deref())
    }

    pub fn normalized(self) -> Self {
        Self {
            nombre: self.nombre.as_deref().map(clean),
            apellido: self.apellido.as_deref().map(clean),
            email: clean_optional(self.email),
            fecha_nacimiento: self.fecha_nacimiento,
            direccion: clean_optional(self.direccion),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AlumnoFilterParams {
    /// Case-insensitive exact match on `apellido`.
    pub apellido: Option<String>,
}
