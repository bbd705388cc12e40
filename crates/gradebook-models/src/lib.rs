//! # Gradebook Models
//!
//! Domain models and DTOs for the Gradebook API.
//!
//! # Modules
//!
//! - [`alumnos`]: Students and their enrollment view
//! - [`cursos`]: Courses, including the derived display name
//! - [`nucleos`]: Teaching units belonging to a course
//! - [`notas`]: Grades recorded under a unit
//! - [`ids`]: Typed identifiers
//! - [`value_types`]: Range-checked grade value and averaging
//!
//! # Example
//!
//! ```ignore
//! use gradebook_models::{NotaValor, promedio};
//!
//! let valores = [8, 6, 10].map(|v| NotaValor::new(v).unwrap());
//! assert_eq!(promedio(&valores), 8.0);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod alumnos;
pub mod cursos;
pub mod ids;
pub mod notas;
pub mod nucleos;
pub mod validation;
pub mod value_types;

pub use alumnos::{Alumno, AlumnoDetail, AlumnoFilterParams, CreateAlumnoDto, UpdateAlumnoDto};
pub use cursos::{CreateCursoDto, Curso, CursoDetail, CursoFilterParams, UpdateCursoDto};
pub use ids::{AlumnoId, CursoId, NotaId, NucleoId};
pub use notas::{CreateNotaDto, Nota, UpdateNotaDto};
pub use nucleos::{
    CreateNucleoDto, CreateNucleoForCursoDto, NucleoDetail, NucleoPedagogico, UpdateNucleoDto,
};
pub use value_types::{NotaValor, NotaValorError, promedio};

/// Generic acknowledgement body, e.g. for deletes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
