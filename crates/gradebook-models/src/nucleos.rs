use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{CursoId, NucleoId};
use crate::notas::Nota;
use crate::validation::{clean, clean_optional, not_blank};
use crate::value_types::promedio;

/// A teaching unit ("núcleo pedagógico") of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NucleoPedagogico {
    pub id: NucleoId,
    pub tema: String,
    pub descripcion: Option<String>,
    pub curso_id: CursoId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A unit with its grades and their average.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NucleoDetail {
    #[serde(flatten)]
    pub nucleo: NucleoPedagogico,
    pub notas: Vec<Nota>,
    /// Unweighted mean of `notas`, `0.0` when empty.
    pub promedio: f64,
}

impl NucleoDetail {
    pub fn new(nucleo: NucleoPedagogico, notas: Vec<Nota>) -> Self {
        let valores: Vec<_> = notas.iter().map(|n| n.valor).collect();
        Self {
            promedio: promedio(&valores),
            nucleo,
            notas,
        }
    }
}

/// Body of `POST /cursos/{id}/nucleos`; the course comes from the path.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNucleoDto {
    #[validate(
        length(min = 3, max = 200, message = "tema must have between 3 and 200 characters"),
        custom(function = "not_blank", message = "tema is required")
    )]
    #[schema(example = "Fracciones")]
    pub tema: String,
    #[validate(length(max = 5000, message = "descripcion must not exceed 5000 characters"))]
    pub descripcion: Option<String>,
}

impl CreateNucleoDto {
    pub fn normalized(self) -> Self {
        Self {
            tema: clean(&self.tema),
            descripcion: clean_optional(self.descripcion),
        }
    }
}

/// Body of `POST /nucleos`, naming the owning course explicitly.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNucleoForCursoDto {
    pub curso_id: CursoId,
    #[validate(nested)]
    #[serde(flatten)]
    pub nucleo: CreateNucleoDto,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateNucleoDto {
    #[validate(
        length(min = 3, max = 200, message = "tema must have between 3 and 200 characters"),
        custom(function = "not_blank", message = "tema is required")
    )]
    pub tema: Option<String>,
    #[validate(length(max = 5000, message = "descripcion must not exceed 5000 characters"))]
    pub descripcion: Option<String>,
}

impl UpdateNucleoDto {
    pub fn normalized(self) -> Self {
        Self {
            tema: self.tema.as_deref().map(clean),
            descripcion: clean_optional(self.descripcion),
        }
    }
}
