use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{NotaId, NucleoId};
use crate::validation::clean_optional;
use crate::value_types::NotaValor;

/// A single grade recorded under a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Nota {
    pub id: NotaId,
    pub valor: NotaValor,
    pub descripcion: Option<String>,
    pub nucleo_id: NucleoId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `valor` stays a plain integer here so an out-of-range grade reaches the
/// service and is reported as a validation error rather than a JSON error.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNotaDto {
    #[validate(range(min = 1, max = 10, message = "grade value must be between 1 and 10"))]
    #[schema(minimum = 1, maximum = 10, example = 8)]
    pub valor: i32,
    #[validate(length(max = 200, message = "descripcion must not exceed 200 characters"))]
    pub descripcion: Option<String>,
}

impl CreateNotaDto {
    pub fn normalized(self) -> Self {
        Self {
            valor: self.valor,
            descripcion: clean_optional(self.descripcion),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateNotaDto {
    #[validate(range(min = 1, max = 10, message = "grade value must be between 1 and 10"))]
    pub valor: Option<i32>,
    #[validate(length(max = 200, message = "descripcion must not exceed 200 characters"))]
    pub descripcion: Option<String>,
}

impl UpdateNotaDto {
    pub fn normalized(self) -> Self {
        Self {
            valor: self.valor,
            descripcion: clean_optional(self.descripcion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_nota_dto_range() {
        for valor in [1, 5, 10] {
            let dto = CreateNotaDto {
                valor,
                descripcion: None,
            };
            assert!(dto.validate().is_ok(), "{valor} should be accepted");
        }

        for valor in [0, 11, -1] {
            let dto = CreateNotaDto {
                valor,
                descripcion: None,
            };
            assert!(dto.validate().is_err(), "{valor} should be rejected");
        }
    }

    #[test]
    fn test_create_nota_dto_descripcion_length() {
        let dto = CreateNotaDto {
            valor: 7,
            descripcion: Some("x".repeat(201)),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_nota_dto_range() {
        assert!(UpdateNotaDto::default().validate().is_ok());

        let dto = UpdateNotaDto {
            valor: Some(11),
            descripcion: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_nota_serializes_valor_as_integer() {
        let now = Utc::now();
        let nota = Nota {
            id: NotaId::new(1),
            valor: NotaValor::new(9).unwrap(),
            descripcion: Some("Trabajo práctico".to_string()),
            nucleo_id: NucleoId::new(2),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&nota).unwrap();
        assert_eq!(json["valor"], 9);
        assert_eq!(json["nucleo_id"], 2);
    }
}
