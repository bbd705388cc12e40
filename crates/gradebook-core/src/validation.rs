use anyhow::anyhow;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// Joins every field error into a single comma-separated message.
///
/// Errors without an explicit message fall back to `"<field> is invalid"`.
/// Fields are sorted so the message is stable between runs.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs `validator` on a DTO, mapping failures to a 400 [`AppError`].
pub fn validate_dto<T: Validate>(dto: &T) -> Result<(), AppError> {
    dto.validate()
        .map_err(|errors| AppError::bad_request(anyhow!("{}", format_validation_errors(&errors))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "nombre must have at least 2 characters"))]
        nombre: String,
        #[validate(range(min = 1))]
        anio: i32,
    }

    #[test]
    fn test_format_uses_message_or_fallback() {
        let sample = Sample {
            nombre: "a".to_string(),
            anio: 0,
        };
        let errors = sample.validate().unwrap_err();
        let message = format_validation_errors(&errors);
        assert_eq!(
            message,
            "anio is invalid, nombre must have at least 2 characters"
        );
    }

    #[test]
    fn test_validate_dto_maps_to_bad_request() {
        let sample = Sample {
            nombre: "ok".to_string(),
            anio: 0,
        };
        let err = validate_dto(&sample).unwrap_err();
        assert!(err.is_validation());

        let valid = Sample {
            nombre: "ok".to_string(),
            anio: 3,
        };
        assert!(validate_dto(&valid).is_ok());
    }
}
