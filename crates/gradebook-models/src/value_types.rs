//! Validated value types.
//!
//! [`NotaValor`] guarantees a grade is always within `1..=10`: it cannot be
//! constructed, deserialized or decoded from the database with any other
//! value.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;

/// Error returned when a grade value falls outside `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotaValorError(pub i32);

impl std::error::Error for NotaValorError {}

impl fmt::Display for NotaValorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grade value must be between {} and {} (got {})",
            NotaValor::MIN,
            NotaValor::MAX,
            self.0
        )
    }
}

/// An integer grade between 1 and 10 inclusive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[schema(value_type = i32, example = 8)]
pub struct NotaValor(i32);

impl NotaValor {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 10;

    pub fn new(valor: i32) -> Result<Self, NotaValorError> {
        if (Self::MIN..=Self::MAX).contains(&valor) {
            Ok(Self(valor))
        } else {
            Err(NotaValorError(valor))
        }
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for NotaValor {
    type Error = NotaValorError;

    fn try_from(valor: i32) -> Result<Self, Self::Error> {
        Self::new(valor)
    }
}

impl From<NotaValor> for i32 {
    fn from(valor: NotaValor) -> i32 {
        valor.0
    }
}

impl fmt::Debug for NotaValor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotaValor({})", self.0)
    }
}

impl fmt::Display for NotaValor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for NotaValor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let valor = i32::deserialize(deserializer)?;
        Self::new(valor).map_err(serde::de::Error::custom)
    }
}

impl Type<sqlx::Postgres> for NotaValor {
    fn type_info() -> PgTypeInfo {
        <i32 as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <i32 as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for NotaValor {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for NotaValor {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let valor = <i32 as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(valor)?)
    }
}

impl PgHasArrayType for NotaValor {
    fn array_type_info() -> PgTypeInfo {
        <i32 as PgHasArrayType>::array_type_info()
    }
}

/// Plain unweighted mean of `valores`, or `0.0` when there are none.
pub fn promedio(valores: &[NotaValor]) -> f64 {
    if valores.is_empty() {
        return 0.0;
    }

    let total: i64 = valores.iter().map(|v| i64::from(v.get())).sum();
    total as f64 / valores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valores(raw: &[i32]) -> Vec<NotaValor> {
        raw.iter().map(|v| NotaValor::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(NotaValor::new(1).unwrap().get(), 1);
        assert_eq!(NotaValor::new(10).unwrap().get(), 10);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        for raw in [-3, 0, 11, 100, i32::MIN, i32::MAX] {
            assert_eq!(NotaValor::new(raw), Err(NotaValorError(raw)));
        }
    }

    #[test]
    fn test_error_message() {
        let err = NotaValor::try_from(11).unwrap_err();
        assert_eq!(
            err.to_string(),
            "grade value must be between 1 and 10 (got 11)"
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: NotaValor = serde_json::from_str("7").unwrap();
        assert_eq!(ok.get(), 7);
        assert!(serde_json::from_str::<NotaValor>("0").is_err());
        assert!(serde_json::from_str::<NotaValor>("12").is_err());
    }

    #[test]
    fn test_promedio_of_grades() {
        assert_eq!(promedio(&valores(&[8, 6, 10])), 8.0);
        assert_eq!(promedio(&valores(&[7, 8])), 7.5);
        assert_eq!(promedio(&valores(&[1])), 1.0);
    }

    #[test]
    fn test_promedio_empty_is_zero() {
        assert_eq!(promedio(&[]), 0.0);
    }
}
