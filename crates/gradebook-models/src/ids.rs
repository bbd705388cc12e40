//! Strongly-typed ID newtypes for domain entities.
//!
//! Courses, units and grades use database-generated `BIGSERIAL` keys, wrapped
//! so that a [`NucleoId`] can never be passed where a [`CursoId`] is expected.
//! Students are keyed by an externally assigned national id, see [`AlumnoId`].
//!
//! # Example
//!
//! ```ignore
//! use gradebook_models::ids::{CursoId, NucleoId};
//!
//! fn promedio(curso: CursoId, nucleo: NucleoId) { /* ... */ }
//!
//! promedio(CursoId::new(1), NucleoId::new(4));    // OK
//! // promedio(NucleoId::new(4), CursoId::new(1)); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;

/// Defines a newtype over a generated `BIGINT` primary key.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
        #[schema(value_type = i64, format = Int64)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <i64 as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <i64 as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i64 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i64 as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <i64 as PgHasArrayType>::array_type_info()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                i64::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Generated key of a [`Curso`](crate::cursos::Curso).
    CursoId
);

define_id!(
    /// Generated key of a [`NucleoPedagogico`](crate::nucleos::NucleoPedagogico).
    NucleoId
);

define_id!(
    /// Generated key of a [`Nota`](crate::notas::Nota).
    NotaId
);

/// Externally assigned student identifier (national id / DNI).
///
/// Stored as given; surrounding whitespace is stripped on construction so
/// `" 123 "` and `"123"` refer to the same student.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "30111222")]
pub struct AlumnoId(String);

impl AlumnoId {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AlumnoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlumnoId({})", self.0)
    }
}

impl fmt::Display for AlumnoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlumnoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AlumnoId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for AlumnoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<sqlx::Postgres> for AlumnoId {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for AlumnoId {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for AlumnoId {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        <String as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
    }
}

impl PgHasArrayType for AlumnoId {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

impl<'de> Deserialize<'de> for AlumnoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_roundtrip() {
        let id = CursoId::new(42);
        assert_eq!(id.into_inner(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(CursoId::from(42), id);
    }

    #[test]
    fn test_numeric_id_display_and_debug() {
        let id = NucleoId::new(7);
        assert_eq!(format!("{}", id), "7");
        assert_eq!(format!("{:?}", id), "NucleoId(7)");
    }

    #[test]
    fn test_numeric_id_from_str() {
        let id: NotaId = " 15 ".parse().unwrap();
        assert_eq!(id, NotaId::new(15));
        assert!("abc".parse::<NotaId>().is_err());
    }

    #[test]
    fn test_numeric_id_serde_is_transparent() {
        let json = serde_json::to_string(&CursoId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: CursoId = serde_json::from_str("3").unwrap();
        assert_eq!(back, CursoId::new(3));
    }

    #[test]
    fn test_alumno_id_is_trimmed() {
        let id = AlumnoId::new(" 30111222 ");
        assert_eq!(id.as_str(), "30111222");
        assert_eq!(id, AlumnoId::from("30111222"));
    }

    #[test]
    fn test_alumno_id_serde() {
        let id: AlumnoId = serde_json::from_str("\"40999888\"").unwrap();
        assert_eq!(id.as_str(), "40999888");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"40999888\"");
    }
}
