//! Product category enum.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid category: {0} (expected Men, Women, or Kids)")]
pub struct CategoryError(pub String);

/// Product category.
///
/// The catalog is partitioned into a closed set of three categories. The
/// wire representation is the capitalized name (`"Men"`, `"Women"`,
/// `"Kids"`), which is also how the value is stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Men,
    Women,
    Kids,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 3] = [Self::Men, Self::Women, Self::Kids];

    /// The canonical string form of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Kids => "Kids",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Men" => Ok(Self::Men),
            "Women" => Ok(Self::Women),
            "Kids" => Ok(Self::Kids),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Category {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Category {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Category {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("men".parse::<Category>().is_err());
        assert!("Shoes".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_wire_form() {
        let json = serde_json::to_string(&Category::Women).unwrap();
        assert_eq!(json, "\"Women\"");
        let back: Category = serde_json::from_str("\"Kids\"").unwrap();
        assert_eq!(back, Category::Kids);
        assert!(serde_json::from_str::<Category>("\"kids\"").is_err());
    }
}
