//! Normalized value types for domain primitives.
//!
//! Values are normalized when parsed and stored in normalized form, so
//! comparisons and uniqueness checks never depend on the caller's casing.
//!
//! - [`Email`]: trimmed, lowercased, validated
//! - [`ClassName`]: trimmed, uppercased, non-empty
//!
//! # Example
//!
//! ```ignore
//! use classroom_models::value_types::{ClassName, Email};
//!
//! let email = Email::parse(" Ana@X.com ").unwrap();
//! assert_eq!(email.as_str(), "ana@x.com");
//!
//! let name = ClassName::parse("math 101").unwrap();
//! assert_eq!(name.as_str(), "MATH 101");
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::ValidateEmail;

pub const MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    InvalidEmail(String),
    InvalidClassName(String),
}

impl std::error::Error for ValueTypeError {}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            Self::InvalidClassName(msg) => write!(f, "Invalid class name: {}", msg),
        }
    }
}

/// Implements the string plumbing shared by every normalized value type:
/// display, parsing, serde and the Postgres `VARCHAR` mapping.
macro_rules! string_value_type {
    ($name:ident) => {
        impl $name {
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Wraps a value already normalized, e.g. one read back from the
            /// database.
            #[inline]
            pub fn new_unchecked(value: impl Into<String>) -> Self {
                Self(value.into())
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

        impl FromStr for $name {
            type Err = ValueTypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueTypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
                // Rows are written through `parse`, so stored values are normalized.
                Ok(Self::new_unchecked(s))
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <String as PgHasArrayType>::array_type_info()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ============================================================================
// Email
// ============================================================================

/// A validated, lowercase email address.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, format = "email", example = "ana@example.com")]
pub struct Email(String);

impl Email {
    /// Trims, lowercases and validates `raw`.
    pub fn parse(raw: &str) -> Result<Self, ValueTypeError> {
        let email = raw.trim().to_lowercase();

        if email.is_empty() {
            return Err(ValueTypeError::InvalidEmail("email cannot be empty".into()));
        }

        if email.len() > MAX_LENGTH {
            return Err(ValueTypeError::InvalidEmail(format!(
                "email must be at most {MAX_LENGTH} characters"
            )));
        }

        if !email.validate_email() {
            return Err(ValueTypeError::InvalidEmail(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        Ok(Self(email))
    }

    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

string_value_type!(Email);

// ============================================================================
// ClassName
// ============================================================================

/// A class name, stored uppercase.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "MATH 101")]
pub struct ClassName(String);

impl ClassName {
    /// Trims and uppercases `raw`.
    pub fn parse(raw: &str) -> Result<Self, ValueTypeError> {
        let name = raw.trim().to_uppercase();

        if name.is_empty() {
            return Err(ValueTypeError::InvalidClassName("name cannot be empty".into()));
        }

        if name.chars().count() > MAX_LENGTH {
            return Err(ValueTypeError::InvalidClassName(format!(
                "name must be at most {MAX_LENGTH} characters"
            )));
        }

        Ok(Self(name))
    }
}

string_value_type!(ClassName);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        let email = Email::parse("  Ana@X.com ").unwrap();
        assert_eq!(email, "ana@x.com");
        assert_eq!(email.local_part(), "ana");
        assert_eq!(email.domain(), "x.com");
    }

    #[test]
    fn test_email_case_variants_are_equal() {
        assert_eq!(
            Email::parse("ANA@X.COM").unwrap(),
            Email::parse("ana@x.com").unwrap()
        );
    }

    #[test]
    fn test_email_rejects_invalid() {
        assert!(Email::parse("").is_err());
        assert!(Email::parse("   ").is_err());
        assert!(Email::parse("not-an-email").is_err());
        let long = format!("{}@x.com", "a".repeat(100));
        assert!(Email::parse(&long).is_err());
    }

    #[test]
    fn test_class_name_is_trimmed_and_uppercased() {
        let name = ClassName::parse("  math 101 ").unwrap();
        assert_eq!(name.as_str(), "MATH 101");
    }

    #[test]
    fn test_class_name_rejects_blank_and_long() {
        assert!(ClassName::parse(" ").is_err());
        assert!(ClassName::parse(&"x".repeat(101)).is_err());
        assert!(ClassName::parse(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let email: Email = serde_json::from_str(r#""Ana@X.com""#).unwrap();
        assert_eq!(email.as_str(), "ana@x.com");
        assert!(serde_json::from_str::<Email>(r#""nope""#).is_err());
        let name: ClassName = serde_json::from_str(r#""art""#).unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), r#""ART""#);
    }

    #[test]
    fn test_debug_names_the_type() {
        let email = Email::new_unchecked("a@b.co");
        assert_eq!(format!("{email:?}"), "Email(a@b.co)");
    }
}
