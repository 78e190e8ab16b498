//! Customer email addresses.
//!
//! An email is the account key: login, registration and the checkout
//! find-or-create all look users up by it. Addresses are trimmed and
//! lowercased on the way in, so `Ada@Example.COM` and `ada@example.com` reach
//! the same account and the `users.email` lowercase check always holds.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a submitted address was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email must contain a single @ symbol")]
    MultipleAtSymbols,
    #[error("email cannot contain spaces")]
    ContainsWhitespace,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    #[error("email domain cannot be empty")]
    EmptyDomain,
}

/// A trimmed, lowercased email address with one `@` between a non-empty
/// mailbox and domain.
///
/// The check is deliberately shallow: checkout only needs an address the
/// shop can write back to, not RFC 5322 conformance.
///
/// ```
/// use football_shop_core::Email;
///
/// let email = Email::parse(" Ivan.Petrov@Mail.RU ").unwrap();
/// assert_eq!(email.as_str(), "ivan.petrov@mail.ru");
///
/// assert!(Email::parse("ivan@").is_err());
/// assert!(Email::parse("ivan@mail@ru").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Longest address accepted (RFC 5321 path limit).
    pub const MAX_LENGTH: usize = 254;

    /// Validate and case-fold a submitted address.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the trimmed input violates.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (local, domain) = trimmed.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::MultipleAtSymbols);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Stored as TEXT; rows are written only through `parse`, so decoding trusts them.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        <String as sqlx::Decode<sqlx::Postgres>>::decode(value).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_shop_addresses() {
        for raw in [
            "fan@example.com",
            "ivan.petrov+boots@mail.ru",
            "keeper@club.co.uk",
            "a@b.c",
        ] {
            assert_eq!(Email::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_case_folds_and_trims() {
        let email = Email::parse("  Fan@FootballShop.Local ").unwrap();
        assert_eq!(email.as_str(), "fan@footballshop.local");
        assert_eq!(email, "FAN@footballshop.local".parse().unwrap());
        assert_eq!(email.to_string(), "fan@footballshop.local");
    }

    #[test]
    fn test_rejections() {
        let cases = [
            ("", EmailError::Empty),
            ("   ", EmailError::Empty),
            ("no-at-symbol", EmailError::MissingAtSymbol),
            ("ivan@mail@ru", EmailError::MultipleAtSymbols),
            ("ivan petrov@mail.ru", EmailError::ContainsWhitespace),
            ("@mail.ru", EmailError::EmptyLocalPart),
            ("ivan@", EmailError::EmptyDomain),
        ];
        for (raw, expected) in cases {
            assert_eq!(Email::parse(raw), Err(expected), "{raw:?}");
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("Fan@Example.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"fan@example.com\"");
    }
}
