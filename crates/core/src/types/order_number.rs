//! Human-facing order numbers.
//!
//! Format: `WN` + `YYMMDD` + six upper-case base36 characters, e.g.
//! `WN260115K3Z9Q0`. Uniqueness is enforced by the database; the random
//! suffix only makes collisions rare enough that a bounded retry suffices.

use core::fmt;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    #[error("order number must be {len} characters")]
    Length { len: usize },
    #[error("order number must start with {prefix}")]
    Prefix { prefix: &'static str },
    #[error("order number date part must be six digits")]
    Date,
    #[error("order number suffix must be upper-case letters or digits")]
    Suffix,
}

/// A generated order number. Immutable once assigned to an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub const PREFIX: &'static str = "WN";
    pub const SUFFIX_LEN: usize = 6;
    pub const LEN: usize = Self::PREFIX.len() + 6 + Self::SUFFIX_LEN;

    /// Generate a fresh order number for `date`.
    pub fn generate<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> Self {
        let mut s = String::with_capacity(Self::LEN);
        s.push_str(Self::PREFIX);
        s.push_str(&date.format("%y%m%d").to_string());
        for _ in 0..Self::SUFFIX_LEN {
            s.push(char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]));
        }
        Self(s)
    }

    /// Parse an order number received from a client or the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not match `WN\d{6}[A-Z0-9]{6}`.
    pub fn parse(input: &str) -> Result<Self, OrderNumberError> {
        if input.len() != Self::LEN {
            return Err(OrderNumberError::Length { len: Self::LEN });
        }
        let rest = input
            .strip_prefix(Self::PREFIX)
            .ok_or(OrderNumberError::Prefix {
                prefix: Self::PREFIX,
            })?;
        let (date, suffix) = rest.split_at(6);
        if !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderNumberError::Date);
        }
        if !suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        {
            return Err(OrderNumberError::Suffix);
        }
        Ok(Self(input.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderNumber {
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
    use std::collections::HashSet;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn matches_format(s: &str) -> bool {
        s.len() == 14
            && s.starts_with("WN")
            && s[2..8].bytes().all(|b| b.is_ascii_digit())
            && s[8..]
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
    }

    #[test]
    fn test_generated_format() {
        let mut rng = rand::rng();
        let number = OrderNumber::generate(date(), &mut rng);
        assert!(matches_format(number.as_str()), "{number}");
        assert!(number.as_str().starts_with("WN260115"));
    }

    #[test]
    fn test_same_instant_numbers_are_distinct() {
        let mut rng = rand::rng();
        let numbers: HashSet<_> = (0..1000)
            .map(|_| OrderNumber::generate(date(), &mut rng))
            .collect();
        assert_eq!(numbers.len(), 1000);
    }

    #[test]
    fn test_generated_numbers_parse() {
        let mut rng = rand::rng();
        let number = OrderNumber::generate(date(), &mut rng);
        assert_eq!(OrderNumber::parse(number.as_str()).unwrap(), number);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            OrderNumber::parse("WN2601"),
            Err(OrderNumberError::Length { .. })
        ));
        assert!(matches!(
            OrderNumber::parse("XX260115ABCDEF"),
            Err(OrderNumberError::Prefix { .. })
        ));
        assert_eq!(
            OrderNumber::parse("WN26A115ABCDEF"),
            Err(OrderNumberError::Date)
        );
        assert_eq!(
            OrderNumber::parse("WN260115abcdef"),
            Err(OrderNumberError::Suffix)
        );
    }
}
