use crate::error::CoreError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A product identifier.
///
/// SKUs are kept as the exact text found in the input so that codes such as `"007"` or
/// `"TSH-RED-M"` survive untouched. Integer-looking SKUs order numerically (`2 < 10`) and
/// are written out as JSON numbers, which is how the downstream consumers key products.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value of the SKU, if it is written in canonical integer form.
    pub fn as_integer(&self) -> Option<i64> {
        let n = self.0.parse::<i64>().ok()?;
        // "007" and "+7" parse, but writing them back as 7 would change the key.
        (n.to_string() == self.0).then_some(n)
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Sku {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for Sku {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidSku("empty value".to_string()));
        }
        Ok(Self::new(trimmed))
    }
}

impl Ord for Sku {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => a.cmp(&b),
            // Numeric SKUs sort ahead of free-form codes.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Sku {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Sku {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

struct SkuVisitor;

impl<'de> Visitor<'de> for SkuVisitor {
    type Value = Sku;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a SKU as text or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Sku(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Sku::from(v))
    }
}

impl<'de> Deserialize<'de> for Sku {
    /// Asks for a string so CSV readers hand over the raw field (leading zeros intact)
    /// instead of guessing an integer type.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_string(SkuVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_skus_order_numerically() {
        let mut skus = vec![Sku::from("10"), Sku::from("2"), Sku::from("ABC"), Sku::from("1")];
        skus.sort();
        let ordered: Vec<&str> = skus.iter().map(Sku::as_str).collect();
        assert_eq!(ordered, vec!["1", "2", "10", "ABC"]);
    }

    #[test]
    fn leading_zeros_are_not_integers() {
        assert_eq!(Sku::from("007").as_integer(), None);
        assert_eq!(Sku::from("7").as_integer(), Some(7));
        assert_ne!(Sku::from("007"), Sku::from("7"));
        assert_ne!(Sku::from("007").cmp(&Sku::from("7")), Ordering::Equal);
    }

    #[test]
    fn serializes_numbers_as_json_numbers() {
        assert_eq!(serde_json::to_string(&Sku::from("42")).unwrap(), "42");
        assert_eq!(serde_json::to_string(&Sku::from("TSH-01")).unwrap(), "\"TSH-01\"");
    }

    #[test]
    fn rejects_blank_sku() {
        assert!("   ".parse::<Sku>().is_err());
        assert_eq!(" 12 ".parse::<Sku>().unwrap(), Sku::from("12"));
    }
}
