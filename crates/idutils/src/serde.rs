//! Field adapters for `#[serde(with = "...")]`.
//!
//! [`SnowflakeId`] already serializes as a bare integer. These modules add
//! validation on the way in, and a string form for consumers that cannot
//! hold a full 64-bit integer (JavaScript numbers stop at 53 bits).
//!
//! ```
//! use idutils::SnowflakeId;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Row {
//!     #[serde(with = "idutils::serde::as_string")]
//!     event_id: SnowflakeId,
//! }
//!
//! let row = Row { event_id: SnowflakeId::from_raw(679_215_357_097_835_243) };
//! let json = serde_json::to_string(&row).unwrap();
//! assert_eq!(json, r#"{"event_id":"679215357097835243"}"#);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SnowflakeId;

/// Errors raised while deserializing an ID.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SerdeError {
    /// The value sets the reserved sign bit, so no generator could have
    /// issued it.
    #[error("invalid snowflake id {id}: reserved bit is set")]
    ReservedBitSet { id: i64 },

    /// The string form did not hold a decimal integer.
    #[error("invalid snowflake id string {input:?}")]
    NotAnInteger { input: String },
}

fn validate<E: serde::de::Error>(id: SnowflakeId) -> Result<SnowflakeId, E> {
    if id.is_valid() {
        Ok(id)
    } else {
        Err(E::custom(SerdeError::ReservedBitSet { id: id.to_raw() }))
    }
}

pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer, SnowflakeId, validate};

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value is negative (reserved bit set)
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(d)?;
        validate(SnowflakeId::from_raw(raw))
    }
}

pub mod as_string {
    use super::{Deserializer, SerdeError, Serializer, SnowflakeId, validate};

    /// Serialize an ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an ID from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a decimal `i64`
    /// - The value is negative (reserved bit set)
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal snowflake id string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let raw = v.parse::<i64>().map_err(|_| {
                    E::custom(SerdeError::NotAnInteger {
                        input: v.to_owned(),
                    })
                })?;
                validate(SnowflakeId::from_raw(raw))
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct NativeRow {
        #[serde(with = "as_native")]
        event_id: SnowflakeId,
    }

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct StringRow {
        #[serde(with = "as_string")]
        event_id: SnowflakeId,
    }

    #[test]
    fn derived_impl_is_transparent() {
        let id = SnowflakeId::from_raw(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: SnowflakeId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn native_roundtrip() {
        let row = NativeRow {
            event_id: SnowflakeId::from_raw(679_215_357_097_835_243),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":679215357097835243}"#);
        let back: NativeRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn native_rejects_reserved_bit() {
        let err = serde_json::from_value::<NativeRow>(json!({"event_id": -1}))
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            SerdeError::ReservedBitSet { id: -1 }.to_string()
        );
    }

    #[test]
    fn string_roundtrip() {
        let row = StringRow {
            event_id: SnowflakeId::from_raw(i64::MAX),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":"9223372036854775807"}"#);
        let back: StringRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn string_rejects_garbage() {
        let err = serde_json::from_value::<StringRow>(json!({"event_id": "12ab"}))
            .expect_err("should fail");
        assert!(err.to_string().contains("invalid snowflake id string"));

        let err = serde_json::from_value::<StringRow>(json!({"event_id": "-5"}))
            .expect_err("should fail");
        assert!(err.to_string().contains("reserved bit is set"));
    }
}
