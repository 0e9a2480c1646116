use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{Error, Result};

/// A decoded property list value.
///
/// Integers hold the union of the signed and unsigned 64-bit ranges, which
/// is what both plist encodings can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    String(String),
    Integer(i128),
    Real(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Data(Vec<u8>),
    Array(Vec<DecodedValue>),
    Dictionary(BTreeMap<String, DecodedValue>),
}

impl DecodedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            DecodedValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, DecodedValue>> {
        match self {
            DecodedValue::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    /// Dictionary lookup; `None` for missing keys and non-dictionaries.
    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        self.as_dictionary().and_then(|entries| entries.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DecodedValue::String(_) => "string",
            DecodedValue::Integer(_) => "integer",
            DecodedValue::Real(_) => "real",
            DecodedValue::Boolean(_) => "boolean",
            DecodedValue::Date(_) => "date",
            DecodedValue::Data(_) => "data",
            DecodedValue::Array(_) => "array",
            DecodedValue::Dictionary(_) => "dictionary",
        }
    }
}

impl TryFrom<plist::Value> for DecodedValue {
    type Error = Error;

    fn try_from(value: plist::Value) -> Result<Self> {
        let decoded = match value {
            plist::Value::String(s) => DecodedValue::String(s),
            plist::Value::Integer(n) => DecodedValue::Integer(integer(n)?),
            plist::Value::Real(r) => DecodedValue::Real(r),
            plist::Value::Boolean(b) => DecodedValue::Boolean(b),
            plist::Value::Date(date) => DecodedValue::Date(DateTime::<Utc>::from(SystemTime::from(date))),
            plist::Value::Data(bytes) => DecodedValue::Data(bytes),
            // Keyed-archive object references.
            plist::Value::Uid(uid) => DecodedValue::Integer(i128::from(uid.get())),
            plist::Value::Array(values) => DecodedValue::Array(
                values
                    .into_iter()
                    .map(DecodedValue::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            plist::Value::Dictionary(entries) => DecodedValue::Dictionary(
                entries
                    .into_iter()
                    .map(|(key, value)| Ok((key, DecodedValue::try_from(value)?)))
                    .collect::<Result<BTreeMap<_, _>>>()?,
            ),
            _ => return Err(Error::UnsupportedValue),
        };
        Ok(decoded)
    }
}

fn integer(n: plist::Integer) -> Result<i128> {
    n.as_signed()
        .map(i128::from)
        .or_else(|| n.as_unsigned().map(i128::from))
        .ok_or(Error::UnsupportedValue)
}

impl Serialize for DecodedValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DecodedValue::String(s) => serializer.serialize_str(s),
            DecodedValue::Integer(n) => match (i64::try_from(*n), u64::try_from(*n)) {
                (Ok(n), _) => serializer.serialize_i64(n),
                (_, Ok(n)) => serializer.serialize_u64(n),
                _ => serializer.serialize_i128(*n),
            },
            DecodedValue::Real(r) => serializer.serialize_f64(*r),
            DecodedValue::Boolean(b) => serializer.serialize_bool(*b),
            DecodedValue::Date(date) => {
                serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            DecodedValue::Data(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            DecodedValue::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            DecodedValue::Dictionary(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::String(s) => write!(f, "{}", s),
            DecodedValue::Integer(n) => write!(f, "{}", n),
            DecodedValue::Real(r) => write!(f, "{}", r),
            DecodedValue::Boolean(b) => write!(f, "{}", b),
            DecodedValue::Date(date) => {
                write!(f, "{}", date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            DecodedValue::Data(bytes) => write!(f, "<{} bytes>", bytes.len()),
            DecodedValue::Array(values) => write!(f, "[{} items]", values.len()),
            DecodedValue::Dictionary(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::string(plist::Value::String("kensa".into()), json!("kensa"))]
    #[case::negative(plist::Value::Integer((-3i64).into()), json!(-3))]
    #[case::above_i64(plist::Value::Integer(u64::MAX.into()), json!(u64::MAX))]
    #[case::real(plist::Value::Real(0.75), json!(0.75))]
    #[case::boolean(plist::Value::Boolean(true), json!(true))]
    #[case::data(plist::Value::Data(vec![0, 1, 2]), json!("AAEC"))]
    #[case::uid(plist::Value::Uid(plist::Uid::new(7)), json!(7))]
    #[case::empty_array(plist::Value::Array(vec![]), json!([]))]
    fn test_value_to_json(#[case] value: plist::Value, #[case] expected: serde_json::Value) {
        let decoded = DecodedValue::try_from(value).unwrap();
        assert_eq!(expected, serde_json::to_value(&decoded).unwrap());
    }

    #[test]
    fn test_nested_dictionary() {
        let mut inner = plist::Dictionary::new();
        inner.insert("Priority".into(), plist::Value::Integer((-3i64).into()));
        let mut outer = plist::Dictionary::new();
        outer.insert(
            "PayloadContent".into(),
            plist::Value::Array(vec![plist::Value::Dictionary(inner)]),
        );

        let decoded = DecodedValue::try_from(plist::Value::Dictionary(outer)).unwrap();
        let priority = decoded
            .get("PayloadContent")
            .and_then(DecodedValue::as_array)
            .and_then(|items| items[0].get("Priority"))
            .and_then(DecodedValue::as_integer);
        assert_eq!(Some(-3), priority);
        assert_eq!(None, decoded.get("Missing"));
    }

    #[rstest]
    #[case::integer(DecodedValue::Integer(-3), "-3")]
    #[case::data(DecodedValue::Data(vec![1, 2, 3]), "<3 bytes>")]
    #[case::array(DecodedValue::Array(vec![DecodedValue::Boolean(false)]), "[1 items]")]
    fn test_display(#[case] value: DecodedValue, #[case] expected: &str) {
        assert_eq!(expected, value.to_string());
    }
}
