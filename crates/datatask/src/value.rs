//! Raw value tree for task descriptions.
//!
//! [`RawValue`] is what a description looks like before normalization: a
//! plain JSON-shaped tree. Unlike [`serde_json::Value`], mappings keep every
//! entry in document order, duplicates included, so that conflicting
//! declarations can be reported instead of silently overwritten.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

/// A parsed, not yet validated, description fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number, kept exactly as parsed
    Number(Number),
    /// JSON string
    String(String),
    /// JSON array
    Sequence(Vec<RawValue>),
    /// JSON object, in document order and with duplicate keys preserved
    Mapping(Vec<(String, RawValue)>),
}

impl RawValue {
    /// Parse JSON text into a raw value tree.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the text is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Human readable name of the value's shape, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a position if it is a non-negative integer that fits `usize`.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a mapping.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&[(String, Self)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up the first entry with the given key in a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Compact single-line JSON rendering, used to quote fragments in errors.
    #[must_use]
    pub fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("<{}>", self.kind()))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<usize> for RawValue {
    fn from(value: usize) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<Vec<Self>> for RawValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawValue, E> {
        Ok(RawValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
        Ok(RawValue::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
        Ok(RawValue::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
        Number::from_f64(v)
            .map(RawValue::Number)
            .ok_or_else(|| E::custom("non-finite numbers are not valid JSON"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawValue, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(RawValue::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawValue, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, RawValue>()? {
            entries.push((key, value));
        }
        Ok(RawValue::Mapping(entries))
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_keys_are_preserved() {
        let value = RawValue::from_json(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let entries = value.as_mapping().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[2].0, "a");
        assert_eq!(entries[2].1.as_index(), Some(3));
    }

    #[test]
    fn test_mapping_order_is_document_order() {
        let value = RawValue::from_json(r#"{"z": null, "a": null, "m": null}"#).unwrap();
        let keys: Vec<_> = value
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_as_index_rejects_negative_and_fractional() {
        assert_eq!(RawValue::from_json("4").unwrap().as_index(), Some(4));
        assert_eq!(RawValue::from_json("-1").unwrap().as_index(), None);
        assert_eq!(RawValue::from_json("1.5").unwrap().as_index(), None);
        assert_eq!(RawValue::from("4").as_index(), None);
    }

    #[test]
    fn test_render_is_compact_json() {
        let value = RawValue::from_json(r#"{ "$mul" : [ {"inv": "price"}, 2 ] }"#).unwrap();
        assert_eq!(value.render(), r#"{"$mul":[{"inv":"price"},2]}"#);
        assert_eq!(value.to_string(), value.render());
    }

    #[test]
    fn test_from_serde_json_value() {
        let json = serde_json::json!({"inputs": {"abc.csv": ["a", "b"]}, "flag": true});
        let value = RawValue::from(json);
        assert_eq!(value.kind(), "mapping");
        let schema = value.get("inputs").and_then(|i| i.get("abc.csv")).unwrap();
        assert_eq!(schema.as_sequence().map(<[RawValue]>::len), Some(2));
        assert_eq!(value.get("flag").and_then(RawValue::as_bool), Some(true));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(RawValue::from_json("{\"a\": }").is_err());
    }
}
