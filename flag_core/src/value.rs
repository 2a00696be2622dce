//! Tagged value representation for structured flags and the JSON
//! document decoder that produces it.

use std::collections::HashMap;

/// The universal representation for structured flag values.
///
/// Scalar resolvers return their native type directly; structured flags
/// are returned as this tagged union. There is no null variant: JSON
/// null decodes to its textual representation (see [`decode_document`]).
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FlagValue>),
    Object(HashMap<String, FlagValue>),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FlagValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FlagValue]> {
        match self {
            FlagValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, FlagValue>> {
        match self {
            FlagValue::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        FlagValue::Bool(b)
    }
}

impl From<i64> for FlagValue {
    fn from(i: i64) -> Self {
        FlagValue::Int(i)
    }
}

impl From<f64> for FlagValue {
    fn from(f: f64) -> Self {
        FlagValue::Float(f)
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        FlagValue::String(s)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        FlagValue::String(s.to_string())
    }
}

/// Converts a parsed JSON document into a [`FlagValue`], recursively.
///
/// Pure conversion, no I/O. Numbers representable as `i64` become `Int`,
/// all other numbers become `Float`. Nulls (and any node kind without a
/// dedicated variant) fall back to the node's textual representation as
/// a string value; the decoder never fails.
pub fn decode_document(doc: &serde_json::Value) -> FlagValue {
    match doc {
        serde_json::Value::Bool(b) => FlagValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FlagValue::Int(i)
            } else {
                // u64 out of i64 range also lands here, as a float
                FlagValue::Float(n.as_f64().unwrap_or_default())
            }
        }
        serde_json::Value::String(s) => FlagValue::String(s.clone()),
        serde_json::Value::Array(items) => {
            FlagValue::List(items.iter().map(decode_document).collect())
        }
        serde_json::Value::Object(fields) => FlagValue::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), decode_document(v)))
                .collect(),
        ),
        other => FlagValue::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scalar_leaves() {
        assert_eq!(
            decode_document(&serde_json::json!(true)),
            FlagValue::Bool(true)
        );
        assert_eq!(decode_document(&serde_json::json!(7)), FlagValue::Int(7));
        assert_eq!(
            decode_document(&serde_json::json!(2.5)),
            FlagValue::Float(2.5)
        );
        assert_eq!(
            decode_document(&serde_json::json!("hello")),
            FlagValue::String("hello".to_string())
        );
    }

    #[test]
    fn null_decodes_to_its_textual_representation() {
        assert_eq!(
            decode_document(&serde_json::Value::Null),
            FlagValue::String("null".to_string())
        );
    }

    #[test]
    fn array_preserves_element_order() {
        let decoded = decode_document(&serde_json::json!([1, "two", false]));
        assert_eq!(
            decoded,
            FlagValue::List(vec![
                FlagValue::Int(1),
                FlagValue::String("two".to_string()),
                FlagValue::Bool(false),
            ])
        );
    }

    #[test]
    fn nested_object_round_trip() {
        let decoded = decode_document(&serde_json::json!({"a": 1, "b": [true, "x"]}));
        let fields = decoded.as_object().expect("should be an object");
        assert_eq!(fields["a"], FlagValue::Int(1));
        assert_eq!(
            fields["b"],
            FlagValue::List(vec![FlagValue::Bool(true), FlagValue::String("x".to_string())])
        );
    }

    #[test]
    fn integral_and_floating_numbers_are_distinguished() {
        assert_eq!(decode_document(&serde_json::json!(3)), FlagValue::Int(3));
        assert_eq!(
            decode_document(&serde_json::json!(3.0)),
            FlagValue::Float(3.0)
        );
        // u64 beyond i64 range degrades to float rather than failing
        let big = serde_json::json!(u64::MAX);
        match decode_document(&big) {
            FlagValue::Float(_) => {}
            other => panic!("Expected Float, got {other:?}"),
        }
    }

    #[test]
    fn accessors_reject_other_variants() {
        let v = FlagValue::Int(1);
        assert_eq!(v.as_int(), Some(1));
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_float(), None);
        assert_eq!(v.as_str(), None);
        assert!(v.as_list().is_none());
        assert!(v.as_object().is_none());
    }

    #[test]
    fn null_inside_collections_also_falls_back_to_string() {
        let decoded = decode_document(&serde_json::json!({"maybe": null}));
        let fields = decoded.as_object().expect("should be an object");
        assert_eq!(fields["maybe"], FlagValue::String("null".to_string()));
    }
}
