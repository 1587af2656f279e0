//! Parameter normalization before tool dispatch.
//!
//! Tools only ever receive plain JSON. Any typed object in a parameter
//! mapping is replaced by its canonical serialization, recursively through
//! nested lists and maps.

use serde_json::{Map, Value};

use crate::domain::{ParamValue, ToolParams};

/// Convert a parameter mapping to plain structured data
pub fn normalize_params(params: &ToolParams) -> Result<Map<String, Value>, serde_json::Error> {
    params
        .iter()
        .map(|(key, value)| Ok((key.clone(), normalize_value(value)?)))
        .collect::<Result<Map<String, Value>, serde_json::Error>>()
}

/// Convert one parameter value to plain structured data
pub fn normalize_value(value: &ParamValue) -> Result<Value, serde_json::Error> {
    match value {
        ParamValue::Data(data) => Ok(data.clone()),
        ParamValue::Typed(object) => object.to_canonical(),
        ParamValue::List(items) => items
            .iter()
            .map(normalize_value)
            .collect::<Result<Vec<Value>, serde_json::Error>>()
            .map(Value::Array),
        ParamValue::Map(entries) => entries
            .iter()
            .map(|(key, value)| Ok((key.clone(), normalize_value(value)?)))
            .collect::<Result<Map<String, Value>, serde_json::Error>>()
            .map(Value::Object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde::ser::Error as _;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, Serialize)]
    struct Range {
        start: u32,
        end: u32,
    }

    #[derive(Debug)]
    struct Broken;

    impl Serialize for Broken {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    #[test]
    fn test_plain_data_passes_through() {
        let mut params = ToolParams::new();
        params.insert("owner".to_string(), ParamValue::Data(json!("acme")));
        params.insert("pr_number".to_string(), ParamValue::Data(json!(42)));

        let plain = normalize_params(&params).unwrap();
        assert_eq!(Value::Object(plain), json!({"owner": "acme", "pr_number": 42}));
    }

    #[test]
    fn test_typed_object_is_serialized() {
        let mut params = ToolParams::new();
        params.insert("lines".to_string(), ParamValue::typed(Range { start: 1, end: 9 }));

        let plain = normalize_params(&params).unwrap();
        assert_eq!(plain["lines"], json!({"start": 1, "end": 9}));
    }

    #[test]
    fn test_nested_typed_objects_are_serialized() {
        let mut inner = BTreeMap::new();
        inner.insert(
            "ranges".to_string(),
            ParamValue::List(vec![
                ParamValue::typed(Range { start: 1, end: 2 }),
                ParamValue::Data(json!(null)),
            ]),
        );
        let mut params = ToolParams::new();
        params.insert("filter".to_string(), ParamValue::Map(inner));

        let plain = normalize_params(&params).unwrap();
        assert_eq!(
            plain["filter"],
            json!({"ranges": [{"start": 1, "end": 2}, null]})
        );
    }

    #[test]
    fn test_empty_params() {
        assert!(normalize_params(&ToolParams::new()).unwrap().is_empty());
    }

    #[test]
    fn test_serialization_failure_propagates() {
        let mut params = ToolParams::new();
        params.insert("bad".to_string(), ParamValue::typed(Broken));
        assert!(normalize_params(&params).is_err());
    }
}
