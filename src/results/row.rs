//! Result rows and the results collection.

use serde_json::{Map, Value};

use crate::error::ResultsError;

/// One historical record, e.g. a finished match.
///
/// The field set is whatever the backend sent. Field order is the order the
/// keys appeared in the payload object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    fields: Map<String, Value>,
}

impl ResultRow {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field names in payload order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ResultRow {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Rows as received, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsCollection {
    rows: Vec<ResultRow>,
}

impl ResultsCollection {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    /// Build a collection from a decoded payload.
    ///
    /// The payload must be an array whose elements are all objects.
    pub fn from_json(payload: Value) -> Result<Self, ResultsError> {
        let Value::Array(items) = payload else {
            return Err(ResultsError::InvalidPayload(format!(
                "expected an array, got {}",
                json_kind(&payload)
            )));
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(fields) => rows.push(ResultRow::new(fields)),
                other => {
                    return Err(ResultsError::InvalidPayload(format!(
                        "element {} is {}, expected an object",
                        index,
                        json_kind(&other)
                    )))
                }
            }
        }
        Ok(Self { rows })
    }

    /// Decode a raw response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ResultsError> {
        let payload: Value = serde_json::from_slice(body)
            .map_err(|e| ResultsError::InvalidPayload(e.to_string()))?;
        Self::from_json(payload)
    }

    /// Rows in received order.
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Rows most recent first, the order they are displayed in.
    pub fn newest_first(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_preserves_payload_key_order() {
        let collection =
            ResultsCollection::from_slice(br#"[{"Winner": "b", "Bot1": "a", "Map": "m"}]"#)
                .unwrap();
        let names: Vec<&str> = collection.rows()[0].field_names().collect();
        assert_eq!(names, vec!["Winner", "Bot1", "Map"]);
    }

    #[test]
    fn test_empty_array_is_valid() {
        let collection = ResultsCollection::from_json(json!([])).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_non_array_payload_is_invalid() {
        let err = ResultsCollection::from_json(json!({"Results": []})).unwrap_err();
        match err {
            ResultsError::InvalidPayload(msg) => assert!(msg.contains("an object")),
            other => panic!("Expected InvalidPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_element_is_invalid() {
        let err = ResultsCollection::from_json(json!([{"a": 1}, 7])).unwrap_err();
        match err {
            ResultsError::InvalidPayload(msg) => {
                assert!(msg.contains("element 1"));
                assert!(msg.contains("a number"));
            }
            other => panic!("Expected InvalidPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let err = ResultsCollection::from_slice(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, ResultsError::InvalidPayload(_)));
    }

    #[test]
    fn test_newest_first_reverses() {
        let collection = ResultsCollection::new(vec![
            ResultRow::from_iter([("n", json!(1))]),
            ResultRow::from_iter([("n", json!(2))]),
        ]);
        let order: Vec<&Value> = collection
            .newest_first()
            .filter_map(|row| row.get("n"))
            .collect();
        assert_eq!(order, vec![&json!(2), &json!(1)]);
    }
}
