//! Decoding of the API's response envelopes
//!
//! Responses come as `{success, data}` or `{success, <resourceName>}`; list
//! responses may carry `pagination.total`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Human-readable `message` field, if the body has one
pub fn message(data: &Value) -> Option<String> {
    match data {
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Treat an explicit `success: false` as a server error
pub fn ensure_success(status: u16, data: &Value) -> Result<(), ApiError> {
    if data.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Server {
            status,
            message: message(data).unwrap_or_else(|| "Request was not successful".to_string()),
        });
    }
    Ok(())
}

/// Row array from `data`, the named key, or a bare array body
pub fn rows<T: DeserializeOwned>(data: &Value, key: &str) -> Result<Vec<T>, ApiError> {
    let array = match data {
        Value::Array(_) => Some(data),
        Value::Object(map) => map
            .get("data")
            .filter(|v| v.is_array())
            .or_else(|| map.get(key).filter(|v| v.is_array())),
        _ => None,
    };

    match array {
        Some(array) => serde_json::from_value(array.clone())
            .map_err(|e| ApiError::Decode(format!("{} rows: {}", key, e))),
        None => Ok(Vec::new()),
    }
}

/// Server-reported total row count
pub fn total(data: &Value) -> Option<u64> {
    data.pointer("/pagination/total")
        .or_else(|| data.get("total"))
        .or_else(|| data.get("count"))
        .and_then(Value::as_u64)
}

/// Single record from `data`, the named key, or the body itself
pub fn record<T: DeserializeOwned>(data: &Value, key: &str) -> Result<Option<T>, ApiError> {
    let value = match data {
        Value::Object(map) => map
            .get("data")
            .or_else(|| map.get(key))
            .unwrap_or(data),
        other => other,
    };

    if value.is_null() {
        return Ok(None);
    }

    serde_json::from_value(value.clone())
        .map(Some)
        .map_err(|e| ApiError::Decode(format!("{}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    #[test]
    fn test_rows_from_data_or_named_key() {
        let body = json!({"success": true, "data": [{"id": "a"}]});
        let parsed: Vec<Row> = rows(&body, "brands").unwrap();
        assert_eq!(parsed, vec![Row { id: "a".to_string() }]);

        let body = json!({"success": true, "brands": [{"id": "b"}, {"id": "c"}]});
        let parsed: Vec<Row> = rows(&body, "brands").unwrap();
        assert_eq!(parsed.len(), 2);

        let body = json!({"success": true});
        let parsed: Vec<Row> = rows(&body, "brands").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_malformed_rows_fail_whole_page() {
        let body = json!({"data": [{"id": "a"}, {"name": "no id"}]});
        let result: Result<Vec<Row>, _> = rows(&body, "clients");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_total_lookup_order() {
        assert_eq!(total(&json!({"pagination": {"total": 42}, "total": 1})), Some(42));
        assert_eq!(total(&json!({"total": 7})), Some(7));
        assert_eq!(total(&json!({"data": []})), None);
    }

    #[test]
    fn test_success_false_is_error() {
        let err = ensure_success(200, &json!({"success": false, "message": "Invalid credentials"}))
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(ensure_success(200, &json!({"data": []})).is_ok());
    }

    #[test]
    fn test_record_unwraps_data() {
        let parsed: Option<Row> = record(&json!({"success": true, "data": {"id": "q1"}}), "query").unwrap();
        assert_eq!(parsed, Some(Row { id: "q1".to_string() }));

        let parsed: Option<Row> = record(&json!({"success": true, "data": null}), "query").unwrap();
        assert_eq!(parsed, None);
    }
}
