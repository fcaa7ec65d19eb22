//! The uniform response envelope and payload normalisation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::error::{ApiError, Result};

/// Envelope status discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Request succeeded
    Success,
    /// Request failed; see `message`
    Error,
}

/// `{ status, data?, message? }` wrapper around every backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    /// Outcome
    pub status: ResponseStatus,
    /// Payload
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope around `data`.
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            message: None,
        }
    }

    /// Failed envelope with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Turn an error envelope into [`ApiError::Rejected`].
    pub fn into_result(self) -> Result<Option<T>> {
        match self.status {
            ResponseStatus::Success => Ok(self.data),
            ResponseStatus::Error => Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "request failed".to_string()),
            )),
        }
    }

    /// Like [`Self::into_result`] but the payload is mandatory.
    pub fn into_data(self, what: &'static str) -> Result<T> {
        self.into_result()?.ok_or(ApiError::MissingData(what))
    }
}

/// Decode a payload into its endpoint type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Decode a single record that some endpoints wrap in a one-element list.
pub fn decode_one<T: DeserializeOwned>(value: Value, what: &'static str) -> Result<T> {
    match value {
        Value::Array(items) => {
            let first = items.into_iter().next().ok_or(ApiError::MissingData(what))?;
            decode(first)
        }
        other => decode(other),
    }
}

/// Rewrite a list of `[key, value]` pairs into an object.
///
/// Several endpoints serialise records as ordered pairs. Anything that is not
/// a pair list is returned untouched.
pub fn normalize_pairs(value: Value) -> Value {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(is_pair) => {
            let object: Map<String, Value> = items.into_iter().filter_map(into_pair).collect();
            Value::Object(object)
        }
        other => other,
    }
}

fn is_pair(item: &Value) -> bool {
    matches!(item.as_array().map(|pair| pair.as_slice()), Some([Value::String(_), _]))
}

fn into_pair(item: Value) -> Option<(String, Value)> {
    let Value::Array(mut pair) = item else {
        return None;
    };
    let val = pair.pop()?;
    match pair.pop()? {
        Value::String(key) => Some((key, val)),
        _ => None,
    }
}

/// Extract the error detail from a non-2xx body.
pub fn error_detail(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        let trimmed = body.trim();
        return if trimmed.is_empty() { "No detail".to_string() } else { trimmed.to_string() };
    };

    match json.get("detail").or_else(|| json.get("message")) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "No detail".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_is_rejected() {
        let envelope: ApiResponse = serde_json::from_value(json!({
            "status": "error",
            "message": "mission not found"
        }))
        .unwrap();

        match envelope.into_result() {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "mission not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_payload() {
        let envelope: ApiResponse = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(matches!(envelope.into_data("report"), Err(ApiError::MissingData("report"))));
    }

    #[test]
    fn test_unknown_status_is_a_decode_error() {
        let result = serde_json::from_value::<ApiResponse>(json!({"status": "ok"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_pairs() {
        let pairs = json!([["context", "c"], ["contraintes", ["x"]]]);
        assert_eq!(normalize_pairs(pairs), json!({"context": "c", "contraintes": ["x"]}));

        let rows = json!([{"id": 1}]);
        assert_eq!(normalize_pairs(rows.clone()), rows);
        assert_eq!(normalize_pairs(json!([])), json!([]));
    }

    #[test]
    fn test_decode_one_unwraps_lists() {
        let n: u32 = decode_one(json!([3, 4]), "n").unwrap();
        assert_eq!(n, 3);
        let n: u32 = decode_one(json!(5), "n").unwrap();
        assert_eq!(n, 5);
        assert!(matches!(decode_one::<u32>(json!([]), "n"), Err(ApiError::MissingData("n"))));
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail": "bad file"}"#), "bad file");
        assert_eq!(error_detail(r#"{"message": "nope"}"#), "nope");
        assert_eq!(error_detail(r#"{"detail": [{"loc": 1}]}"#), r#"[{"loc":1}]"#);
        assert_eq!(error_detail("gateway timeout"), "gateway timeout");
        assert_eq!(error_detail(""), "No detail");
    }
}
