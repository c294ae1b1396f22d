// Value Codec
//
// Text representation shared by every backing store.
// Null is the absent sentinel: empty text decodes to null.

use serde_json::Value;

/// Encode a value into the text stored by a backing store.
pub fn encode(value: &Value) -> String {
    value.to_string()
}

/// Decode stored text back into a value.
///
/// Empty text is treated as an absent value.
pub fn decode(text: &str) -> Result<Value, serde_json::Error> {
    if text.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_text_is_null() {
        assert_eq!(decode("").unwrap(), Value::Null);
    }

    #[test]
    fn null_encodes_as_json_null() {
        assert_eq!(encode(&Value::Null), "null");
        assert_eq!(decode("null").unwrap(), Value::Null);
    }

    #[test]
    fn structured_value_survives() {
        let value = json!({ "name": "sheet", "rows": [1, 2, 3], "empty": "" });
        assert_eq!(decode(&encode(&value)).unwrap(), value);
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(decode("{not json").is_err());
    }
}
