//! Field deserializers that never fail the enclosing document.
//!
//! Use with `#[serde(deserialize_with = "...")]` on document fields so one
//! bad value costs only that value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// The field's value, or its type default when it has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            debug!(error = %err, "malformed document field; using default");
            Ok(T::default())
        }
    }
}

/// The entries of a list that parse; anything that is not a list is empty.
pub fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            debug!(found = %other, "expected a list in document; using empty");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(error = %err, "skipping malformed list entry");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "or_default")]
        title: String,
        #[serde(deserialize_with = "or_default")]
        count: u32,
        #[serde(deserialize_with = "skip_invalid")]
        tags: Vec<String>,
    }

    #[test]
    fn bad_fields_fall_back_individually() {
        let sample: Sample =
            serde_json::from_value(json!({ "title": "Kept", "count": "three", "tags": ["a", 1, "b"] }))
                .unwrap();
        assert_eq!(sample.title, "Kept");
        assert_eq!(sample.count, 0);
        assert_eq!(sample.tags, ["a", "b"]);
    }

    #[test]
    fn non_list_becomes_empty() {
        let sample: Sample = serde_json::from_value(json!({ "tags": "a", "title": null })).unwrap();
        assert!(sample.tags.is_empty());
        assert!(sample.title.is_empty());
    }
}
