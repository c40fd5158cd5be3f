//! Patch fields that a caller may clear.
//!
//! Used as `#[serde(default, deserialize_with = "shared::nullable::deserialize")]`
//! on an `Option<Option<T>>` field: a missing key leaves the field unchanged
//! (`None`), an explicit `null` clears it (`Some(None)`) and a value replaces
//! it (`Some(Some(value))`).

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::deserialize")]
        address: Option<Option<String>>,
    }

    fn parse(json: &str) -> Option<Option<String>> {
        serde_json::from_str::<Patch>(json).unwrap().address
    }

    #[test]
    fn test_missing_null_and_value_are_distinct() {
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"address":null}"#), Some(None));
        assert_eq!(
            parse(r#"{"address":"Calle 10 # 5-20"}"#),
            Some(Some("Calle 10 # 5-20".to_string()))
        );
    }
}
