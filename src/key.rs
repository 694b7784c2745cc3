//! Composite key encoding.
//!
//! A composite key packs a logical `(objectType, attribute...)` tuple into a
//! single null-delimited string key so the state store can range-scan over a
//! shared prefix. The encoding must match the remote store's own composite
//! keys byte for byte, otherwise keys built here are useless as range-query
//! boundaries.
//!
//! # Example
//!
//! ```
//! use ledgershim::key::{create_composite_key, split_composite_key};
//!
//! let key = create_composite_key("owner~asset", &["alice", "asset1"]).unwrap();
//! assert_eq!(key, "\u{0}owner~asset\u{0}alice\u{0}asset1\u{0}");
//!
//! let (object_type, attrs) = split_composite_key(&key).unwrap();
//! assert_eq!(object_type, "owner~asset");
//! assert_eq!(attrs, vec!["alice", "asset1"]);
//! ```

use crate::error::{Result, ShimError};

/// Delimiter byte separating composite key components.
pub const COMPOSITE_KEY_DELIMITER: char = '\u{0}';

/// Encode an object type and ordered attributes into a composite key.
///
/// Attribute order is significant and preserved verbatim: no sorting, no
/// deduplication. Fails with [`ShimError::InvalidArgument`] when the object
/// type or any attribute is an empty string.
pub fn create_composite_key<S: AsRef<str>>(object_type: &str, attributes: &[S]) -> Result<String> {
    let all_non_empty =
        !object_type.is_empty() && attributes.iter().all(|a| !a.as_ref().is_empty());
    if !all_non_empty {
        return Err(ShimError::InvalidArgument(
            "object type or attribute not a non-zero length string".to_string(),
        ));
    }

    let mut key = String::new();
    key.push(COMPOSITE_KEY_DELIMITER);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_DELIMITER);
    for attribute in attributes {
        key.push_str(attribute.as_ref());
        key.push(COMPOSITE_KEY_DELIMITER);
    }
    Ok(key)
}

/// Decode a composite key back into its object type and attributes.
///
/// Exact inverse of [`create_composite_key`]; fails with
/// [`ShimError::InvalidArgument`] on keys that could not have been produced
/// by it.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>)> {
    let inner = key
        .strip_prefix(COMPOSITE_KEY_DELIMITER)
        .and_then(|k| k.strip_suffix(COMPOSITE_KEY_DELIMITER))
        .ok_or_else(|| ShimError::InvalidArgument("not a composite key".to_string()))?;

    let mut parts = inner.split(COMPOSITE_KEY_DELIMITER);
    // split always yields at least one element
    let object_type = parts.next().unwrap_or_default();
    let attributes: Vec<String> = parts.map(str::to_string).collect();

    if object_type.is_empty() || attributes.iter().any(String::is_empty) {
        return Err(ShimError::InvalidArgument(
            "composite key contains an empty component".to_string(),
        ));
    }
    Ok((object_type.to_string(), attributes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_layout() {
        let key = create_composite_key("asset", &["a1", "a2"]).unwrap();
        assert_eq!(key, "\u{0}asset\u{0}a1\u{0}a2\u{0}");
    }

    #[test]
    fn test_no_attributes() {
        let key = create_composite_key("asset", &[] as &[&str]).unwrap();
        assert_eq!(key, "\u{0}asset\u{0}");
    }

    #[test]
    fn test_attribute_order_preserved() {
        let forward = create_composite_key("t", &["b", "a", "b"]).unwrap();
        assert_eq!(forward, "\u{0}t\u{0}b\u{0}a\u{0}b\u{0}");
    }

    #[test]
    fn test_empty_object_type_rejected() {
        let err = create_composite_key("", &["a"]).unwrap_err();
        assert!(matches!(err, ShimError::InvalidArgument(_)));
        assert!(err
            .to_string()
            .contains("object type or attribute not a non-zero length string"));
    }

    #[test]
    fn test_empty_attribute_rejected() {
        let err = create_composite_key("asset", &["a", ""]).unwrap_err();
        assert!(matches!(err, ShimError::InvalidArgument(_)));
    }

    #[test]
    fn test_round_trip() {
        let key = create_composite_key("owner~asset", &["alice", "asset1", "x"]).unwrap();
        let (object_type, attrs) = split_composite_key(&key).unwrap();
        assert_eq!(object_type, "owner~asset");
        assert_eq!(attrs, vec!["alice", "asset1", "x"]);
    }

    #[test]
    fn test_round_trip_no_attributes() {
        let key = create_composite_key("solo", &[] as &[&str]).unwrap();
        let (object_type, attrs) = split_composite_key(&key).unwrap();
        assert_eq!(object_type, "solo");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_split_rejects_undelimited_key() {
        assert!(split_composite_key("plainkey").is_err());
        assert!(split_composite_key("\u{0}unterminated").is_err());
        assert!(split_composite_key("\u{0}").is_err());
    }

    #[test]
    fn test_split_rejects_empty_component() {
        assert!(split_composite_key("\u{0}\u{0}").is_err());
        assert!(split_composite_key("\u{0}t\u{0}\u{0}a\u{0}").is_err());
    }
}
