//! Encoding of compound values into a single URL-safe token, for use in a
//! path segment or query parameter.
//!
//! Callers list the types taking part in the value. The list must be the
//! same, in the same order, when the token is decoded.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RestError;
use crate::type_token::TypeDescriptor;

pub trait CompositeTypeCodec: Send + Sync {
    /// Encode `value` into text that can be placed in a URL as-is.
    fn encode<V>(&self, value: &V, participating: &[TypeDescriptor]) -> Result<String, RestError>
    where
        V: Serialize + 'static;

    /// Decode text produced by `encode` with the same participating types.
    fn decode<V>(&self, text: &str, participating: &[TypeDescriptor]) -> Result<V, RestError>
    where
        V: DeserializeOwned + 'static;
}

/// Percent-encoded JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCompositeCodec;

impl JsonCompositeCodec {
    fn check_participating<V: 'static>(participating: &[TypeDescriptor]) -> Result<(), RestError> {
        if participating.is_empty() {
            return Err(RestError::usage("participating types must not be empty"));
        }
        let own = TypeDescriptor::of::<V>();
        if !participating.contains(&own) {
            return Err(RestError::usage(format!(
                "type `{own}` is not among the participating types"
            )));
        }
        Ok(())
    }
}

impl CompositeTypeCodec for JsonCompositeCodec {
    fn encode<V>(&self, value: &V, participating: &[TypeDescriptor]) -> Result<String, RestError>
    where
        V: Serialize + 'static,
    {
        Self::check_participating::<V>(participating)?;
        let json = serde_json::to_string(value).map_err(|e| RestError::Serialization(e.to_string()))?;
        Ok(urlencoding::encode(&json).into_owned())
    }

    fn decode<V>(&self, text: &str, participating: &[TypeDescriptor]) -> Result<V, RestError>
    where
        V: DeserializeOwned + 'static,
    {
        Self::check_participating::<V>(participating)?;
        let target = std::any::type_name::<V>();
        let json = urlencoding::decode(text).map_err(|e| RestError::deserialization(target, e))?;
        serde_json::from_str(&json).map_err(|e| RestError::deserialization(target, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Range {
        from: Bound,
        to: Bound,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Bound {
        value: i64,
        inclusive: bool,
    }

    fn participating() -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::of::<Range>(), TypeDescriptor::of::<Bound>()]
    }

    fn range() -> Range {
        Range {
            from: Bound { value: -5, inclusive: true },
            to: Bound { value: 10, inclusive: false },
        }
    }

    #[test]
    fn encoded_text_is_url_safe() {
        let text = JsonCompositeCodec.encode(&range(), &participating()).unwrap();
        assert!(text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%')));
    }

    #[test]
    fn decode_restores_value() {
        let codec = JsonCompositeCodec;
        let text = codec.encode(&range(), &participating()).unwrap();
        let decoded: Range = codec.decode(&text, &participating()).unwrap();
        assert_eq!(decoded, range());
    }

    #[test]
    fn participating_types_are_required() {
        let err = JsonCompositeCodec.encode(&range(), &[]).unwrap_err();
        assert!(matches!(err, RestError::Usage(_)));

        let err = JsonCompositeCodec
            .encode(&range(), &[TypeDescriptor::of::<Bound>()])
            .unwrap_err();
        assert!(err.to_string().contains("Range"));
    }

    #[test]
    fn garbage_is_a_deserialization_failure() {
        let err = JsonCompositeCodec
            .decode::<Range>("%7Bnot-json", &participating())
            .unwrap_err();
        assert!(matches!(err, RestError::Deserialization { .. }));
    }
}
