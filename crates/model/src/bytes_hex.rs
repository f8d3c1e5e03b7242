//! Serialization of `Vec<u8>` to and from 0x prefixed hex strings.

use serde::{de, Deserialize, Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};
use std::borrow::Cow;

pub struct BytesHex;

impl<'de> DeserializeAs<'de, Vec<u8>> for BytesHex {
    fn deserialize_as<D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer)
    }
}

impl SerializeAs<Vec<u8>> for BytesHex {
    fn serialize_as<S>(source: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize(source, serializer)
    }
}

pub fn serialize<S>(bytes: impl AsRef<[u8]>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes.as_ref())))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Cow::<str>::deserialize(deserializer)?;
    let stripped = s.strip_prefix("0x").ok_or_else(|| {
        de::Error::custom(format!(
            "{s:?} can't be decoded as hex bytes because it does not start with '0x'"
        ))
    })?;
    hex::decode(stripped)
        .map_err(|err| de::Error::custom(format!("failed to decode {s:?} as hex bytes: {err}")))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Eq, PartialEq)]
    struct S {
        #[serde(with = "super")]
        bytes: Vec<u8>,
    }

    #[test]
    fn deserialize_and_back() {
        let s: S = serde_json::from_value(json!({ "bytes": "0x0102ff" })).unwrap();
        assert_eq!(s.bytes, [1, 2, 0xff]);

        let s: S = serde_json::from_value(json!({ "bytes": "0x" })).unwrap();
        assert!(s.bytes.is_empty());
    }

    #[test]
    fn requires_prefix() {
        assert!(serde_json::from_value::<S>(json!({ "bytes": "0102" })).is_err());
    }
}
