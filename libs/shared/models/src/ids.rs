use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier for records owned by the upstream services.
///
/// The services disagree on identifier shape: the patient directory issues
/// string ids, the doctor and appointment services issue integers, and some
/// payloads carry the patient id under `id_patient` instead of `id`. Every
/// inbound shape is normalized to the canonical string form here, at the
/// port boundary, so joins compare on a single type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id means "nothing selected" in a form submission.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => EntityId(n.to_string()),
            Raw::Text(s) => EntityId(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_from_string() {
        let id: EntityId = serde_json::from_str("\"P001\"").unwrap();
        assert_eq!(id, EntityId::from("P001"));
    }

    #[test]
    fn test_deserializes_from_number() {
        let id: EntityId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = EntityId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_string_and_number_forms_join() {
        let a: EntityId = serde_json::from_str("3").unwrap();
        let b: EntityId = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(EntityId::default().is_empty());
        assert!(!EntityId::from("P001").is_empty());
    }
}
