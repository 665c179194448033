use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Free-text identifier of the device that submitted an entry.
/// Supplied by the client; the only rule the core enforces is non-emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// A device id must carry at least one non-whitespace character.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_device_id() {
        let id = DeviceId::new("desktop-pc".to_string());
        assert!(id.is_valid());
    }

    #[test]
    fn test_blank_device_id_is_invalid() {
        let id = DeviceId::new("   ".to_string());
        assert!(!id.is_valid());
        let id = DeviceId::new(String::new());
        assert!(!id.is_valid());
    }

    #[test]
    fn test_device_id_from_str() {
        let id: DeviceId = "phone-1".into();
        assert_eq!(id.as_str(), "phone-1");
    }

    #[test]
    fn test_device_id_serializes_as_plain_string() {
        let id = DeviceId::from("laptop");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"laptop\"");
    }
}
