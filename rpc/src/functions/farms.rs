use serde::{Deserialize, Serialize};

use super::{ExtraFields, RemoteFunction, ResponseShape};

/// Farm identifier, used by callers to scope filter parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FarmId(String);

impl FarmId {
    /// Identifier as sent on the wire
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FarmId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FarmId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FarmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Farm row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Farm {
    /// Farm identifier
    pub id:     FarmId,
    /// Display name
    #[serde(default)]
    pub name:   Option<String>,
    /// Remaining columns
    #[serde(flatten)]
    pub fields: ExtraFields,
}

/// `get_farms`: every farm visible to the caller
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetFarms {}

impl RemoteFunction for GetFarms {
    const NAME: &'static str = "get_farms";
    const SHAPE: ResponseShape = ResponseShape::List;
    type Output = Vec<Farm>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_farms_sends_empty_object() {
        assert_eq!(serde_json::to_value(GetFarms::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_farm_keeps_extra_columns() {
        let farm: Farm =
            serde_json::from_value(json!({"id": "f1", "name": "North", "acres": 120})).unwrap();
        assert_eq!(farm.id, FarmId::from("f1"));
        assert_eq!(farm.fields.get("acres"), Some(&json!(120)));
    }
}
