use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signed-in user, persisted next to the token at login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Backend user identifier
    pub id:    String,
    /// Login email
    pub email: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name:  Option<String>,
    /// Role as reported by the backend, e.g. `admin` or `manager`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role:  Option<String>,
    /// Any other fields the backend returned, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserInfo {
    /// Name to show for this user, falling back to the email
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": "u1",
            "email": "ana@example.com",
            "role": "manager",
            "farm_ids": ["f1", "f2"]
        });
        let user: UserInfo = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.role.as_deref(), Some("manager"));
        assert_eq!(user.display_name(), "ana@example.com");
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }
}
