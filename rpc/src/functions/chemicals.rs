use serde::{Deserialize, Serialize};

use super::{Ack, ExtraFields, FarmId, RemoteFunction, ResponseShape, json_encoded};

/// Chemical product row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chemical {
    /// Chemical identifier
    pub id:                  String,
    /// Product name
    pub name:                String,
    /// Regulatory registration number
    #[serde(default)]
    pub registration_number: Option<String>,
    /// Remaining columns
    #[serde(flatten)]
    pub fields:              ExtraFields,
}

/// `get_chemicals`: chemical inventory of one farm
#[derive(Debug, Clone, Serialize)]
pub struct GetChemicals {
    /// Farm filter
    #[serde(rename = "p_farm_id")]
    pub farm_id: Option<FarmId>,
}

impl RemoteFunction for GetChemicals {
    const NAME: &'static str = "get_chemicals";
    const SHAPE: ResponseShape = ResponseShape::List;
    type Output = Vec<Chemical>;
}

/// `create_chemical`: register a chemical product
#[derive(Debug, Clone, Serialize)]
pub struct CreateChemical {
    /// Owning farm
    #[serde(rename = "p_farm_id")]
    pub farm_id:             FarmId,
    /// Product name
    #[serde(rename = "p_name")]
    pub name:                String,
    /// Regulatory registration number
    #[serde(rename = "p_registration_number")]
    pub registration_number: Option<String>,
    /// Active ingredient names; the backend takes these as a JSON-encoded array
    #[serde(rename = "p_active_ingredients", serialize_with = "json_encoded")]
    pub active_ingredients:  Vec<String>,
}

impl RemoteFunction for CreateChemical {
    const NAME: &'static str = "create_chemical";
    const SHAPE: ResponseShape = ResponseShape::Value;
    type Output = Chemical;
}

/// `delete_chemical`: hard delete
#[derive(Debug, Clone, Serialize)]
pub struct DeleteChemical {
    /// Chemical to delete
    #[serde(rename = "p_chemical_id")]
    pub chemical_id: String,
}

impl RemoteFunction for DeleteChemical {
    const NAME: &'static str = "delete_chemical";
    const SHAPE: ResponseShape = ResponseShape::Value;
    type Output = Ack;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_active_ingredients_are_json_encoded() {
        let params = CreateChemical {
            farm_id:             FarmId::from("f1"),
            name:                "Roundup".to_string(),
            registration_number: None,
            active_ingredients:  vec!["glyphosate".to_string()],
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["p_active_ingredients"], json!(r#"["glyphosate"]"#));
        assert_eq!(value["p_registration_number"], json!(null));
        assert!(
            value
                .as_object()
                .unwrap()
                .keys()
                .all(|key| key.starts_with("p_"))
        );
    }
}
