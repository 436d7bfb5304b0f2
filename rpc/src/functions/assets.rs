use serde::{Deserialize, Serialize};

use super::{Ack, ExtraFields, FarmId, RemoteFunction, ResponseShape};

/// Equipment or infrastructure row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Asset {
    /// Asset identifier
    pub id:         String,
    /// Display name
    pub name:       String,
    /// Free-form category, e.g. `tractor` or `pump`
    #[serde(default)]
    pub asset_type: Option<String>,
    /// Remaining columns
    #[serde(flatten)]
    pub fields:     ExtraFields,
}

/// `get_assets`
#[derive(Debug, Clone, Serialize)]
pub struct GetAssets {
    /// Farm filter
    #[serde(rename = "p_farm_id")]
    pub farm_id: Option<FarmId>,
}

impl RemoteFunction for GetAssets {
    const NAME: &'static str = "get_assets";
    const SHAPE: ResponseShape = ResponseShape::List;
    type Output = Vec<Asset>;
}

/// `create_asset`
#[derive(Debug, Clone, Serialize)]
pub struct CreateAsset {
    /// Owning farm
    #[serde(rename = "p_farm_id")]
    pub farm_id:    FarmId,
    /// Display name
    #[serde(rename = "p_name")]
    pub name:       String,
    /// Category
    #[serde(rename = "p_asset_type")]
    pub asset_type: Option<String>,
}

impl RemoteFunction for CreateAsset {
    const NAME: &'static str = "create_asset";
    const SHAPE: ResponseShape = ResponseShape::Value;
    type Output = Asset;
}

/// `delete_asset`: hard delete
#[derive(Debug, Clone, Serialize)]
pub struct DeleteAsset {
    /// Asset to delete
    #[serde(rename = "p_asset_id")]
    pub asset_id: String,
}

impl RemoteFunction for DeleteAsset {
    const NAME: &'static str = "delete_asset";
    const SHAPE: ResponseShape = ResponseShape::Value;
    type Output = Ack;
}
