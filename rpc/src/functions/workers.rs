use serde::{Deserialize, Serialize};

use super::{Ack, ExtraFields, FarmId, RemoteFunction, ResponseShape, default_active};
use crate::error::Result;
use crate::session::Session;

/// Worker row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Worker {
    /// Worker identifier
    pub id:        String,
    /// Full name
    pub name:      String,
    /// Cleared by `deactivate_worker`
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Remaining columns
    #[serde(flatten)]
    pub fields:    ExtraFields,
}

/// `get_workers`: workers, optionally scoped to one farm
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetWorkers {
    /// Farm filter; `null` lists every farm the caller can see
    #[serde(rename = "p_farm_id")]
    pub farm_id:          Option<FarmId>,
    /// Include deactivated workers
    #[serde(rename = "p_include_inactive")]
    pub include_inactive: bool,
}

impl GetWorkers {
    /// Active workers of the session's selected farm
    ///
    /// # Errors
    /// Fails when the session store cannot be read.
    pub fn for_session(session: &Session) -> Result<Self> {
        Ok(Self {
            farm_id:          session.selected_farm()?,
            include_inactive: false,
        })
    }
}

impl RemoteFunction for GetWorkers {
    const NAME: &'static str = "get_workers";
    const SHAPE: ResponseShape = ResponseShape::List;
    type Output = Vec<Worker>;
}

/// `create_worker_simple`: add a worker with the minimal field set
///
/// Not idempotent; issuing it twice creates two rows.
#[derive(Debug, Clone, Serialize)]
pub struct CreateWorkerSimple {
    /// Owning farm
    #[serde(rename = "p_farm_id")]
    pub farm_id: FarmId,
    /// Full name
    #[serde(rename = "p_name")]
    pub name:    String,
    /// Job title
    #[serde(rename = "p_role")]
    pub role:    Option<String>,
    /// Contact phone
    #[serde(rename = "p_phone")]
    pub phone:   Option<String>,
}

impl RemoteFunction for CreateWorkerSimple {
    const NAME: &'static str = "create_worker_simple";
    const SHAPE: ResponseShape = ResponseShape::Value;
    type Output = Worker;
}

/// `update_worker`: replace the editable fields of a worker
#[derive(Debug, Clone, Serialize)]
pub struct UpdateWorker {
    /// Worker to update
    #[serde(rename = "p_worker_id")]
    pub worker_id: String,
    /// Full name
    #[serde(rename = "p_name")]
    pub name:      String,
    /// Job title
    #[serde(rename = "p_role")]
    pub role:      Option<String>,
    /// Contact phone
    #[serde(rename = "p_phone")]
    pub phone:     Option<String>,
}

impl RemoteFunction for UpdateWorker {
    const NAME: &'static str = "update_worker";
    const SHAPE: ResponseShape = ResponseShape::Value;
    type Output = Worker;
}

/// `deactivate_worker`: soft delete; workers have no hard delete
#[derive(Debug, Clone, Serialize)]
pub struct DeactivateWorker {
    /// Worker to deactivate
    #[serde(rename = "p_worker_id")]
    pub worker_id: String,
}

impl RemoteFunction for DeactivateWorker {
    const NAME: &'static str = "deactivate_worker";
    const SHAPE: ResponseShape = ResponseShape::Value;
    type Output = Ack;
}
