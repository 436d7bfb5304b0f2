//! Typed contracts for backend functions
//!
//! Each request type names its remote function, the shape its response comes back
//! in and the type it decodes to. Field names map to the backend's `p_`-prefixed
//! transport keys through serde renames; optional fields serialize as `null` because
//! the backend expects the full key set on every call.
//!
//! Deletion is not uniform across entities: workers are only ever deactivated, while
//! chemicals and assets are hard-deleted. Each function is its own contract.

mod assets;
mod chemicals;
mod farms;
mod workers;

pub use assets::{Asset, CreateAsset, DeleteAsset, GetAssets};
pub use chemicals::{Chemical, CreateChemical, DeleteChemical, GetChemicals};
pub use farms::{Farm, FarmId, GetFarms};
pub use workers::{CreateWorkerSimple, DeactivateWorker, GetWorkers, UpdateWorker, Worker};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// How a function's payload comes back once unwrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A collection; missing or `null` payloads decode as empty
    List,
    /// A single record or scalar
    Value,
}

/// Static contract for one backend function
pub trait RemoteFunction: Serialize + Sync {
    /// Function name sent in the request body
    const NAME: &'static str;
    /// Payload shape after envelope unwrapping
    const SHAPE: ResponseShape;
    /// Decoded payload
    type Output: DeserializeOwned;
}

/// Acknowledgement returned by mutations whose body carries nothing callers need
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Ack(pub Value);

impl From<Value> for Ack {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Row fields this crate does not model, kept verbatim
pub type ExtraFields = Map<String, Value>;

/// Serialize a composite field as a JSON-encoded string, as the backend expects
pub(crate) fn json_encoded<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let encoded = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

pub(crate) const fn default_active() -> bool {
    true
}
