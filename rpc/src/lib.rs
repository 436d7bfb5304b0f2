//! # farmhand RPC client
//!
//! Authenticated client for the farmhand data proxy: a single HTTP endpoint that
//! dispatches named backend functions (`get_farms`, `create_worker_simple`, ...).
//!
//! ```no_run
//! # async fn demo() -> farmhand_rpc::Result<()> {
//! use farmhand_rpc::{ClientConfig, RpcClient, Session};
//!
//! let client = RpcClient::new(&ClientConfig::default())?;
//! let session = Session::new().with_token("abc");
//! let farms = client.call(&session, "get_farms", serde_json::json!({})).await?;
//! # let _ = farms;
//! # Ok(())
//! # }
//! ```

mod batch;
mod config;
mod constants;
mod envelope;
mod error;
pub mod functions;
mod rpc_client;
pub mod session;

pub use batch::{BatchOptions, run_batched};
pub use config::ClientConfig;
pub use envelope::UnwrapStrategy;
pub use error::{Error, Result};
pub use rpc_client::{CallEnvelope, RpcClient};
pub use session::{FileTokenStore, Session, UserInfo};
