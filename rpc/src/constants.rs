//! Shared constants for the RPC client, session store and configuration

/// Default proxy endpoint accepting `{function, params}` POST bodies
pub const DEFAULT_PROXY_URL: &str = "https://api.farmhand-admin.org/proxy";

/// Idle timeout for connection pool in seconds
pub const POOL_IDLE_TIMEOUT: u64 = 300;

/// Maximum idle connections per host
pub const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Maximum number of characters of an undecodable body kept for diagnostics
pub const RESPONSE_SNIPPET_LEN: usize = 200;

/// Maximum number of characters of a request body written to debug logs
pub const REQUEST_LOG_LEN: usize = 500;

/// Request body field carrying the remote function name
pub const FIELD_FUNCTION: &str = "function";

/// Request body field carrying the parameter object
pub const FIELD_PARAMS: &str = "params";

/// Error body fields checked, in order, for a failure message
pub const ERROR_MESSAGE_FIELDS: &[&str] = &["message", "error"];

/// Envelope keys checked before the function-name key
pub const ENVELOPE_KEYS: &[&str] = &["data", "result"];

/// Environment variable overriding the proxy URL
pub const ENV_PROXY_URL: &str = "FARMHAND_PROXY_URL";

/// Environment variable overriding the token store directory
pub const ENV_STORE_DIR: &str = "FARMHAND_STORE_DIR";

/// Directory name used under the platform data directory
pub const APP_DIR_NAME: &str = "farmhand";

/// File holding the persisted session keys
pub const STORE_FILE_NAME: &str = "session.json";

/// Default number of calls issued concurrently by `run_batched`
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default pause between batches in milliseconds
pub const DEFAULT_BATCH_DELAY_MS: u64 = 500;
