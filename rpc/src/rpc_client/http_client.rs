//! Shared HTTP client with connection pooling
//!
//! One pooled client serves every `RpcClient`, so concurrent fan-out reuses
//! connections to the proxy instead of opening one per call.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;

use crate::constants::{POOL_IDLE_TIMEOUT, POOL_MAX_IDLE_PER_HOST};

/// Shared HTTP client instance
///
/// No request timeout is set: a call waits as long as the proxy takes to answer.
static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Get the shared HTTP client instance
pub(super) fn get_client() -> &'static Client {
    &HTTP_CLIENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_singleton() {
        let client1 = get_client();
        let client2 = get_client();

        assert!(std::ptr::eq(client1, client2));
    }
}
