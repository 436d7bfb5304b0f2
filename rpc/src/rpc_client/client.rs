//! RPC client for the farmhand data proxy
//!
//! Every backend function is reached through one endpoint: a POST of
//! `{"function": <name>, "params": {...}}` with a bearer token. `RpcClient` offers:
//! - `call()`: the raw contract, returning the parsed body unchanged
//! - `call_unwrapped()` / `call_list()`: `call()` followed by envelope unwrapping
//! - `invoke()`: typed calls through a `RemoteFunction` contract
//!
//! There are no retries, timeouts, caching or deduplication. Calling a creating
//! function twice creates two rows.

use error_stack::{Report, ResultExt};
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use super::http_client::get_client;
use super::request::CallEnvelope;
use super::response::interpret;
use crate::config::ClientConfig;
use crate::constants::REQUEST_LOG_LEN;
use crate::envelope::UnwrapStrategy;
use crate::error::{Error, Result};
use crate::functions::{RemoteFunction, ResponseShape};
use crate::session::Session;

/// Client for the RPC proxy; cheap to clone and safe to share across tasks
#[derive(Debug, Clone)]
pub struct RpcClient {
    proxy_url: Url,
    strategy:  UnwrapStrategy,
    http:      reqwest::Client,
}

impl RpcClient {
    /// Create a client from validated configuration
    ///
    /// # Errors
    /// Fails with `Configuration` when the proxy URL is invalid.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            proxy_url: config.proxy_url()?,
            strategy:  UnwrapStrategy::new(config.unwrap_keys.clone()),
            http:      get_client().clone(),
        })
    }

    /// Proxy endpoint this client posts to
    #[must_use]
    pub const fn proxy_url(&self) -> &Url {
        &self.proxy_url
    }

    /// Envelope unwrapping applied by `call_unwrapped`, `call_list` and `invoke`
    #[must_use]
    pub const fn strategy(&self) -> &UnwrapStrategy {
        &self.strategy
    }

    /// Call `function` with `params` and return the parsed response body unchanged
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty function name or non-object params
    /// - `Unauthenticated` when the session yields no token; no request is made
    /// - `Transport` when no HTTP response is received
    /// - `RemoteCallFailed` for non-2xx statuses
    /// - `InvalidResponse` for 2xx bodies that are not JSON
    pub async fn call(&self, session: &Session, function: &str, params: Value) -> Result<Value> {
        let envelope = CallEnvelope::new(function)?.params(params)?;
        let token = session
            .resolve_token()
            .attach(format!("Function: {function}"))?;

        let body = envelope.build().to_string();
        debug!(
            "RPC call {function}: request body - {}",
            body.chars().take(REQUEST_LOG_LEN).collect::<String>()
        );

        let response = self
            .http
            .post(self.proxy_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(function, &e))?;

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) if status.is_success() => return Err(self.transport_error(function, &e)),
            Err(e) => {
                // The status alone still describes the failure
                warn!("RPC call {function}: could not read error body - error={}", e);
                String::new()
            },
        };

        debug!("RPC call {function}: status={}, {} bytes", status.as_u16(), text.len());
        interpret(function, status, &text)
    }

    /// `call()` followed by envelope unwrapping
    ///
    /// # Errors
    /// Same as `call()`.
    pub async fn call_unwrapped(
        &self,
        session: &Session,
        function: &str,
        params: Value,
    ) -> Result<Value> {
        let value = self.call(session, function, params).await?;
        Ok(self.strategy.unwrap(function, value))
    }

    /// `call()` followed by unwrapping into a collection
    ///
    /// # Errors
    /// Same as `call()`.
    pub async fn call_list(
        &self,
        session: &Session,
        function: &str,
        params: Value,
    ) -> Result<Vec<Value>> {
        let value = self.call(session, function, params).await?;
        Ok(self.strategy.unwrap_list(function, value))
    }

    /// Typed call through a `RemoteFunction` contract
    ///
    /// # Errors
    /// Same as `call()`, plus `InvalidResponse` when the unwrapped payload does not
    /// decode into `F::Output`.
    pub async fn invoke<F: RemoteFunction>(&self, session: &Session, request: &F) -> Result<F::Output> {
        let params = serde_json::to_value(request)
            .map_err(|e| Error::invalid("parameters", e))
            .attach(format!("Function: {}", F::NAME))?;

        let value = self.call(session, F::NAME, params).await?;
        let payload = match F::SHAPE {
            ResponseShape::List => Value::Array(self.strategy.unwrap_list(F::NAME, value)),
            ResponseShape::Value => self.strategy.unwrap(F::NAME, value),
        };

        serde_json::from_value(payload).map_err(|e| {
            warn!("RPC call {}: unexpected payload - error={}", F::NAME, e);
            Report::new(Error::InvalidResponse(format!(
                "Unexpected payload for {}: {e}",
                F::NAME
            )))
        })
    }

    fn transport_error(&self, function: &str, e: &reqwest::Error) -> Report<Error> {
        warn!("RPC call {function}: HTTP request failed - error={}", e);

        let error_type = if e.is_timeout() {
            "Timeout"
        } else if e.is_connect() {
            "Connection failed"
        } else if e.is_request() {
            "Request error"
        } else if e.is_body() {
            "Body error"
        } else if e.is_decode() {
            "Decode error"
        } else {
            "Unknown error type"
        };

        Report::new(Error::Transport(format!(
            "HTTP request failed for {function} - {error_type}: {e}"
        )))
        .attach(format!("URL: {}", self.proxy_url))
        .attach(format!("Full error: {e:?}"))
    }
}
