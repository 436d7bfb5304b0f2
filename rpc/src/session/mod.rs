//! Explicit session context threaded through every call
//!
//! Holds everything the browser kept in globals: the token override, the external
//! auth provider, the persistent store and the selected farm.

mod store;
mod user_info;

use std::sync::Arc;

use error_stack::{Report, ResultExt};
use tracing::{debug, warn};

pub use store::{FileTokenStore, MemoryTokenStore, StoreKey, TokenStore};
pub use user_info::UserInfo;

use crate::error::{Error, Result};
use crate::functions::FarmId;

/// External authentication service holding the live session token
pub trait AuthProvider: Send + Sync {
    /// Token of the current sign-in, if any
    fn current_token(&self) -> Option<String>;
}

/// Per-caller context passed to every `RpcClient` call
#[derive(Clone, Default)]
pub struct Session {
    token_override: Option<String>,
    auth:           Option<Arc<dyn AuthProvider>>,
    store:          Option<Arc<dyn TokenStore>>,
    selected_farm:  Option<FarmId>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field(
                "token_override",
                &self.token_override.as_ref().map(|_| "<redacted>"),
            )
            .field("auth", &self.auth.as_ref().map(|_| "<dyn AuthProvider>"))
            .field("store", &self.store.as_ref().map(|_| "<dyn TokenStore>"))
            .field("selected_farm", &self.selected_farm)
            .finish()
    }
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}

impl Session {
    /// Session with no token sources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `token` for every call, ahead of any other source
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token_override = Some(token.into());
        self
    }

    /// Consult `auth` when no override is set
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Fall back to, and persist into, `store`
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Scope this session to `farm` without persisting the choice
    #[must_use]
    pub fn with_selected_farm(mut self, farm: FarmId) -> Self {
        self.selected_farm = Some(farm);
        self
    }

    fn require_store(&self) -> Result<&Arc<dyn TokenStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| Report::new(Error::missing("token store")))
    }

    /// Resolve the bearer token: override, then auth provider, then persisted token
    ///
    /// # Errors
    /// Fails with `Unauthenticated` when no source yields a non-empty token. A store
    /// read failure is attached to that error rather than surfaced on its own.
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = non_empty(self.token_override.clone()) {
            debug!("Using token override");
            return Ok(token);
        }

        if let Some(token) = non_empty(self.auth.as_ref().and_then(|auth| auth.current_token())) {
            debug!("Using token from auth provider");
            return Ok(token);
        }

        let Some(store) = &self.store else {
            return Err(Report::new(Error::Unauthenticated).attach("No token store configured"));
        };

        match store.get(StoreKey::Token) {
            Ok(token) => non_empty(token).ok_or_else(|| {
                Report::new(Error::Unauthenticated).attach("No token persisted; log in first")
            }),
            Err(report) => {
                warn!("Token store read failed: {:?}", report);
                Err(Report::new(Error::Unauthenticated)
                    .attach(format!("Token store read failed: {report}")))
            },
        }
    }

    /// Persist a fresh sign-in
    ///
    /// # Errors
    /// Fails with `InvalidArgument` when the token is empty or no store is configured,
    /// and with `TokenStore` when writing fails.
    pub fn login(&self, token: &str, user_info: Option<&UserInfo>) -> Result<()> {
        if token.trim().is_empty() {
            return Err(Report::new(Error::missing("token")));
        }
        let store = self.require_store()?;
        store.set(StoreKey::Token, token)?;

        match user_info {
            Some(user) => {
                let json = serde_json::to_string(user)
                    .map_err(|e| Error::invalid("user info", e))?;
                store.set(StoreKey::UserInfo, &json)?;
            },
            None => store.remove(StoreKey::UserInfo)?,
        }
        debug!("Session token persisted");
        Ok(())
    }

    /// Forget the persisted token and user info; the selected farm is kept
    ///
    /// # Errors
    /// Fails when no store is configured or it cannot be written.
    pub fn logout(&self) -> Result<()> {
        let store = self.require_store()?;
        store.remove(StoreKey::Token)?;
        store.remove(StoreKey::UserInfo)?;
        debug!("Session token cleared");
        Ok(())
    }

    /// Decode the persisted user info
    ///
    /// # Errors
    /// Fails with `TokenStore` when the stored JSON no longer decodes.
    pub fn user_info(&self) -> Result<Option<UserInfo>> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let Some(json) = store.get(StoreKey::UserInfo)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| Error::TokenStore(format!("Stored user info is invalid: {e}")))
            .attach(format!("Raw value: {}", json.chars().take(200).collect::<String>()))
    }

    /// Select `farm` for this session and persist it when a store is configured
    ///
    /// # Errors
    /// Fails with `TokenStore` when persisting fails.
    pub fn select_farm(&mut self, farm: FarmId) -> Result<()> {
        if let Some(store) = &self.store {
            store.set(StoreKey::SelectedFarm, farm.as_str())?;
        }
        self.selected_farm = Some(farm);
        Ok(())
    }

    /// Farm to scope filters to: in-memory selection first, then the store
    ///
    /// # Errors
    /// Fails with `TokenStore` when the store cannot be read.
    pub fn selected_farm(&self) -> Result<Option<FarmId>> {
        if let Some(farm) = &self.selected_farm {
            return Ok(Some(farm.clone()));
        }
        let Some(store) = &self.store else {
            return Ok(None);
        };
        Ok(non_empty(store.get(StoreKey::SelectedFarm)?).map(FarmId::from))
    }
}
