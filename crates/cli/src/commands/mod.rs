//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;

use campus_eats_core::{CartStore, PlacedOrders};
use campus_eats_storefront::api::ApiClient;
use campus_eats_storefront::config::StorefrontConfig;
use campus_eats_storefront::services::Session;
use campus_eats_storefront::store::FileStore;

/// Shared command error type.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Configuration, backend client and snapshot directory for one invocation.
pub struct Context {
    pub config: StorefrontConfig,
    pub api: ApiClient,
    store: FileStore,
}

impl Context {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is invalid or the backend URL cannot
    /// be used.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = StorefrontConfig::from_env()?;
        let api = ApiClient::new(&config.api)?;
        let store = FileStore::new(&config.data_dir);
        tracing::debug!(data_dir = %store.dir().display(), "Using data directory");

        Ok(Self { config, api, store })
    }

    /// The persisted cart.
    #[must_use]
    pub fn cart(&self) -> CartStore<FileStore> {
        CartStore::load(self.store.clone())
    }

    /// Orders placed from this machine.
    #[must_use]
    pub fn placed(&self) -> PlacedOrders<FileStore> {
        PlacedOrders::load(self.store.clone())
    }

    /// The persisted session.
    #[must_use]
    pub fn session(&self) -> Session<FileStore> {
        Session::load(self.store.clone())
    }
}
