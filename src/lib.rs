pub mod api;
pub mod backend;
pub mod config;
pub mod payments;
pub mod scoring;
pub mod store;
pub mod sync;
pub mod utils;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::backend::Backend;
use crate::config::Config;
use crate::payments::PaymentsClient;
use crate::store::Store;

pub struct AppState {
    pub config: Config,
    pub store: RwLock<Store>,
    pub backend: Arc<dyn Backend>,
    pub payments: Option<PaymentsClient>,
}

impl AppState {
    pub fn new(config: Config, store: Store, backend: Arc<dyn Backend>) -> Self {
        let payments = PaymentsClient::from_config(&config.payments);
        Self {
            config,
            store: RwLock::new(store),
            backend,
            payments,
        }
    }

    /// Swap the backend in while building the state; never after
    /// construction. Startup picks its backend before `new`, so in
    /// practice only tests reach for this.
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = backend;
        self
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::AppState;
    use crate::backend::LocalBackend;
    use crate::config::Config;
    use crate::store::Store;

    /// State over the local backend with default config, for tests.
    pub fn test_state(store: Store) -> AppState {
        let mut config = Config::default();
        config.server.data_dir =
            std::env::temp_dir().join(format!("shiftstay-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&config.server.data_dir).unwrap();
        AppState::new(config, store, Arc::new(LocalBackend::new()))
    }
}
