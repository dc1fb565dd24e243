use std::sync::Arc;

use crate::auth::SigningKeys;
use crate::database::CatalogueStore;

/// Shared application state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogueStore>,
    pub keys: Arc<SigningKeys>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogueStore>, keys: SigningKeys) -> Self {
        Self {
            store,
            keys: Arc::new(keys),
        }
    }
}
