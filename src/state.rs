use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::store::Store;
use crate::workers::Dispatcher;
use crate::workers::stages::MetadataProbe;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn Store>,
    pub probe: Arc<dyn MetadataProbe>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        probe: Arc<dyn MetadataProbe>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            config,
            store,
            probe,
            dispatcher,
        }
    }
}
