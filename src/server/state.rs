use std::sync::Arc;

use crate::feed::FeedClient;
use crate::settings::Settings;

// Application state shared by all handlers, immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub client: FeedClient,
}

impl AppState {
    pub fn new(settings: Settings, client: FeedClient) -> Self {
        Self {
            settings: Arc::new(settings),
            client,
        }
    }
}
