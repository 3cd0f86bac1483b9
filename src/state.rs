//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::services::overlay::OverlayClient;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub nats: Option<async_nats::Client>,
    pub config: Arc<Config>,
    pub overlay: OverlayClient,
}
