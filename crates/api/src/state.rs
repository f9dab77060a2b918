use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::image_store::ImageStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Both the pool and the image store are constructed once by the process
/// entry point and injected here -- no module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: promptly_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Uploaded-image directory accessor.
    pub images: Arc<ImageStore>,
}
