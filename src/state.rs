use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::persistence::store::Store;

/// Shared application state threaded through every axum handler.
///
/// `engine` is the single logical executor: every mutating request takes
/// this lock for its full duration, which is also why queries never
/// observe a partially-completed match cascade.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<Engine>>,
    pub store: Arc<Store>,
    pub config: Arc<EngineConfig>,
}
