//! Shared application state.

use std::sync::Arc;

use crate::usecase::RoomCoordinator;

/// Shared application state
pub struct AppState {
    /// The single coordinator instance owned by this process
    pub coordinator: Arc<RoomCoordinator>,
}
