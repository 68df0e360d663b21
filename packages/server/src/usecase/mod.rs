//! UseCase layer.

pub mod error;
pub mod room_coordinator;

pub use error::CoordinatorError;
pub use room_coordinator::RoomCoordinator;
