pub mod app_core;
pub mod app_events;
pub mod handlers;
pub mod marker;
pub mod state;

pub use app_core::TrainManager;
pub use marker::KeyframeMarker;
pub use state::{AppState, SessionState, Stage};
