//! Keyframe marking and training-data preparation for skeletal gesture templates.
//!
//! Recordings of skeleton joint positions are tagged frame by frame with
//! key-posture numbers, saved as keyframe files, merged per gesture through a
//! training config, and handed to a template trainer.

pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod recording;
pub mod training;
pub mod types;
pub mod utils;

pub use app::{KeyframeMarker, SessionState, Stage, TrainManager};
pub use config::{AppConfig, ConfigError, ConfigManager};
pub use error::{MarkerError, RecordingError, TrainConfigError, TrainError};
pub use recording::{AvatarPose, Recording};
pub use types::{Command, Frame, Joint, JointData, MarkerInput};
