pub mod format;
pub mod pose;
pub mod store;

pub use format::{read_recording, write_recording, ParsedRecording, FILE_HEADER};
pub use pose::AvatarPose;
pub use store::Recording;
