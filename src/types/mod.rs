pub mod joint;
pub mod frame;
pub mod results;
pub mod commands;

pub use joint::{Joint, JointData, UnknownJointName, JOINT_SLOTS};
pub use frame::Frame;
pub use results::{LoadEvent, SaveResult};
pub use commands::{Command, MarkerInput, HELP_TEXT};
