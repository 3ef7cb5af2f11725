//! Error types shared across the crate.

use thiserror::Error;

use crate::types::Joint;

/// Errors raised while reading or writing a recording
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Appended file does not use the joint order of the frames already loaded
    #[error("Joint layout mismatch: recording uses [{expected}], file uses [{found}]")]
    JointLayoutMismatch { expected: String, found: String },

    #[error("Frame has {found} joints but the recording tracks {expected}")]
    FrameWidth { expected: usize, found: usize },
}

/// Errors raised by keyframe marker actions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("Key posture number is a positive integer, got \"{0}\"")]
    InvalidTagCount(String),

    #[error("Key posture number is a positive integer")]
    TagCountNotSet,

    #[error("Skeleton file not opened")]
    EmptyRecording,

    #[error("Tag digit must be between 1 and 9, got {0}")]
    InvalidDigit(u32),
}

/// Errors raised while parsing a gesture block of the training config
#[derive(Error, Debug)]
pub enum TrainConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Gesture {0} not found in the train config file")]
    GestureNotFound(String),

    #[error("The joint name {0} is unknown")]
    UnknownJoint(String),

    #[error("The algorithm {0} is unknown")]
    UnknownAlgorithm(String),
}

/// Errors raised by template training and template persistence
#[derive(Error, Debug)]
pub enum TrainError {
    #[error("No tagged frames to train on")]
    NoTaggedFrames,

    #[error("Joint {0} is not present in the training recording")]
    MissingJoint(Joint),

    #[error("Relative features need the reference joint {0}")]
    MissingReferenceJoint(Joint),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
