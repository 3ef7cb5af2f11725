use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TrainConfigError, TrainError};
use crate::recording::Recording;
use crate::types::Joint;
use super::config_loader::TrainingConfigEntry;

/// Joint feature space used by a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmMode {
    /// Raw joint positions
    #[default]
    Absolute,
    /// Joint positions relative to the torso
    Relative,
    /// Let the trainer choose
    Auto,
}

impl FromStr for AlgorithmMode {
    type Err = TrainConfigError;

    /// Case-insensitive; an empty token means `Absolute`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "absolute" => Ok(AlgorithmMode::Absolute),
            "relative" => Ok(AlgorithmMode::Relative),
            "auto" => Ok(AlgorithmMode::Auto),
            _ => Err(TrainConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for AlgorithmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmMode::Absolute => "absolute",
            AlgorithmMode::Relative => "relative",
            AlgorithmMode::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Joint subset and feature mode handed to the trainer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainSettings {
    /// Empty means [`Joint::DEFAULT_TRAINING_SET`]
    pub joint_index: Vec<Joint>,
    pub mode: AlgorithmMode,
}

impl TrainSettings {
    pub fn apply(&mut self, entry: &TrainingConfigEntry) {
        self.joint_index = entry.joint_index.clone();
        self.mode = entry.algorithm_mode;
    }

    pub fn joints(&self) -> &[Joint] {
        if self.joint_index.is_empty() {
            &Joint::DEFAULT_TRAINING_SET
        } else {
            &self.joint_index
        }
    }
}

/// Trained artifact that recognises a gesture
pub trait GestureDetector {
    fn name(&self) -> &str;

    fn save_to_file(&self, writer: &mut dyn Write) -> Result<(), TrainError>;
}

/// Builds a detector from the tagged frames of a recording
pub trait TemplateTrainer {
    fn train(
        &self,
        label: &str,
        recording: &Recording,
        settings: &TrainSettings,
    ) -> Result<Box<dyn GestureDetector>, TrainError>;
}
