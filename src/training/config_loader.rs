//! Reads one gesture block from the training config and merges its keyframe files.
//!
//! A block looks like:
//! ```text
//! @Wave
//! RightHand, RightElbow, Torso
//! relative
//! wave take 1
//! wave take 2.kf
//!
//! ```

use std::io::BufRead;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::TrainConfigError;
use crate::recording::Recording;
use crate::types::{Joint, LoadEvent};
use crate::utils::with_suffix;
use super::trainer::AlgorithmMode;

/// Settings and file list parsed from one `@<gesture>` block
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfigEntry {
    pub gesture_name: String,
    pub joint_index: Vec<Joint>,
    pub algorithm_mode: AlgorithmMode,
    pub keyframe_file_names: Vec<String>,
}

/// What a config load did to the recording
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfigReport {
    pub entry: TrainingConfigEntry,
    pub events: Vec<LoadEvent>,
    /// Tagged frames across every file that loaded
    pub total_tagged: usize,
}

impl TrainConfigReport {
    pub fn failed_files(&self) -> usize {
        self.events.iter().filter(|e| !e.is_success()).count()
    }
}

/// Joint identifiers separated by commas and/or spaces. Empty means the default set.
pub fn parse_joint_line(line: &str) -> Result<Vec<Joint>, TrainConfigError> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Joint>()
                .map_err(|_| TrainConfigError::UnknownJoint(token.to_string()))
        })
        .collect()
}

/// Loads the block for `gesture` into `recording`.
///
/// The header, joint line and algorithm line are validated before the
/// recording is reset, so a bad block leaves it as it was. Keyframe files are
/// then appended one by one; a file that fails is logged and skipped.
/// `resolve` maps a keyframe file name (suffix already added) to its path.
pub fn load_train_config<R, F>(
    reader: R,
    gesture: &str,
    keyframe_suffix: &str,
    recording: &mut Recording,
    resolve: F,
) -> Result<TrainConfigReport, TrainConfigError>
where
    R: BufRead,
    F: Fn(&str) -> PathBuf,
{
    let header = format!("@{}", gesture);
    let mut lines = reader.lines();

    loop {
        let Some(line) = lines.next() else {
            return Err(TrainConfigError::GestureNotFound(gesture.to_string()));
        };
        if line? == header {
            break;
        }
    }

    let joint_line = lines.next().transpose()?.unwrap_or_default();
    let joint_index = parse_joint_line(&joint_line)?;
    let mode_line = lines.next().transpose()?.unwrap_or_default();
    let algorithm_mode = mode_line.parse::<AlgorithmMode>()?;

    recording.reset();

    let mut entry = TrainingConfigEntry {
        gesture_name: gesture.to_string(),
        joint_index,
        algorithm_mode,
        keyframe_file_names: Vec::new(),
    };
    let mut events = Vec::new();

    for line in lines {
        let line = line?;
        let name = line.trim();
        if name.is_empty() {
            break;
        }
        let file = with_suffix(name, keyframe_suffix);
        let before = recording.tagged_frame_count();

        match recording.load_file_append(resolve(&file)) {
            Ok(_) => {
                let key_frames = recording.tagged_frame_count() - before;
                info!("{} key frames loaded from {}", key_frames, file);
                events.push(LoadEvent::Loaded { file: file.clone(), key_frames });
            }
            Err(e) => {
                warn!("{}: error occurred when loading file: {}", file, e);
                events.push(LoadEvent::Failed { file: file.clone(), reason: e.to_string() });
            }
        }
        entry.keyframe_file_names.push(file);
    }

    Ok(TrainConfigReport {
        entry,
        events,
        total_tagged: recording.tagged_frame_count(),
    })
}
