use crate::recording::{AvatarPose, Recording};
use crate::training::TrainSettings;
use super::marker::KeyframeMarker;

// Per-page state lives here; handlers mutate it through the manager.

/// Active page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Mark,
    Train,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Mark => "Mark key frames",
            Stage::Train => "Train templates",
        }
    }
}

/// Data handed from page to page.
///
/// The recording is owned here and lent to whichever page is active. The file
/// name is the last one typed on any page and pre-fills the next page's field.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub recording: Recording,
    pub pose: AvatarPose,
    pub file_name: String,
}

impl SessionState {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_recording(recording: Recording) -> Self {
        Self {
            recording,
            ..Self::default()
        }
    }

    pub fn get_status_summary(&self) -> String {
        if self.recording.is_empty() {
            "No skeleton data".to_string()
        } else {
            format!(
                "{} frames, {} key frames",
                self.recording.frame_count(),
                self.recording.tagged_frame_count()
            )
        }
    }
}

/// Keyframe marker page
#[derive(Debug, Clone, Default)]
pub struct MarkerState {
    pub marker: KeyframeMarker,
    pub file_input: String,
    pub status: String,
}

/// Template trainer page
#[derive(Debug, Clone, Default)]
pub struct TrainerState {
    pub gesture_input: String,
    pub overwrite: bool,
    pub status: String,
    /// Grows across config loads until the program exits
    pub events: Vec<String>,
    pub settings: TrainSettings,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub stage: Stage,
    pub session: SessionState,
    pub marker: MarkerState,
    pub trainer: TrainerState,
}

impl AppState {
    pub fn new(default_file_name: &str, wheel_speed: f32) -> Self {
        Self {
            stage: Stage::Mark,
            session: SessionState::new(default_file_name),
            marker: MarkerState {
                marker: KeyframeMarker::new(wheel_speed),
                ..MarkerState::default()
            },
            trainer: TrainerState::default(),
        }
    }

    /// Status line of the active page
    pub fn status(&self) -> &str {
        match self.stage {
            Stage::Mark => &self.marker.status,
            Stage::Train => &self.trainer.status,
        }
    }
}
