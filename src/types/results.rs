/// Outcome of appending one keyframe file while loading a training config
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Loaded { file: String, key_frames: usize },
    Failed { file: String, reason: String },
}

impl LoadEvent {
    pub fn is_success(&self) -> bool {
        matches!(self, LoadEvent::Loaded { .. })
    }

    /// Line shown in the trainer's event log.
    pub fn message(&self) -> String {
        match self {
            LoadEvent::Loaded { file, key_frames } => {
                format!("{} key frames loaded from {}", key_frames, file)
            }
            LoadEvent::Failed { file, .. } => {
                format!("{}: error occurred when loading file", file)
            }
        }
    }
}

/// Result of saving a recording
#[derive(Debug, Clone, PartialEq)]
pub struct SaveResult {
    pub file_name: String,
    pub frames_saved: usize,
    pub key_frames_saved: usize,
}

impl SaveResult {
    pub fn new(file_name: String, frames_saved: usize, key_frames_saved: usize) -> Self {
        Self {
            file_name,
            frames_saved,
            key_frames_saved,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "{} frames (including {} key frames) has been saved to {}",
            self.frames_saved, self.key_frames_saved, self.file_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_lines() {
        let ok = LoadEvent::Loaded { file: "wave1.kf".into(), key_frames: 4 };
        let err = LoadEvent::Failed { file: "wave2.kf".into(), reason: "missing".into() };
        assert_eq!(ok.message(), "4 key frames loaded from wave1.kf");
        assert_eq!(err.message(), "wave2.kf: error occurred when loading file");
        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn save_line() {
        let r = SaveResult::new("a.kf".into(), 120, 3);
        assert_eq!(r.message(), "120 frames (including 3 key frames) has been saved to a.kf");
    }
}
