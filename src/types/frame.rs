use std::sync::Arc;

use super::JointData;

/// One timestamped skeleton snapshot plus its key-posture tag (0 = untagged).
///
/// Joint entries are shared so that a pose view can point at them without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub joints: Arc<[JointData]>,
    pub timestamp: f64,
    pub tag: u32,
}

impl Frame {
    pub fn new(joints: Vec<JointData>, timestamp: f64) -> Self {
        Self {
            joints: joints.into(),
            timestamp,
            tag: 0,
        }
    }

    pub fn with_tag(mut self, tag: u32) -> Self {
        self.tag = tag;
        self
    }

    pub fn is_tagged(&self) -> bool {
        self.tag != 0
    }
}
