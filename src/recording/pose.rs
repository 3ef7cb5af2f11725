use std::sync::Arc;

use crate::types::{Joint, JointData, JOINT_SLOTS};
use super::Recording;

/// Handle to one joint entry inside a recorded frame
#[derive(Debug, Clone)]
struct JointSlot {
    frame: Arc<[JointData]>,
    column: usize,
}

/// Per-joint view consumed by the avatar renderer.
///
/// Slots point into recorded frames instead of holding copies. Only the
/// active page writes through [`AvatarPose::project`]; the renderer reads.
#[derive(Debug, Clone)]
pub struct AvatarPose {
    slots: Vec<Option<JointSlot>>,
}

impl Default for AvatarPose {
    fn default() -> Self {
        Self {
            slots: vec![None; JOINT_SLOTS],
        }
    }
}

impl AvatarPose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repoints the slots of the recording's joints at frame `frame_idx`.
    ///
    /// Joints outside the recording's joint index keep whatever they pointed at.
    /// Out-of-range frames leave the pose untouched.
    pub fn project(&mut self, recording: &Recording, frame_idx: usize) {
        let Some(frame) = recording.frame(frame_idx) else {
            return;
        };
        for (column, joint) in recording.joint_index().iter().enumerate() {
            self.slots[joint.slot()] = Some(JointSlot {
                frame: Arc::clone(&frame.joints),
                column,
            });
        }
    }

    pub fn joint(&self, joint: Joint) -> Option<&JointData> {
        self.slots[joint.slot()]
            .as_ref()
            .and_then(|slot| slot.frame.get(slot.column))
    }

    /// True when `joint` points at the very entry stored in `frame`
    pub fn shares_frame(&self, joint: Joint, frame: &Arc<[JointData]>) -> bool {
        self.slots[joint.slot()]
            .as_ref()
            .is_some_and(|slot| Arc::ptr_eq(&slot.frame, frame))
    }

    /// Back to the initial pose: no joint driven by recorded data.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Frame;

    fn recording(joints: Vec<Joint>, frames: usize) -> Recording {
        let width = joints.len();
        let mut rec = Recording::new(joints);
        for i in 0..frames {
            let data = (0..width).map(|c| JointData::new(i as f32, c as f32, 0.0)).collect();
            rec.push_frame(Frame::new(data, i as f64)).unwrap();
        }
        rec
    }

    #[test]
    fn project_shares_frame_entries() {
        let rec = recording(vec![Joint::Head, Joint::LeftHand], 3);
        let mut pose = AvatarPose::new();
        pose.project(&rec, 2);

        assert_eq!(pose.joint(Joint::LeftHand), Some(&JointData::new(2.0, 1.0, 0.0)));
        assert!(pose.shares_frame(Joint::Head, &rec.frame(2).unwrap().joints));
        assert!(!pose.shares_frame(Joint::Head, &rec.frame(1).unwrap().joints));
        assert_eq!(pose.joint(Joint::Torso), None);
    }

    #[test]
    fn unmapped_joints_are_left_alone() {
        let full = recording(vec![Joint::Head, Joint::Torso], 1);
        let partial = recording(vec![Joint::Head], 2);
        let mut pose = AvatarPose::new();
        pose.project(&full, 0);
        pose.project(&partial, 1);

        assert!(pose.shares_frame(Joint::Head, &partial.frame(1).unwrap().joints));
        assert!(pose.shares_frame(Joint::Torso, &full.frame(0).unwrap().joints));
    }

    #[test]
    fn out_of_range_and_reset() {
        let rec = recording(vec![Joint::Head], 1);
        let mut pose = AvatarPose::new();
        pose.project(&rec, 5);
        assert!(pose.joint(Joint::Head).is_none());

        pose.project(&rec, 0);
        assert!(pose.joint(Joint::Head).is_some());
        pose.reset();
        assert!(pose.joint(Joint::Head).is_none());
    }
}
