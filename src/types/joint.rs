use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Skeleton joint identifiers, numbered like the OpenNI joint enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Joint {
    Head = 1,
    Neck = 2,
    Torso = 3,
    Waist = 4,
    LeftCollar = 5,
    LeftShoulder = 6,
    LeftElbow = 7,
    LeftWrist = 8,
    LeftHand = 9,
    LeftFingertip = 10,
    RightCollar = 11,
    RightShoulder = 12,
    RightElbow = 13,
    RightWrist = 14,
    RightHand = 15,
    RightFingertip = 16,
    LeftHip = 17,
    LeftKnee = 18,
    LeftAnkle = 19,
    LeftFoot = 20,
    RightHip = 21,
    RightKnee = 22,
    RightAnkle = 23,
    RightFoot = 24,
}

/// Size of a table indexed by `Joint as usize` (slot 0 unused).
pub const JOINT_SLOTS: usize = 25;

impl Joint {
    pub const ALL: [Joint; 24] = [
        Joint::Head,
        Joint::Neck,
        Joint::Torso,
        Joint::Waist,
        Joint::LeftCollar,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftWrist,
        Joint::LeftHand,
        Joint::LeftFingertip,
        Joint::RightCollar,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::RightHand,
        Joint::RightFingertip,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
        Joint::LeftFoot,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightAnkle,
        Joint::RightFoot,
    ];

    /// Joints used for training when a gesture block leaves the joint line empty.
    pub const DEFAULT_TRAINING_SET: [Joint; 9] = [
        Joint::Head,
        Joint::Neck,
        Joint::Torso,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftHand,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightHand,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Joint::Head => "Head",
            Joint::Neck => "Neck",
            Joint::Torso => "Torso",
            Joint::Waist => "Waist",
            Joint::LeftCollar => "LeftCollar",
            Joint::LeftShoulder => "LeftShoulder",
            Joint::LeftElbow => "LeftElbow",
            Joint::LeftWrist => "LeftWrist",
            Joint::LeftHand => "LeftHand",
            Joint::LeftFingertip => "LeftFingertip",
            Joint::RightCollar => "RightCollar",
            Joint::RightShoulder => "RightShoulder",
            Joint::RightElbow => "RightElbow",
            Joint::RightWrist => "RightWrist",
            Joint::RightHand => "RightHand",
            Joint::RightFingertip => "RightFingertip",
            Joint::LeftHip => "LeftHip",
            Joint::LeftKnee => "LeftKnee",
            Joint::LeftAnkle => "LeftAnkle",
            Joint::LeftFoot => "LeftFoot",
            Joint::RightHip => "RightHip",
            Joint::RightKnee => "RightKnee",
            Joint::RightAnkle => "RightAnkle",
            Joint::RightFoot => "RightFoot",
        }
    }

    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn from_value(value: u32) -> Option<Joint> {
        Joint::ALL.iter().copied().find(|j| *j as u32 == value)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown joint name: {0}")]
pub struct UnknownJointName(pub String);

impl FromStr for Joint {
    type Err = UnknownJointName;

    /// Accepts the exact joint name or its numeric value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(joint) = Joint::ALL.iter().copied().find(|j| j.name() == s) {
            return Ok(joint);
        }
        s.parse::<u32>()
            .ok()
            .and_then(Joint::from_value)
            .ok_or_else(|| UnknownJointName(s.to_string()))
    }
}

/// Position of one joint in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointData {
    pub pos: [f32; 3],
}

impl JointData {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { pos: [x, y, z] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("LeftHand".parse::<Joint>(), Ok(Joint::LeftHand));
        assert_eq!("3".parse::<Joint>(), Ok(Joint::Torso));
        assert!("lefthand".parse::<Joint>().is_err());
        assert!("0".parse::<Joint>().is_err());
        assert!("25".parse::<Joint>().is_err());
    }

    #[test]
    fn names_round_trip() {
        for joint in Joint::ALL {
            assert_eq!(joint.name().parse::<Joint>(), Ok(joint));
            assert!(joint.slot() < JOINT_SLOTS);
        }
    }
}
