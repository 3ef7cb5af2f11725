//! Built-in key-posture trainer.
//!
//! Each tag becomes one posture template: the mean feature vector of every
//! frame carrying that tag, plus the mean distance of those frames to it.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::TrainError;
use crate::recording::Recording;
use crate::types::{Joint, JointData};
use super::trainer::{AlgorithmMode, GestureDetector, TemplateTrainer, TrainSettings};

/// Joint that relative features are measured from
pub const REFERENCE_JOINT: Joint = Joint::Torso;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureTemplate {
    pub tag: u32,
    pub samples: usize,
    pub mean: Vec<[f32; 3]>,
    pub spread: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPostureDetector {
    pub name: String,
    /// Never `Auto`: the trainer resolves it
    pub mode: AlgorithmMode,
    pub joints: Vec<Joint>,
    pub postures: Vec<PostureTemplate>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPostureTrainer;

impl KeyPostureTrainer {
    pub fn new() -> Self {
        Self
    }

    /// `Auto` picks relative features when the reference joint was recorded.
    pub fn resolve_mode(mode: AlgorithmMode, recording: &Recording) -> AlgorithmMode {
        match mode {
            AlgorithmMode::Auto if recording.joint_column(REFERENCE_JOINT).is_some() => AlgorithmMode::Relative,
            AlgorithmMode::Auto => AlgorithmMode::Absolute,
            other => other,
        }
    }

    pub fn train_detector(
        &self,
        label: &str,
        recording: &Recording,
        settings: &TrainSettings,
    ) -> Result<KeyPostureDetector, TrainError> {
        if recording.tagged_frame_count() == 0 {
            return Err(TrainError::NoTaggedFrames);
        }

        let joints = settings.joints().to_vec();
        let mode = Self::resolve_mode(settings.mode, recording);
        let extractor = FeatureExtractor::new(&joints, recording.joint_index(), mode)?;

        let mut sums: BTreeMap<u32, Vec<Vec<[f32; 3]>>> = BTreeMap::new();
        for frame in recording.frames().iter().filter(|f| f.is_tagged()) {
            sums.entry(frame.tag).or_default().push(extractor.features(&frame.joints));
        }

        let postures = sums
            .into_iter()
            .map(|(tag, samples)| posture_from_samples(tag, &samples))
            .collect::<Vec<_>>();
        info!(
            "Trained {} with {} postures ({} features, {} joints)",
            label,
            postures.len(),
            mode,
            joints.len()
        );

        Ok(KeyPostureDetector {
            name: label.to_string(),
            mode,
            joints,
            postures,
        })
    }
}

impl TemplateTrainer for KeyPostureTrainer {
    fn train(
        &self,
        label: &str,
        recording: &Recording,
        settings: &TrainSettings,
    ) -> Result<Box<dyn GestureDetector>, TrainError> {
        Ok(Box::new(self.train_detector(label, recording, settings)?))
    }
}

impl KeyPostureDetector {
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Self, TrainError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Nearest posture to a live frame laid out by `joint_index`, with its distance.
    ///
    /// `None` when the frame lacks a joint the template needs.
    pub fn classify(&self, joint_index: &[Joint], frame: &[JointData]) -> Option<(u32, f32)> {
        let extractor = FeatureExtractor::new(&self.joints, joint_index, self.mode).ok()?;
        if frame.len() < joint_index.len() {
            return None;
        }
        let features = extractor.features(frame);
        self.postures
            .iter()
            .map(|p| (p.tag, distance(&features, &p.mean)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl GestureDetector for KeyPostureDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn save_to_file(&self, writer: &mut dyn Write) -> Result<(), TrainError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Maps a frame's joint array to the feature vector of the selected joints
struct FeatureExtractor {
    columns: Vec<usize>,
    reference: Option<usize>,
}

impl FeatureExtractor {
    fn new(joints: &[Joint], joint_index: &[Joint], mode: AlgorithmMode) -> Result<Self, TrainError> {
        let column = |joint: Joint| joint_index.iter().position(|j| *j == joint);
        let columns = joints
            .iter()
            .map(|j| column(*j).ok_or(TrainError::MissingJoint(*j)))
            .collect::<Result<Vec<_>, _>>()?;
        let reference = match mode {
            AlgorithmMode::Relative => Some(
                column(REFERENCE_JOINT).ok_or(TrainError::MissingReferenceJoint(REFERENCE_JOINT))?,
            ),
            _ => None,
        };
        Ok(Self { columns, reference })
    }

    fn features(&self, frame: &[JointData]) -> Vec<[f32; 3]> {
        let origin = self.reference.map_or([0.0; 3], |c| frame[c].pos);
        self.columns
            .iter()
            .map(|&c| {
                let p = frame[c].pos;
                [p[0] - origin[0], p[1] - origin[1], p[2] - origin[2]]
            })
            .collect()
    }
}

fn distance(a: &[[f32; 3]], b: &[[f32; 3]]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(p, q)| (0..3).map(|k| (p[k] - q[k]).powi(2)).sum::<f32>())
        .sum::<f32>()
        .sqrt()
}

fn posture_from_samples(tag: u32, samples: &[Vec<[f32; 3]>]) -> PostureTemplate {
    let width = samples.first().map_or(0, Vec::len);
    let n = samples.len() as f32;
    let mut mean = vec![[0.0f32; 3]; width];
    for sample in samples {
        for (m, p) in mean.iter_mut().zip(sample) {
            for k in 0..3 {
                m[k] += p[k] / n;
            }
        }
    }
    let spread = samples.iter().map(|s| distance(s, &mean)).sum::<f32>() / n;
    PostureTemplate {
        tag,
        samples: samples.len(),
        mean,
        spread,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Frame;

    fn recording(joints: Vec<Joint>, frames: &[(u32, [f32; 3])]) -> Recording {
        let width = joints.len();
        let mut rec = Recording::new(joints);
        for (i, (tag, base)) in frames.iter().enumerate() {
            let data = (0..width)
                .map(|c| JointData::new(base[0] + c as f32, base[1], base[2]))
                .collect();
            rec.push_frame(Frame::new(data, i as f64).with_tag(*tag)).unwrap();
        }
        rec
    }

    fn settings(joints: &[Joint], mode: AlgorithmMode) -> TrainSettings {
        TrainSettings {
            joint_index: joints.to_vec(),
            mode,
        }
    }

    #[test]
    fn refuses_untagged_recording() {
        let rec = recording(vec![Joint::Head], &[(0, [0.0; 3])]);
        let result = KeyPostureTrainer::new().train("Wave", &rec, &settings(&[Joint::Head], AlgorithmMode::Absolute));
        assert!(matches!(result, Err(TrainError::NoTaggedFrames)));
    }

    #[test]
    fn averages_each_tag() {
        let rec = recording(
            vec![Joint::Head, Joint::RightHand],
            &[(1, [0.0, 0.0, 0.0]), (0, [9.0, 9.0, 9.0]), (1, [2.0, 0.0, 0.0]), (2, [0.0, 4.0, 0.0])],
        );
        let det = KeyPostureTrainer::new()
            .train_detector("Wave", &rec, &settings(&[Joint::RightHand], AlgorithmMode::Absolute))
            .unwrap();

        assert_eq!(det.postures.len(), 2);
        assert_eq!(det.postures[0].tag, 1);
        assert_eq!(det.postures[0].samples, 2);
        assert_eq!(det.postures[0].mean, vec![[2.0, 0.0, 0.0]]);
        assert_eq!(det.postures[0].spread, 1.0);
        assert_eq!(det.postures[1].mean, vec![[1.0, 4.0, 0.0]]);
    }

    #[test]
    fn auto_mode_follows_reference_joint() {
        let with_torso = recording(vec![Joint::Torso, Joint::LeftHand], &[(1, [0.0; 3])]);
        let without = recording(vec![Joint::LeftHand], &[(1, [0.0; 3])]);
        assert_eq!(KeyPostureTrainer::resolve_mode(AlgorithmMode::Auto, &with_torso), AlgorithmMode::Relative);
        assert_eq!(KeyPostureTrainer::resolve_mode(AlgorithmMode::Auto, &without), AlgorithmMode::Absolute);

        let det = KeyPostureTrainer::new()
            .train_detector("Reach", &with_torso, &settings(&[Joint::LeftHand], AlgorithmMode::Auto))
            .unwrap();
        assert_eq!(det.mode, AlgorithmMode::Relative);
        assert_eq!(det.postures[0].mean, vec![[1.0, 0.0, 0.0]]);
    }

    #[test]
    fn missing_joints_are_reported() {
        let rec = recording(vec![Joint::LeftHand], &[(1, [0.0; 3])]);
        let trainer = KeyPostureTrainer::new();
        assert!(matches!(
            trainer.train_detector("x", &rec, &settings(&[Joint::Head], AlgorithmMode::Absolute)),
            Err(TrainError::MissingJoint(Joint::Head))
        ));
        assert!(matches!(
            trainer.train_detector("x", &rec, &settings(&[Joint::LeftHand], AlgorithmMode::Relative)),
            Err(TrainError::MissingReferenceJoint(Joint::Torso))
        ));
    }

    #[test]
    fn classify_picks_nearest_posture() {
        let rec = recording(
            vec![Joint::Torso, Joint::RightHand],
            &[(1, [0.0, 0.0, 0.0]), (2, [0.0, 5.0, 0.0])],
        );
        let det = KeyPostureTrainer::new()
            .train_detector("Wave", &rec, &settings(&[Joint::RightHand], AlgorithmMode::Absolute))
            .unwrap();

        let live_index = [Joint::RightHand];
        let (tag, _) = det.classify(&live_index, &[JointData::new(1.0, 4.5, 0.0)]).unwrap();
        assert_eq!(tag, 2);
        assert!(det.classify(&[Joint::Head], &[JointData::default()]).is_none());
    }

    #[test]
    fn saved_template_reads_back() {
        let rec = recording(vec![Joint::Torso, Joint::Head], &[(1, [0.5, 1.0, 2.0]), (3, [0.0; 3])]);
        let det = KeyPostureTrainer::new()
            .train_detector("Nod", &rec, &settings(&[Joint::Head], AlgorithmMode::Relative))
            .unwrap();

        let mut out = Vec::new();
        det.save_to_file(&mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.contains("\"mode\": \"relative\""));
        assert_eq!(KeyPostureDetector::load_from_reader(out.as_slice()).unwrap(), det);
    }
}
