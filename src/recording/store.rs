use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::RecordingError;
use crate::types::{Frame, Joint};
use super::format::{read_recording, write_recording, ParsedRecording};

/// Ordered frames of one session or one merged training set.
///
/// Every frame carries exactly `joint_index.len()` joints, in `joint_index` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    joint_index: Vec<Joint>,
    frames: Vec<Frame>,
}

impl Recording {
    pub fn new(joint_index: Vec<Joint>) -> Self {
        Self {
            joint_index,
            frames: Vec::new(),
        }
    }

    /// Drops all frames. The joint index is kept until the next load replaces it.
    pub fn reset(&mut self) {
        self.frames.clear();
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn joint_index(&self) -> &[Joint] {
        &self.joint_index
    }

    /// Column of `joint` inside each frame's joint array
    pub fn joint_column(&self, joint: Joint) -> Option<usize> {
        self.joint_index.iter().position(|j| *j == joint)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn tag(&self, index: usize) -> u32 {
        self.frames.get(index).map_or(0, |f| f.tag)
    }

    /// Sets the tag of an existing frame; out-of-range indices are ignored.
    pub fn set_tag(&mut self, index: usize, tag: u32) {
        if let Some(frame) = self.frames.get_mut(index) {
            frame.tag = tag;
        }
    }

    pub fn tagged_frame_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_tagged()).count()
    }

    pub fn push_frame(&mut self, frame: Frame) -> Result<(), RecordingError> {
        if frame.joints.len() != self.joint_index.len() {
            return Err(RecordingError::FrameWidth {
                expected: self.joint_index.len(),
                found: frame.joints.len(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Replaces the whole recording with the reader's contents.
    ///
    /// Nothing changes when the read fails.
    pub fn load_new<R: Read>(&mut self, reader: R) -> Result<usize, RecordingError> {
        let parsed = read_recording(BufReader::new(reader))?;
        let count = parsed.frames.len();
        self.joint_index = parsed.joint_index;
        self.frames = parsed.frames;
        Ok(count)
    }

    /// Adds the reader's frames after the existing ones, keeping their tags and timestamps.
    ///
    /// A non-empty recording only accepts files with the same joint order.
    /// Nothing changes when the read fails.
    pub fn load_append<R: Read>(&mut self, reader: R) -> Result<usize, RecordingError> {
        let ParsedRecording { joint_index, frames } = read_recording(BufReader::new(reader))?;

        if self.frames.is_empty() {
            self.joint_index = joint_index;
        } else if joint_index != self.joint_index {
            return Err(RecordingError::JointLayoutMismatch {
                expected: join_names(&self.joint_index),
                found: join_names(&joint_index),
            });
        }

        let count = frames.len();
        self.frames.extend(frames);
        Ok(count)
    }

    pub fn save<W: Write>(&self, writer: W) -> Result<usize, RecordingError> {
        write_recording(writer, &self.joint_index, &self.frames)
    }

    pub fn load_file_new<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, RecordingError> {
        let path = path.as_ref();
        let count = self.load_new(File::open(path)?)?;
        info!("Loaded {} frames from {}", count, path.display());
        Ok(count)
    }

    pub fn load_file_append<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, RecordingError> {
        let path = path.as_ref();
        let count = self.load_append(File::open(path)?)?;
        debug!("Appended {} frames from {}", count, path.display());
        Ok(count)
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<usize, RecordingError> {
        let path = path.as_ref();
        let count = self.save(BufWriter::new(File::create(path)?))?;
        info!("Saved {} frames to {}", count, path.display());
        Ok(count)
    }
}

fn join_names(joints: &[Joint]) -> String {
    joints.iter().map(|j| j.name()).collect::<Vec<_>>().join(",")
}
