//! Keyframe tagging state machine.
//!
//! The marker is a cursor over the session recording plus a round-robin
//! counter that hands out tags `1..=K`, where `K` is the declared number of
//! key postures. Every cursor move repoints the avatar pose at the new frame.

use std::fmt::Write as _;

use log::debug;

use crate::error::MarkerError;
use crate::recording::Recording;
use super::state::SessionState;

pub const KEYFRAME_LIST_HEADER: &str = "Key frame list";

/// Parses the key posture count typed by the operator. Only positive integers pass.
pub fn parse_tag_count(text: &str) -> Result<u32, MarkerError> {
    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MarkerError::InvalidTagCount(text.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeMarker {
    cursor: usize,
    declared_tag_count: u32,
    /// 0-based; the next round-robin tag is `next_tag + 1`
    next_tag: u32,
    wheel_speed: f32,
}

impl Default for KeyframeMarker {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl KeyframeMarker {
    pub fn new(wheel_speed: f32) -> Self {
        Self {
            cursor: 0,
            declared_tag_count: 0,
            next_tag: 0,
            wheel_speed,
        }
    }

    /// Rewinds to the first frame with tagging disabled until a count is declared.
    pub fn init(&mut self, session: &mut SessionState) {
        self.declared_tag_count = 0;
        self.next_tag = 0;
        self.go_to(session, 0);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn declared_tag_count(&self) -> u32 {
        self.declared_tag_count
    }

    pub fn next_tag(&self) -> u32 {
        self.next_tag
    }

    /// Moves the cursor and repoints the avatar pose.
    pub fn go_to(&mut self, session: &mut SessionState, frame: usize) {
        self.cursor = frame.min(session.recording.frame_count().saturating_sub(1));
        session.pose.project(&session.recording, self.cursor);
    }

    /// Stores a new declared count. Invalid text leaves the current count in place.
    pub fn set_declared_tag_count(&mut self, text: &str) -> Result<u32, MarkerError> {
        let count = parse_tag_count(text)?;
        self.declared_tag_count = count;
        if self.next_tag >= count {
            self.next_tag %= count;
        }
        Ok(count)
    }

    /// Moves by `trunc(axis * wheel_speed)` frames, clamped to the recording.
    pub fn scroll(&mut self, session: &mut SessionState, axis: f32) {
        let count = session.recording.frame_count();
        if count == 0 {
            return;
        }
        let delta = (axis * self.wheel_speed) as i64;
        if delta == 0 {
            return;
        }
        let target = (self.cursor as i64)
            .saturating_add(delta)
            .clamp(0, count as i64 - 1);
        self.go_to(session, target as usize);
    }

    /// Steps forward to the next tagged frame, or to the last frame if none follows.
    pub fn step_next(&mut self, session: &mut SessionState) {
        let rec = &session.recording;
        if rec.is_empty() {
            return;
        }
        let last = rec.frame_count() - 1;
        let mut i = self.cursor;
        if i < last {
            i += 1;
        }
        while rec.tag(i) == 0 && i < last {
            i += 1;
        }
        self.go_to(session, i);
    }

    /// Steps back to the previous tagged frame, or to frame 0 if none precedes.
    pub fn step_prev(&mut self, session: &mut SessionState) {
        let rec = &session.recording;
        if rec.is_empty() {
            return;
        }
        let mut i = self.cursor;
        if i > 0 {
            i -= 1;
        }
        while rec.tag(i) == 0 && i > 0 {
            i -= 1;
        }
        self.go_to(session, i);
    }

    /// Tags the cursor frame with the next round-robin tag and returns it.
    pub fn assign_next_tag(&mut self, session: &mut SessionState) -> Result<u32, MarkerError> {
        if self.declared_tag_count < 1 {
            return Err(MarkerError::TagCountNotSet);
        }
        if session.recording.is_empty() {
            return Err(MarkerError::EmptyRecording);
        }
        let tag = self.next_tag + 1;
        session.recording.set_tag(self.cursor, tag);
        self.next_tag = tag % self.declared_tag_count;
        debug!("Frame {} tagged {}", self.cursor, tag);
        Ok(tag)
    }

    /// Tags the cursor frame with `digit`, raising the declared count to it if needed.
    pub fn assign_explicit_tag(&mut self, session: &mut SessionState, digit: u32) -> Result<u32, MarkerError> {
        if !(1..=9).contains(&digit) {
            return Err(MarkerError::InvalidDigit(digit));
        }
        if session.recording.is_empty() {
            return Err(MarkerError::EmptyRecording);
        }
        session.recording.set_tag(self.cursor, digit);
        self.declared_tag_count = self.declared_tag_count.max(digit);
        self.next_tag = digit % self.declared_tag_count;
        debug!("Frame {} tagged {} explicitly", self.cursor, digit);
        Ok(digit)
    }

    /// Untags the cursor frame and resumes the round robin after the last tagged frame.
    ///
    /// The backward scan stops at frame 0 whatever its tag, so a recording without
    /// tags resets the counter to 0.
    pub fn clear_current_tag(&mut self, session: &mut SessionState) -> Result<(), MarkerError> {
        let rec = &mut session.recording;
        if rec.is_empty() {
            return Err(MarkerError::EmptyRecording);
        }
        rec.set_tag(self.cursor, 0);

        let mut i = rec.frame_count() - 1;
        while i > 0 && rec.tag(i) == 0 {
            i -= 1;
        }
        self.next_tag = rec.tag(i) % self.declared_tag_count.max(1);
        Ok(())
    }

    /// Header line followed by `Frame n, tag = t` for each tagged frame (n is 1-based).
    pub fn keyframe_summary(recording: &Recording) -> String {
        let mut out = String::from(KEYFRAME_LIST_HEADER);
        for (i, frame) in recording.frames().iter().enumerate() {
            if frame.is_tagged() {
                let _ = write!(out, "\nFrame {}, tag = {}", i + 1, frame.tag);
            }
        }
        out
    }

    /// Joint positions, position in the recording and tag of the cursor frame
    pub fn frame_info(&self, recording: &Recording) -> String {
        let mut out = String::from("Joint info\n");
        let Some(frame) = recording.frame(self.cursor) else {
            return out;
        };
        for (joint, data) in recording.joint_index().iter().zip(frame.joints.iter()) {
            let [x, y, z] = data.pos;
            let _ = writeln!(out, "{}: ({:.1}, {:.1}, {:.1})", joint, x, y, z);
        }
        let _ = write!(
            out,
            "\nFrame {}/{}, time {} s\n",
            self.cursor + 1,
            recording.frame_count(),
            frame.timestamp
        );
        if frame.is_tagged() {
            let _ = write!(out, "key frame tag {}", frame.tag);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Frame, Joint, JointData};
    use rand::Rng;

    fn session(tags: &[u32]) -> SessionState {
        let mut rec = Recording::new(vec![Joint::Head, Joint::Torso]);
        for (i, tag) in tags.iter().enumerate() {
            let joints = vec![JointData::new(i as f32, 0.0, 0.0), JointData::new(0.0, 1.0, 0.0)];
            rec.push_frame(Frame::new(joints, i as f64 * 0.1).with_tag(*tag)).unwrap();
        }
        SessionState::with_recording(rec)
    }

    fn tags(session: &SessionState) -> Vec<u32> {
        session.recording.frames().iter().map(|f| f.tag).collect()
    }

    fn ready(tags: &[u32], count: &str) -> (KeyframeMarker, SessionState) {
        let mut s = session(tags);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        m.set_declared_tag_count(count).unwrap();
        (m, s)
    }

    #[test]
    fn tag_count_must_be_positive_integer() {
        assert_eq!(parse_tag_count("3"), Ok(3));
        assert_eq!(parse_tag_count(" 12 "), Ok(12));
        for bad in ["0", "-2", "two", "", "1.5"] {
            assert!(matches!(parse_tag_count(bad), Err(MarkerError::InvalidTagCount(_))));
        }

        let mut m = KeyframeMarker::default();
        m.set_declared_tag_count("4").unwrap();
        assert!(m.set_declared_tag_count("x").is_err());
        assert_eq!(m.declared_tag_count(), 4);
    }

    #[test]
    fn tagging_disabled_after_init() {
        let mut s = session(&[0, 0]);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        assert_eq!(m.assign_next_tag(&mut s), Err(MarkerError::TagCountNotSet));
        assert_eq!(tags(&s), vec![0, 0]);
    }

    #[test]
    fn round_robin_numbering() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let k: u32 = rng.random_range(1..=9);
            let n: usize = rng.random_range(1..40);
            let (mut m, mut s) = ready(&vec![0; n], &k.to_string());
            for call in 1..=n {
                m.go_to(&mut s, call - 1);
                let tag = m.assign_next_tag(&mut s).unwrap();
                assert_eq!(tag, ((call as u32 - 1) % k) + 1);
                assert!(m.next_tag() < k);
            }
        }
    }

    #[test]
    fn explicit_tag_raises_count_exactly() {
        let (mut m, mut s) = ready(&[0, 0, 0], "2");
        assert_eq!(m.assign_explicit_tag(&mut s, 5), Ok(5));
        assert_eq!(m.declared_tag_count(), 5);
        assert_eq!(m.next_tag(), 0);

        m.go_to(&mut s, 1);
        m.assign_explicit_tag(&mut s, 3).unwrap();
        assert_eq!(m.declared_tag_count(), 5);
        assert_eq!(m.next_tag(), 3);
        m.go_to(&mut s, 2);
        assert_eq!(m.assign_next_tag(&mut s), Ok(4));
        assert_eq!(tags(&s), vec![5, 3, 4]);

        assert_eq!(m.assign_explicit_tag(&mut s, 0), Err(MarkerError::InvalidDigit(0)));
    }

    #[test]
    fn explicit_tag_works_without_declared_count() {
        let mut s = session(&[0, 0]);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        m.assign_explicit_tag(&mut s, 2).unwrap();
        assert_eq!(m.declared_tag_count(), 2);
        assert_eq!(m.next_tag(), 0);
    }

    #[test]
    fn clear_resumes_after_last_tagged_frame() {
        let (mut m, mut s) = ready(&[0; 6], "3");
        for i in 0..4 {
            m.go_to(&mut s, i);
            m.assign_next_tag(&mut s).unwrap();
        }
        assert_eq!(tags(&s), vec![1, 2, 3, 1, 0, 0]);

        m.go_to(&mut s, 3);
        m.clear_current_tag(&mut s).unwrap();
        assert_eq!(m.next_tag(), 0);
        m.go_to(&mut s, 4);
        assert_eq!(m.assign_next_tag(&mut s), Ok(1));

        m.go_to(&mut s, 1);
        m.clear_current_tag(&mut s).unwrap();
        assert_eq!(m.next_tag(), 1);
        assert_eq!(tags(&s), vec![1, 0, 3, 0, 1, 0]);
    }

    #[test]
    fn clear_on_untagged_recording_resets_counter() {
        let mut s = session(&[0, 0, 0]);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        m.clear_current_tag(&mut s).unwrap();
        assert_eq!(m.next_tag(), 0);

        let (mut m, mut s) = ready(&[0, 0, 2], "4");
        m.go_to(&mut s, 2);
        m.clear_current_tag(&mut s).unwrap();
        assert_eq!(m.next_tag(), 0);
    }

    #[test]
    fn clear_keeps_tag_on_first_frame_in_scan() {
        let (mut m, mut s) = ready(&[2, 0, 1], "3");
        m.go_to(&mut s, 2);
        m.clear_current_tag(&mut s).unwrap();
        assert_eq!(m.next_tag(), 2);
    }

    #[test]
    fn step_next_visits_every_keyframe_then_stops_at_end() {
        let layout = [0, 3, 0, 0, 1, 0, 2, 0, 0];
        let mut s = session(&layout);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);

        let mut visited = Vec::new();
        for _ in 0..6 {
            m.step_next(&mut s);
            visited.push(m.cursor());
        }
        assert_eq!(visited, vec![1, 4, 6, 8, 8, 8]);

        m.step_prev(&mut s);
        assert_eq!(m.cursor(), 6);
        m.go_to(&mut s, 3);
        m.step_prev(&mut s);
        assert_eq!(m.cursor(), 1);
        m.step_prev(&mut s);
        assert_eq!(m.cursor(), 0);
        m.step_prev(&mut s);
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn steps_on_last_tagged_frame_stay_put() {
        let mut s = session(&[0, 0, 4]);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        m.step_next(&mut s);
        assert_eq!(m.cursor(), 2);
        m.step_next(&mut s);
        assert_eq!(m.cursor(), 2);
    }

    #[test]
    fn scroll_truncates_and_clamps() {
        let mut s = session(&[0; 50]);
        let mut m = KeyframeMarker::new(10.0);
        m.init(&mut s);

        m.scroll(&mut s, 0.05);
        assert_eq!(m.cursor(), 0);
        m.scroll(&mut s, 0.25);
        assert_eq!(m.cursor(), 2);
        m.scroll(&mut s, -0.39);
        assert_eq!(m.cursor(), 0);
        m.scroll(&mut s, 9.0);
        assert_eq!(m.cursor(), 49);
        m.scroll(&mut s, -100.0);
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn huge_scroll_from_interior_frame_lands_on_an_end() {
        let mut s = session(&[0; 50]);
        let mut m = KeyframeMarker::new(10.0);
        m.init(&mut s);

        m.scroll(&mut s, 0.1);
        assert_eq!(m.cursor(), 1);
        m.scroll(&mut s, 1e30);
        assert_eq!(m.cursor(), 49);

        m.go_to(&mut s, 20);
        m.scroll(&mut s, f32::INFINITY);
        assert_eq!(m.cursor(), 49);

        m.go_to(&mut s, 20);
        m.scroll(&mut s, f32::NEG_INFINITY);
        assert_eq!(m.cursor(), 0);

        m.go_to(&mut s, 20);
        m.scroll(&mut s, f32::NAN);
        assert_eq!(m.cursor(), 20);
    }

    #[test]
    fn cursor_moves_repoint_pose() {
        let mut s = session(&[0, 0, 0]);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        m.scroll(&mut s, 0.2);
        let frame = s.recording.frame(2).unwrap().joints.clone();
        assert!(s.pose.shares_frame(Joint::Head, &frame));
        assert_eq!(s.pose.joint(Joint::Head), Some(&JointData::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn empty_recording_is_inert() {
        let mut s = SessionState::default();
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        m.set_declared_tag_count("2").unwrap();
        m.scroll(&mut s, 1.0);
        m.step_next(&mut s);
        m.step_prev(&mut s);
        assert_eq!(m.cursor(), 0);
        assert_eq!(m.assign_next_tag(&mut s), Err(MarkerError::EmptyRecording));
        assert_eq!(m.clear_current_tag(&mut s), Err(MarkerError::EmptyRecording));
    }

    #[test]
    fn summary_lists_tagged_frames() {
        let s = session(&[0, 2, 0, 1]);
        assert_eq!(
            KeyframeMarker::keyframe_summary(&s.recording),
            "Key frame list\nFrame 2, tag = 2\nFrame 4, tag = 1"
        );
        let empty = session(&[0, 0]);
        assert_eq!(KeyframeMarker::keyframe_summary(&empty.recording), KEYFRAME_LIST_HEADER);
    }

    #[test]
    fn frame_info_describes_cursor_frame() {
        let mut s = session(&[0, 3]);
        let mut m = KeyframeMarker::default();
        m.init(&mut s);
        m.go_to(&mut s, 1);
        let info = m.frame_info(&s.recording);
        assert!(info.starts_with("Joint info\nHead: (1.0, 0.0, 0.0)\nTorso: (0.0, 1.0, 0.0)\n"));
        assert!(info.contains("Frame 2/2, time 0.1 s"));
        assert!(info.ends_with("key frame tag 3"));
    }
}
