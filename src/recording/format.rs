use std::io::{BufRead, Write};

use crate::error::RecordingError;
use crate::types::{Frame, Joint, JointData};

/// First line written to every skeleton / keyframe file
pub const FILE_HEADER: &str = "# gesture-trainer skeleton v1";

/// Fully parsed file contents, produced before anything is committed to a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecording {
    pub joint_index: Vec<Joint>,
    pub frames: Vec<Frame>,
}

/// Value of a `<name> <value>` line; the name must stand alone as the first word.
fn directive<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> RecordingError {
    RecordingError::Parse {
        line,
        message: message.into(),
    }
}

/// Reads the line-oriented skeleton format.
///
/// Layout:
/// ```text
/// # gesture-trainer skeleton v1
/// joints Head,Neck,Torso
/// frames 2
/// <timestamp> <tag> <x1> <y1> <z1> <x2> ...
/// ```
/// Blank lines and `#` comments are ignored anywhere.
pub fn read_recording<R: BufRead>(reader: R) -> Result<ParsedRecording, RecordingError> {
    let mut joint_index: Option<Vec<Joint>> = None;
    let mut expected_frames: Option<usize> = None;
    let mut frames = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(joint_count) = joint_index.as_ref().map(Vec::len) else {
            let rest = directive(line, "joints")
                .ok_or_else(|| parse_error(line_no, "expected `joints` line"))?;
            joint_index = Some(parse_joint_list(rest, line_no)?);
            continue;
        };

        let Some(expected) = expected_frames else {
            let count = directive(line, "frames")
                .ok_or_else(|| parse_error(line_no, "expected `frames` line"))?
                .parse::<usize>()
                .map_err(|e| parse_error(line_no, format!("invalid frame count: {}", e)))?;
            expected_frames = Some(count);
            frames.reserve(count.min(4096));
            continue;
        };

        if frames.len() == expected {
            return Err(parse_error(line_no, format!("more than {} frames", expected)));
        }
        frames.push(parse_frame(line, joint_count, line_no)?);
    }

    let joint_index = joint_index.ok_or_else(|| parse_error(0, "missing `joints` line"))?;
    let expected = expected_frames.ok_or_else(|| parse_error(0, "missing `frames` line"))?;
    if frames.len() != expected {
        return Err(parse_error(
            0,
            format!("expected {} frames, found {}", expected, frames.len()),
        ));
    }

    Ok(ParsedRecording { joint_index, frames })
}

fn parse_joint_list(list: &str, line_no: usize) -> Result<Vec<Joint>, RecordingError> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Joint>()
                .map_err(|e| parse_error(line_no, e.to_string()))
        })
        .collect()
}

fn parse_frame(line: &str, joint_count: usize, line_no: usize) -> Result<Frame, RecordingError> {
    let mut fields = line.split_whitespace();

    let timestamp = fields
        .next()
        .ok_or_else(|| parse_error(line_no, "missing timestamp"))?
        .parse::<f64>()
        .map_err(|e| parse_error(line_no, format!("invalid timestamp: {}", e)))?;
    let tag = fields
        .next()
        .ok_or_else(|| parse_error(line_no, "missing tag"))?
        .parse::<u32>()
        .map_err(|e| parse_error(line_no, format!("invalid tag: {}", e)))?;

    let coords = fields
        .map(|f| f.parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|e| parse_error(line_no, format!("invalid coordinate: {}", e)))?;
    if coords.len() != joint_count * 3 {
        return Err(parse_error(
            line_no,
            format!("expected {} coordinates, found {}", joint_count * 3, coords.len()),
        ));
    }

    let joints = coords
        .chunks_exact(3)
        .map(|c| JointData::new(c[0], c[1], c[2]))
        .collect();
    Ok(Frame::new(joints, timestamp).with_tag(tag))
}

/// Writes frames in the format read by [`read_recording`]. Returns the number of frames written.
pub fn write_recording<W: Write>(
    mut writer: W,
    joint_index: &[Joint],
    frames: &[Frame],
) -> Result<usize, RecordingError> {
    writeln!(writer, "{}", FILE_HEADER)?;
    let names: Vec<&str> = joint_index.iter().map(|j| j.name()).collect();
    writeln!(writer, "joints {}", names.join(","))?;
    writeln!(writer, "frames {}", frames.len())?;

    for frame in frames {
        write!(writer, "{} {}", frame.timestamp, frame.tag)?;
        for joint in frame.joints.iter() {
            write!(writer, " {} {} {}", joint.pos[0], joint.pos[1], joint.pos[2])?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(frames.len())
}
