use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use rgbdcloud_3d::transforms::Pose;

use crate::{
    correlate::Triple,
    error::AssocError,
    record::{parse_stamp, RecordSet},
};

/// Number of tokens on a line of the correlated frame file.
///
/// `depth_stamp depth_path color_stamp color_path pose_stamp tx ty tz qx qy qz qw`
pub const CORRELATED_LINE_TOKENS: usize = 12;

/// One line of the correlated frame file: a depth map, a color image and the
/// ground truth pose of the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatedFrame {
    /// Stamp of the depth map.
    pub depth_stamp: f64,
    /// Path of the depth map, as written in the file.
    pub depth_path: PathBuf,
    /// Stamp of the color image.
    pub color_stamp: f64,
    /// Path of the color image, as written in the file.
    pub color_path: PathBuf,
    /// Stamp of the ground truth pose.
    pub pose_stamp: f64,
    /// The camera pose in the world frame.
    pub pose: Pose,
}

fn parse_field(token: &str, line: usize) -> Result<f64, AssocError> {
    token.parse::<f64>().map_err(|e| AssocError::ParseError {
        line,
        token: token.to_string(),
        reason: e.to_string(),
    })
}

/// Parse one line of the correlated frame file.
///
/// # Arguments
///
/// * `line` - The text of the line.
/// * `line_number` - The 1-based line number, used in errors.
///
/// # Errors
///
/// [`AssocError::MalformedLine`] if the line does not have exactly
/// [`CORRELATED_LINE_TOKENS`] tokens, and [`AssocError::ParseError`] if a
/// stamp or pose field is not a number.
pub fn parse_correlated_line(
    line: &str,
    line_number: usize,
) -> Result<CorrelatedFrame, AssocError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    if tokens.len() != CORRELATED_LINE_TOKENS {
        return Err(AssocError::MalformedLine {
            line: line_number,
            expected: CORRELATED_LINE_TOKENS,
            found: tokens.len(),
        });
    }

    let mut pose = [0.0; 7];
    for (value, token) in pose.iter_mut().zip(&tokens[5..]) {
        *value = parse_field(token, line_number)?;
    }
    let [tx, ty, tz, qx, qy, qz, qw] = pose;

    Ok(CorrelatedFrame {
        depth_stamp: parse_stamp(tokens[0], line_number)?,
        depth_path: PathBuf::from(tokens[1]),
        color_stamp: parse_stamp(tokens[2], line_number)?,
        color_path: PathBuf::from(tokens[3]),
        pose_stamp: parse_stamp(tokens[4], line_number)?,
        pose: Pose::new([tx, ty, tz], [qx, qy, qz, qw]),
    })
}

/// Parse the text of a correlated frame file, skipping empty lines.
pub fn parse_correlated_frames(text: &str) -> Result<Vec<CorrelatedFrame>, AssocError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_correlated_line(line, i + 1))
        .collect()
}

/// Read a correlated frame file.
///
/// # Arguments
///
/// * `path` - The path to the file, e.g. `timestamp_map.txt`.
pub fn read_correlated_file(path: impl AsRef<Path>) -> Result<Vec<CorrelatedFrame>, AssocError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let frames = parse_correlated_frames(&text)?;
    log::debug!(
        "read {} correlated frames from {}",
        frames.len(),
        path.as_ref().display()
    );
    Ok(frames)
}

fn write_record<W: Write>(
    writer: &mut W,
    records: &RecordSet,
    stamp: f64,
) -> Result<(), AssocError> {
    let fields = records.get(stamp).ok_or(AssocError::UnknownStamp(stamp))?;
    write!(writer, "{stamp:?}")?;
    for field in fields {
        write!(writer, " {field}")?;
    }
    Ok(())
}

/// Write correlated triples, one line each, to any writer.
///
/// Each line holds the stamp and fields of the depth record, then of the
/// color record, then of the pose record, separated by single spaces.
///
/// # Returns
///
/// The number of lines written.
///
/// # Errors
///
/// [`AssocError::UnknownStamp`] if a triple refers to a stamp missing from
/// its record set.
pub fn write_correlated<W: Write>(
    writer: &mut W,
    triples: &[Triple],
    depth: &RecordSet,
    color: &RecordSet,
    pose: &RecordSet,
) -> Result<usize, AssocError> {
    for triple in triples {
        write_record(writer, depth, triple.depth)?;
        write!(writer, " ")?;
        write_record(writer, color, triple.color)?;
        write!(writer, " ")?;
        write_record(writer, pose, triple.pose)?;
        writeln!(writer)?;
    }
    Ok(triples.len())
}

/// Write correlated triples to a file, see [`write_correlated`].
pub fn write_correlated_file(
    path: impl AsRef<Path>,
    triples: &[Triple],
    depth: &RecordSet,
    color: &RecordSet,
    pose: &RecordSet,
) -> Result<usize, AssocError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    let num_lines = write_correlated(&mut writer, triples, depth, color, pose)?;
    writer.flush()?;
    log::info!(
        "wrote {} correlated frames to {}",
        num_lines,
        path.as_ref().display()
    );
    Ok(num_lines)
}
