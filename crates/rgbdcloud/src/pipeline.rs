use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rgbdcloud_3d::{
    camera::PinholeCamera,
    io::ply::{write_ply_ascii, PlyError},
    rgbd::{reconstruct_pointcloud, ExecutionStrategy, RgbdError},
};
use rgbdcloud_assoc::{AssocError, CorrelatedFrame};
use rgbdcloud_image::Image;
use rgbdcloud_io::{read_image_any, GenericImage, IoError};

/// Error types for the reconstruction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Error creating the output directory
    #[error("Failed to create the output directory")]
    Io(#[from] std::io::Error),

    /// Error reading the correlated frame file
    #[error(transparent)]
    Assoc(#[from] AssocError),

    /// Error reading an image
    #[error(transparent)]
    Image(#[from] IoError),

    /// Error reconstructing the point cloud
    #[error(transparent)]
    Rgbd(#[from] RgbdError),

    /// Error writing the point cloud
    #[error(transparent)]
    Ply(#[from] PlyError),
}

/// What to do when a frame cannot be reconstructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing frame and return its error.
    #[default]
    Abort,
    /// Log the failure, record it in the report and go on with the next frame.
    Continue,
}

/// Options of [`process_correlated_frames`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory the image paths of the correlated file are relative to.
    pub dataset_root: PathBuf,
    /// Directory receiving the PLY files, created if missing.
    pub output_dir: PathBuf,
    /// The camera model of the sensor.
    pub camera: PinholeCamera,
    /// How each frame is reconstructed.
    pub strategy: ExecutionStrategy,
    /// What to do when a frame fails.
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("."),
            output_dir: PathBuf::from("output_ply"),
            camera: PinholeCamera::default(),
            strategy: ExecutionStrategy::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// A point cloud written by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// Position of the frame in the correlated file.
    pub index: usize,
    /// The written PLY file.
    pub ply_path: PathBuf,
    /// Number of points in the cloud.
    pub num_points: usize,
}

/// A frame that could not be reconstructed.
#[derive(Debug)]
pub struct FrameFailure {
    /// Position of the frame in the correlated file.
    pub index: usize,
    /// The cause of the failure.
    pub error: PipelineError,
}

/// The outcome of [`process_correlated_frames`], in frame order.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// The point clouds written.
    pub written: Vec<FrameOutput>,
    /// The frames skipped under [`FailurePolicy::Continue`].
    pub failures: Vec<FrameFailure>,
}

/// The name of the PLY file of the frame at `index`.
pub fn ply_file_name(index: usize) -> String {
    format!("point_cloud{index}.ply")
}

/// Accept a decoded image as the color input of the reconstruction.
///
/// # Errors
///
/// [`RgbdError::UnsupportedColorFormat`] unless the image is 8-bit RGB.
pub fn color_image(image: GenericImage) -> Result<Image<u8, 3>, RgbdError> {
    match image {
        GenericImage::Rgb8(img) => Ok(img),
        other => Err(RgbdError::UnsupportedColorFormat(
            other.color_mode().to_string(),
        )),
    }
}

/// Accept a decoded image as the depth input of the reconstruction.
///
/// # Errors
///
/// [`RgbdError::UnsupportedDepthFormat`] unless the image is a 16-bit
/// single channel image.
pub fn depth_image(image: GenericImage) -> Result<Image<u16, 1>, RgbdError> {
    match image {
        GenericImage::L16(img) => Ok(img),
        other => Err(RgbdError::UnsupportedDepthFormat(
            other.color_mode().to_string(),
        )),
    }
}

// a decodable layout without a `GenericImage` variant is a format error of the image's role
fn read_frame_image(
    path: &Path,
    unsupported: fn(String) -> RgbdError,
) -> Result<GenericImage, PipelineError> {
    match read_image_any(path) {
        Err(IoError::UnsupportedImageFormat(mode)) => Err(unsupported(mode).into()),
        res => Ok(res?),
    }
}

/// Reconstruct one correlated frame and write it as an ASCII PLY file.
///
/// Both images are decoded and their sizes compared before their formats
/// are checked.
///
/// # Arguments
///
/// * `frame` - The frame to reconstruct.
/// * `ply_path` - The destination of the point cloud.
/// * `options` - The dataset root, camera model and execution strategy.
///
/// # Returns
///
/// The number of points written.
pub fn process_frame(
    frame: &CorrelatedFrame,
    ply_path: &Path,
    options: &PipelineOptions,
) -> Result<usize, PipelineError> {
    let depth_path = options.dataset_root.join(&frame.depth_path);
    let color_path = options.dataset_root.join(&frame.color_path);
    log::info!(
        "processing depth {}, color {} -> {}",
        depth_path.display(),
        color_path.display(),
        ply_path.display()
    );

    let color = read_frame_image(&color_path, RgbdError::UnsupportedColorFormat)?;
    let depth = read_frame_image(&depth_path, RgbdError::UnsupportedDepthFormat)?;
    if color.size() != depth.size() {
        return Err(RgbdError::DimensionMismatch(color.size(), depth.size()).into());
    }
    let color = color_image(color)?;
    let depth = depth_image(depth)?;

    let pointcloud = reconstruct_pointcloud(
        &color,
        &depth,
        &frame.pose,
        &options.camera,
        options.strategy,
    )?;

    if !pointcloud.is_empty() {
        log::debug!(
            "{} points between {:?} and {:?}",
            pointcloud.len(),
            pointcloud.min_bound(),
            pointcloud.max_bound()
        );
    }

    write_ply_ascii(ply_path, &pointcloud)?;

    Ok(pointcloud.len())
}

/// Reconstruct every correlated frame into `point_cloud{index}.ply`.
///
/// Frames are processed one at a time, in file order; the index of a frame is
/// its position in `frames`, whether or not earlier frames failed.
///
/// # Arguments
///
/// * `frames` - The frames read from the correlated file.
/// * `options` - Where to read and write, and how to handle failures.
///
/// # Errors
///
/// Any frame error under [`FailurePolicy::Abort`]; the PLY files of the
/// frames before it are kept. Failing to create the output directory is
/// always an error.
pub fn process_correlated_frames(
    frames: &[CorrelatedFrame],
    options: &PipelineOptions,
) -> Result<PipelineReport, PipelineError> {
    std::fs::create_dir_all(&options.output_dir)?;

    let mut report = PipelineReport::default();

    for (index, frame) in frames.iter().enumerate() {
        let ply_path = options.output_dir.join(ply_file_name(index));
        match process_frame(frame, &ply_path, options) {
            Ok(num_points) => report.written.push(FrameOutput {
                index,
                ply_path,
                num_points,
            }),
            Err(error) => match options.failure_policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::Continue => {
                    log::warn!("skipping frame {index} ({}): {error}", frame.depth_stamp);
                    report.failures.push(FrameFailure { index, error });
                }
            },
        }
    }

    log::info!(
        "wrote {} point clouds to {}, {} frames failed",
        report.written.len(),
        options.output_dir.display(),
        report.failures.len()
    );

    Ok(report)
}
