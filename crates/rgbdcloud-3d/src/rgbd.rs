use rayon::prelude::*;
use rgbdcloud_image::{Image, ImageSize};

use crate::{
    camera::PinholeCamera,
    linalg::transform_point,
    pointcloud::PointCloud,
    transforms::{Pose, TransformError},
};

/// Error types for the RGB-D reconstruction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RgbdError {
    /// The color and depth images have different resolutions.
    #[error("Color and depth images do not have the same resolution: {0} vs {1}")]
    DimensionMismatch(ImageSize, ImageSize),

    /// The color image is not an 8-bit RGB image.
    #[error("Color image is not in RGB format: {0}")]
    UnsupportedColorFormat(String),

    /// The depth image is not a single channel integer image.
    #[error("Depth image is not in intensity format: {0}")]
    UnsupportedDepthFormat(String),

    /// The pose rotation is not usable.
    #[error("Invalid pose. {0}")]
    InvalidPose(#[from] TransformError),
}

/// Controls how the per-pixel reconstruction is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool over the flat pixel range.
    #[default]
    Parallel,

    /// Run sequentially on the current thread.
    Serial,
}

/// Reconstruct a colored point cloud from a color and depth image pair.
///
/// Every pixel with a non-zero depth sample is back-projected through the
/// camera model and moved into the world frame with the pose. Points are
/// emitted in raster order (row by row) for both execution strategies.
///
/// # Arguments
///
/// * `color` - The RGB image.
/// * `depth` - The depth image, in raw depth units.
/// * `pose` - The camera pose in the world frame.
/// * `camera` - The camera intrinsics and depth scale.
/// * `strategy` - Whether to process the pixels in parallel.
///
/// # Errors
///
/// [`RgbdError::DimensionMismatch`] if the images have different sizes, and
/// [`RgbdError::InvalidPose`] if the pose rotation is not a unit quaternion.
///
/// Example:
///
/// ```
/// use rgbdcloud_3d::{camera::PinholeCamera, rgbd, transforms::Pose};
/// use rgbdcloud_image::Image;
///
/// let color = Image::<u8, 3>::new([2, 1].into(), vec![10, 20, 30, 40, 50, 60]).unwrap();
/// let depth = Image::<u16, 1>::new([2, 1].into(), vec![0, 5000]).unwrap();
///
/// let cloud = rgbd::reconstruct_pointcloud(
///     &color,
///     &depth,
///     &Pose::identity(),
///     &PinholeCamera::default(),
///     rgbd::ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert_eq!(cloud.len(), 1);
/// assert_eq!(cloud.colors().unwrap()[0], [40, 50, 60]);
/// ```
pub fn reconstruct_pointcloud(
    color: &Image<u8, 3>,
    depth: &Image<u16, 1>,
    pose: &Pose,
    camera: &PinholeCamera,
    strategy: ExecutionStrategy,
) -> Result<PointCloud, RgbdError> {
    if color.size() != depth.size() {
        return Err(RgbdError::DimensionMismatch(color.size(), depth.size()));
    }

    let rotation = pose.rotation_matrix()?;
    let translation = pose.translation;
    let cols = color.cols();
    let depth_data = depth.as_slice();

    let unproject_pixel = |index: usize| -> Option<([f64; 3], [u8; 3])> {
        let (u, v) = (index % cols, index / cols);
        let point = camera.unproject(u as f64, v as f64, depth_data[index] as f64)?;
        let rgb = color.pixel(index);
        Some((
            transform_point(&point, &rotation, &translation),
            [rgb[0], rgb[1], rgb[2]],
        ))
    };

    let num_pixels = color.size().num_pixels();
    let (points, colors): (Vec<_>, Vec<_>) = match strategy {
        ExecutionStrategy::Parallel => (0..num_pixels)
            .into_par_iter()
            .filter_map(unproject_pixel)
            .unzip(),
        ExecutionStrategy::Serial => (0..num_pixels).filter_map(unproject_pixel).unzip(),
    };
    log::debug!(
        "{} of {} pixels have a depth measurement",
        points.len(),
        num_pixels
    );

    Ok(PointCloud::new(points, Some(colors)))
}
