/// Largest accepted deviation of a rotation quaternion norm from one.
///
/// Ground truth trajectories are usually written with four decimals, which
/// moves the norm by about 1e-4.
pub const QUATERNION_NORM_TOLERANCE: f64 = 1e-3;

/// Error types for the transforms module.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransformError {
    /// The rotation quaternion is not a unit quaternion.
    #[error("rotation quaternion has norm {0}, expected a unit quaternion")]
    InvalidPose(f64),
}

/// A rigid body pose: rotation followed by translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// The translation `[tx, ty, tz]`.
    pub translation: [f64; 3],
    /// The rotation as a quaternion `[qx, qy, qz, qw]`.
    pub rotation: [f64; 4],
}

impl Pose {
    /// Creates a new pose from a translation and a `[qx, qy, qz, qw]` quaternion.
    pub fn new(translation: [f64; 3], rotation: [f64; 4]) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// The identity pose.
    pub fn identity() -> Self {
        Self::new([0.0; 3], [0.0, 0.0, 0.0, 1.0])
    }

    /// The rotation matrix of the pose.
    pub fn rotation_matrix(&self) -> Result<[[f64; 3]; 3], TransformError> {
        quaternion_to_rotation_matrix(&self.rotation)
    }
}

/// Compute the rotation matrix from a unit quaternion.
///
/// # Arguments
///
/// * `quaternion` - The quaternion `[qx, qy, qz, qw]`.
///
/// # Returns
///
/// The rotation matrix.
///
/// # Errors
///
/// [`TransformError::InvalidPose`] if the norm of the quaternion differs from one
/// by more than [`QUATERNION_NORM_TOLERANCE`]. Quaternions within the tolerance
/// are normalized before conversion.
///
/// Example:
///
/// ```
/// use rgbdcloud_3d::transforms::quaternion_to_rotation_matrix;
///
/// let half = std::f64::consts::FRAC_1_SQRT_2;
/// let rotation = quaternion_to_rotation_matrix(&[0.0, 0.0, half, half]).unwrap();
/// assert!((rotation[1][0] - 1.0).abs() < 1e-12);
/// ```
pub fn quaternion_to_rotation_matrix(
    quaternion: &[f64; 4],
) -> Result<[[f64; 3]; 3], TransformError> {
    let norm = quaternion.iter().map(|q| q * q).sum::<f64>().sqrt();
    if norm.is_nan() || (norm - 1.0).abs() > QUATERNION_NORM_TOLERANCE {
        return Err(TransformError::InvalidPose(norm));
    }

    let [x, y, z, w] = quaternion.map(|q| q / norm);

    let xx = x * x;
    let yy = y * y;
    let zz = z * z;
    let xy = x * y;
    let xz = x * z;
    let yz = y * z;
    let wx = w * x;
    let wy = w * y;
    let wz = w * z;

    Ok([
        [1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy)],
        [2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx)],
        [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy)],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_matrix_eq(actual: &[[f64; 3]; 3], expected: &[[f64; 3]; 3]) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(actual[i][j], expected[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_identity_quaternion() -> Result<(), TransformError> {
        let rotation = Pose::identity().rotation_matrix()?;
        assert_matrix_eq(
            &rotation,
            &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        );
        Ok(())
    }

    #[test]
    fn test_quarter_turn_about_x() -> Result<(), TransformError> {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let rotation = quaternion_to_rotation_matrix(&[half, 0.0, 0.0, half])?;
        assert_matrix_eq(
            &rotation,
            &[[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]],
        );
        Ok(())
    }

    #[test]
    fn test_half_turn_about_y() -> Result<(), TransformError> {
        let rotation = quaternion_to_rotation_matrix(&[0.0, 1.0, 0.0, 0.0])?;
        assert_matrix_eq(
            &rotation,
            &[[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
        );
        Ok(())
    }

    #[test]
    fn test_rotation_is_orthonormal() -> Result<(), TransformError> {
        // a ground truth orientation as written with four decimals
        let rotation = quaternion_to_rotation_matrix(&[0.6132, 0.5962, -0.3311, -0.3986])?;
        for i in 0..3 {
            for j in 0..3 {
                let dot = (0..3).map(|k| rotation[i][k] * rotation[j][k]).sum::<f64>();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(dot, expected, epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_non_unit_quaternion_is_rejected() {
        assert!(matches!(
            quaternion_to_rotation_matrix(&[1.0, 1.0, 1.0, 1.0]),
            Err(TransformError::InvalidPose(norm)) if (norm - 2.0).abs() < 1e-12
        ));
        assert!(quaternion_to_rotation_matrix(&[0.0; 4]).is_err());
        assert!(quaternion_to_rotation_matrix(&[f64::NAN, 0.0, 0.0, 1.0]).is_err());
    }
}
