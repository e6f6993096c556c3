use serde::{Deserialize, Serialize};

/// A struct representing the intrinsic parameters of a pinhole depth camera.
///
/// The defaults are the ROS default intrinsics used for the Freiburg RGB-D
/// sequences: 525 px focal length, principal point (319.5, 239.5) and depth
/// maps scaled by 5000 units per meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinholeCamera {
    /// The focal length in pixels (fx, fy)
    pub focal_length: (f64, f64),
    /// The principal point in pixels (cx, cy)
    pub principal_point: (f64, f64),
    /// Raw depth units per meter
    pub depth_scale: f64,
}

impl Default for PinholeCamera {
    fn default() -> Self {
        Self {
            focal_length: (525.0, 525.0),
            principal_point: (319.5, 239.5),
            depth_scale: 5000.0,
        }
    }
}

impl PinholeCamera {
    /// Creates a new PinholeCamera with the given parameters.
    pub fn new(focal_length: (f64, f64), principal_point: (f64, f64), depth_scale: f64) -> Self {
        Self {
            focal_length,
            principal_point,
            depth_scale,
        }
    }

    /// Whether the intrinsics can back-project a pixel to a finite point.
    ///
    /// The focal lengths and the depth scale must be positive and finite, and
    /// the principal point finite.
    pub fn is_valid(&self) -> bool {
        let (fx, fy) = self.focal_length;
        let (cx, cy) = self.principal_point;
        [fx, fy, self.depth_scale]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
            && cx.is_finite()
            && cy.is_finite()
    }

    /// Returns the camera matrix as a 3x3 array.
    pub fn camera_matrix(&self) -> [[f64; 3]; 3] {
        let (fx, fy) = self.focal_length;
        let (cx, cy) = self.principal_point;
        [[fx, 0.0, cx], [0.0, fy, cy], [0.0, 0.0, 1.0]]
    }

    /// Back-project a pixel with its raw depth sample into camera space.
    ///
    /// # Arguments
    ///
    /// * `u` - The column of the pixel.
    /// * `v` - The row of the pixel.
    /// * `depth` - The raw depth sample, in depth units.
    ///
    /// # Returns
    ///
    /// The point `[X, Y, Z]` in meters, or `None` when the depth is zero,
    /// which the sensor uses to mark a pixel without a measurement.
    ///
    /// Example:
    ///
    /// ```
    /// use rgbdcloud_3d::camera::PinholeCamera;
    ///
    /// let camera = PinholeCamera::default();
    /// let point = camera.unproject(319.5, 239.5, 5000.0).unwrap();
    /// assert_eq!(point, [0.0, 0.0, 1.0]);
    /// assert!(camera.unproject(10.0, 10.0, 0.0).is_none());
    /// ```
    #[inline]
    pub fn unproject(&self, u: f64, v: f64, depth: f64) -> Option<[f64; 3]> {
        let z = depth / self.depth_scale;
        if z == 0.0 {
            return None;
        }

        let (fx, fy) = self.focal_length;
        let (cx, cy) = self.principal_point;
        Some([(u - cx) * z / fx, (v - cy) * z / fy, z])
    }
}
