/// A point cloud with points and optional per-point colors.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
    // The colors of the points.
    colors: Option<Vec<[u8; 3]>>,
}

impl PointCloud {
    /// Create a new point cloud from points and colors (optional).
    ///
    /// PRECONDITION: when given, `colors` has one entry per point.
    pub fn new(points: Vec<[f64; 3]>, colors: Option<Vec<[u8; 3]>>) -> Self {
        debug_assert!(colors.as_ref().map_or(true, |c| c.len() == points.len()));
        Self { points, colors }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &Vec<[f64; 3]> {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> Option<&Vec<[u8; 3]>> {
        self.colors.as_ref()
    }

    /// Get the minimum bound of the point cloud.
    pub fn min_bound(&self) -> [f64; 3] {
        self.bound(f64::min)
    }

    /// Get the maximum bound of the point cloud.
    pub fn max_bound(&self) -> [f64; 3] {
        self.bound(f64::max)
    }

    fn bound(&self, pick: impl Fn(f64, f64) -> f64) -> [f64; 3] {
        let Some(first) = self.points.first() else {
            return [0.0; 3];
        };
        self.points.iter().fold(*first, |acc, p| {
            [pick(acc[0], p[0]), pick(acc[1], p[1]), pick(acc[2], p[2])]
        })
    }
}
