/// Transform a point using a rotation and translation.
///
/// Computes `dst_r_src * point + dst_t_src`.
///
/// # Arguments
///
/// * `point` - The point in the source frame.
/// * `dst_r_src` - The rotation matrix from source to destination frame.
/// * `dst_t_src` - The translation from source to destination frame.
///
/// Example:
///
/// ```
/// use rgbdcloud_3d::linalg::transform_point;
///
/// let rotation = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [1.0, 2.0, 3.0];
/// let point = transform_point(&[1.0, 0.0, 0.0], &rotation, &translation);
/// assert_eq!(point, [1.0, 3.0, 3.0]);
/// ```
#[inline]
pub fn transform_point(
    point: &[f64; 3],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
) -> [f64; 3] {
    let [x, y, z] = *point;
    [
        dst_r_src[0][0] * x + dst_r_src[0][1] * y + dst_r_src[0][2] * z + dst_t_src[0],
        dst_r_src[1][0] * x + dst_r_src[1][1] * y + dst_r_src[1][2] * z + dst_t_src[1],
        dst_r_src[2][0] * x + dst_r_src[2][1] * y + dst_r_src[2][2] * z + dst_t_src[2],
    ]
}

/// Transform a set of points using a rotation and translation.
///
/// # Arguments
///
/// * `src_points` - The points in the source frame.
/// * `dst_r_src` - The rotation matrix from source to destination frame.
/// * `dst_t_src` - The translation from source to destination frame.
/// * `dst_points` - The transformed points, same length as `src_points`.
///
/// PRECONDITION: `dst_points` has the same length as `src_points`.
pub fn transform_points(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) {
    debug_assert_eq!(src_points.len(), dst_points.len());
    src_points
        .iter()
        .zip(dst_points.iter_mut())
        .for_each(|(src, dst)| *dst = transform_point(src, dst_r_src, dst_t_src));
}
