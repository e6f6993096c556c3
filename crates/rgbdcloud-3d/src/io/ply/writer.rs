use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use super::PlyError;
use crate::pointcloud::PointCloud;

/// The per-vertex properties written by [`write_ply_ascii`], in order.
pub const PLY_VERTEX_PROPERTIES: [(&str, &str); 7] = [
    ("float", "x"),
    ("float", "y"),
    ("float", "z"),
    ("uchar", "red"),
    ("uchar", "green"),
    ("uchar", "blue"),
    ("uchar", "alpha"),
];

/// Write a point cloud to an ASCII PLY file.
///
/// Every vertex line holds the three coordinates, the RGB color and a
/// constant alpha of 0. Points without color are written black.
///
/// # Arguments
///
/// * `path` - The destination file, created or truncated.
/// * `pointcloud` - The point cloud to write.
pub fn write_ply_ascii(path: impl AsRef<Path>, pointcloud: &PointCloud) -> Result<(), PlyError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ply_ascii_to(&mut writer, pointcloud)?;
    writer.flush()?;
    Ok(())
}

/// Write a point cloud in ASCII PLY format to any writer.
///
/// Example:
///
/// ```
/// use rgbdcloud_3d::{io::ply::write_ply_ascii_to, pointcloud::PointCloud};
///
/// let cloud = PointCloud::new(vec![[1.0, 2.5, -3.0]], Some(vec![[255, 0, 7]]));
/// let mut buf = Vec::new();
/// write_ply_ascii_to(&mut buf, &cloud).unwrap();
///
/// let text = String::from_utf8(buf).unwrap();
/// assert!(text.starts_with("ply\nformat ascii 1.0\nelement vertex 1\n"));
/// assert!(text.ends_with("end_header\n1.0 2.5 -3.0 255 0 7 0\n"));
/// ```
pub fn write_ply_ascii_to<W: Write>(
    writer: &mut W,
    pointcloud: &PointCloud,
) -> Result<(), PlyError> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", pointcloud.len())?;
    for (data_type, name) in PLY_VERTEX_PROPERTIES {
        writeln!(writer, "property {data_type} {name}")?;
    }
    writeln!(writer, "end_header")?;

    let colors = pointcloud.colors();
    for (i, [x, y, z]) in pointcloud.points().iter().enumerate() {
        let [r, g, b] = colors.and_then(|c| c.get(i)).copied().unwrap_or([0; 3]);
        writeln!(writer, "{x:?} {y:?} {z:?} {r} {g} {b} 0")?;
    }

    Ok(())
}
