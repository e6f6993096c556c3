use std::io::BufRead;
use std::path::Path;

use super::{properties::PlyPropertyDefinition, PlyError};
use crate::pointcloud::PointCloud;

struct PlyHeader {
    pub vertex_count: usize,
    pub properties: Vec<PlyPropertyDefinition>,
}

impl PlyHeader {
    fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut vertex_count = None;
    let mut is_ascii = false;
    let mut properties = Vec::new();

    if reader.read_line(&mut line)? == 0 || line.trim() != "ply" {
        return Err(PlyError::UnsupportedFormat("missing 'ply' magic".to_string()));
    }

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::Parse("missing end_header".to_string()));
        }
        let trimmed = line.trim();

        if trimmed == "end_header" {
            break;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        match parts.as_slice() {
            ["format", "ascii", _] => is_ascii = true,
            ["format", other, ..] => {
                return Err(PlyError::UnsupportedFormat(format!("format {other}")));
            }
            ["element", "vertex", count] => {
                vertex_count = Some(count.parse::<usize>().map_err(|e| {
                    PlyError::Parse(format!("invalid vertex count '{count}': {e}"))
                })?);
            }
            ["element", other, ..] => {
                return Err(PlyError::UnsupportedFormat(format!("element {other}")));
            }
            ["property", "list", ..] => {
                return Err(PlyError::UnsupportedFormat("list property".to_string()));
            }
            ["property", data_type, name] => {
                properties.push(PlyPropertyDefinition {
                    name: name.to_string(),
                    data_type: data_type.parse()?,
                });
            }
            _ => continue,
        }
    }

    if !is_ascii {
        return Err(PlyError::UnsupportedFormat("missing format line".to_string()));
    }

    let vertex_count =
        vertex_count.ok_or_else(|| PlyError::Parse("missing vertex element".to_string()))?;

    Ok(PlyHeader {
        vertex_count,
        properties,
    })
}

/// Read an ASCII PLY file into a point cloud.
///
/// The vertices must declare `x`, `y` and `z`. Colors are read when the
/// vertices also declare `red`, `green` and `blue` as integer properties;
/// any other property is parsed for validation and then ignored.
///
/// # Errors
///
/// [`PlyError::Parse`] if the number of vertex lines differs from the
/// declared vertex count, or if a line does not hold one value per property.
pub fn read_ply_ascii(path: impl AsRef<Path>) -> Result<PointCloud, PlyError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let header = parse_header(&mut reader)?;

    let [ix, iy, iz] = ["x", "y", "z"].map(|name| header.position(name));
    let (Some(ix), Some(iy), Some(iz)) = (ix, iy, iz) else {
        return Err(PlyError::UnsupportedFormat(
            "vertices without x, y, z".to_string(),
        ));
    };
    let color_index = match ["red", "green", "blue"].map(|name| header.position(name)) {
        [Some(r), Some(g), Some(b)]
            if [r, g, b]
                .iter()
                .all(|&i| header.properties[i].data_type.is_integer()) =>
        {
            Some([r, g, b])
        }
        _ => None,
    };

    let mut points = Vec::with_capacity(header.vertex_count);
    let mut colors = Vec::with_capacity(header.vertex_count);
    let mut values = Vec::with_capacity(header.properties.len());

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if points.len() == header.vertex_count {
            return Err(PlyError::Parse(format!(
                "more vertex lines than the declared {}",
                header.vertex_count
            )));
        }

        values.clear();
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|e| {
                PlyError::Parse(format!("data line {}: '{token}': {e}", line_number + 1))
            })?;
            values.push(value);
        }
        if values.len() != header.properties.len() {
            return Err(PlyError::Parse(format!(
                "data line {}: expected {} values, found {}",
                line_number + 1,
                header.properties.len(),
                values.len()
            )));
        }

        points.push([values[ix], values[iy], values[iz]]);
        if let Some(index) = color_index {
            colors.push(index.map(|i| values[i].clamp(0.0, 255.0) as u8));
        }
    }

    if points.len() != header.vertex_count {
        return Err(PlyError::Parse(format!(
            "declared {} vertices, found {}",
            header.vertex_count,
            points.len()
        )));
    }

    Ok(PointCloud::new(points, color_index.map(|_| colors)))
}
