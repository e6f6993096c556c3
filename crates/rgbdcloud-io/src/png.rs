use std::{fs, fs::File, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder};
use rgbdcloud_image::{Image, ImageSize};

use crate::{
    conv_utils::{convert_buf_u16_u8, convert_buf_u8_u16},
    error::IoError,
};

/// Read a PNG image with a single channel (mono8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Grayscale, BitDepth::Eight)?;
    Ok(Image::new(size.into(), buf)?)
}

/// Read a PNG image with a three channels (rgb8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_png_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Rgb, BitDepth::Eight)?;
    Ok(Image::new(size.into(), buf)?)
}

/// Read a PNG image with a single channel (mono16).
///
/// Depth maps are usually stored this way, one unsigned 16-bit sample per pixel.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono16).
pub fn read_image_png_mono16(file_path: impl AsRef<Path>) -> Result<Image<u16, 1>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Grayscale, BitDepth::Sixteen)?;
    let buf_u16 = convert_buf_u8_u16(buf);

    Ok(Image::new(size.into(), buf_u16)?)
}

// utility function to read the png file
fn read_png_impl(
    file_path: impl AsRef<Path>,
    color_type: ColorType,
    bit_depth: BitDepth,
) -> Result<(Vec<u8>, [usize; 2]), IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    match file_path.extension() {
        Some(extension) if extension.eq_ignore_ascii_case("png") => {}
        _ => return Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }

    let file = fs::File::open(file_path)?;
    let mut reader = Decoder::new(file)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.color_type != color_type || info.bit_depth != bit_depth {
        return Err(IoError::PngDecodeError(format!(
            "expected {:?} {:?}, found {:?} {:?}",
            color_type, bit_depth, info.color_type, info.bit_depth
        )));
    }

    buf.truncate(info.buffer_size());

    Ok((buf, [info.width as usize, info.height as usize]))
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgba,
    )
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Grayscale,
    )
}

/// Writes the given PNG _(grayscale 16-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray16(
    file_path: impl AsRef<Path>,
    image: &Image<u16, 1>,
) -> Result<(), IoError> {
    let image_size = image.size();
    let image_buf = convert_buf_u16_u8(image.as_slice());

    write_png_impl(
        file_path,
        &image_buf,
        image_size,
        BitDepth::Sixteen,
        ColorType::Grayscale,
    )
}

/// Writes the given PNG _(grayscale with alpha 16-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray_alpha16(
    file_path: impl AsRef<Path>,
    image: &Image<u16, 2>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        &convert_buf_u16_u8(image.as_slice()),
        image.size(),
        BitDepth::Sixteen,
        ColorType::GrayscaleAlpha,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;

    #[test]
    fn read_write_png_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgb8.png");

        let image = Image::<u8, 3>::new([2, 2].into(), (0..12).collect())?;
        write_image_png_rgb8(&file_path, &image)?;

        let image_back = read_image_png_rgb8(&file_path)?;
        assert_eq!(image_back.cols(), 2);
        assert_eq!(image_back.rows(), 2);
        assert_eq!(image_back.num_channels(), 3);
        assert_eq!(image_back.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn read_write_png_mono16() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("depth.png");

        let image = Image::<u16, 1>::new([3, 1].into(), vec![0, 5000, 65535])?;
        write_image_png_gray16(&file_path, &image)?;

        let image_back = read_image_png_mono16(&file_path)?;
        assert_eq!(image_back.size(), image.size());
        assert_eq!(image_back.as_slice(), &[0, 5000, 65535]);

        Ok(())
    }

    #[test]
    fn read_png_wrong_layout() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray8.png");

        let image = Image::<u8, 1>::new([2, 1].into(), vec![7, 9])?;
        write_image_png_gray8(&file_path, &image)?;

        assert_eq!(read_image_png_mono8(&file_path)?.as_slice(), &[7, 9]);
        assert!(matches!(
            read_image_png_mono16(&file_path),
            Err(IoError::PngDecodeError(_))
        ));

        Ok(())
    }

    #[test]
    fn read_png_missing_or_bad_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let missing = tmp_dir.path().join("missing.png");
        assert!(matches!(
            read_image_png_rgb8(&missing),
            Err(IoError::FileDoesNotExist(_))
        ));

        let not_png = tmp_dir.path().join("image.txt");
        std::fs::write(&not_png, b"not an image")?;
        assert!(matches!(
            read_image_png_rgb8(&not_png),
            Err(IoError::InvalidFileExtension(_))
        ));

        Ok(())
    }
}
