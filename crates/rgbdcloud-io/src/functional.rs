use std::path::Path;

use rgbdcloud_image::{Image, ImageSize};

use crate::error::IoError;

/// A generic image type that can be any of the supported image formats.
#[derive(Debug, Clone)]
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit grayscale image with alpha channel
    La8(Image<u8, 2>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
    /// 16-bit grayscale image
    L16(Image<u16, 1>),
    /// 16-bit grayscale image with alpha channel
    La16(Image<u16, 2>),
    /// 16-bit RGB image
    Rgb16(Image<u16, 3>),
    /// 16-bit RGB image with alpha channel
    Rgba16(Image<u16, 4>),
    /// 32-bit float RGB image
    Rgb32F(Image<f32, 3>),
    /// 32-bit float RGB image with alpha channel
    Rgba32F(Image<f32, 4>),
}

impl GenericImage {
    /// The size of the decoded image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::La8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
            GenericImage::L16(img) => img.size(),
            GenericImage::La16(img) => img.size(),
            GenericImage::Rgb16(img) => img.size(),
            GenericImage::Rgba16(img) => img.size(),
            GenericImage::Rgb32F(img) => img.size(),
            GenericImage::Rgba32F(img) => img.size(),
        }
    }

    /// The number of samples per pixel.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(_) | GenericImage::L16(_) => 1,
            GenericImage::La8(_) | GenericImage::La16(_) => 2,
            GenericImage::Rgb8(_) | GenericImage::Rgb16(_) | GenericImage::Rgb32F(_) => 3,
            GenericImage::Rgba8(_) | GenericImage::Rgba16(_) | GenericImage::Rgba32F(_) => 4,
        }
    }

    /// A short name of the channel layout and sample type, e.g. `"L16"`.
    pub fn color_mode(&self) -> &'static str {
        match self {
            GenericImage::L8(_) => "L8",
            GenericImage::La8(_) => "La8",
            GenericImage::Rgb8(_) => "Rgb8",
            GenericImage::Rgba8(_) => "Rgba8",
            GenericImage::L16(_) => "L16",
            GenericImage::La16(_) => "La16",
            GenericImage::Rgb16(_) => "Rgb16",
            GenericImage::Rgba16(_) => "Rgba16",
            GenericImage::Rgb32F(_) => "Rgb32F",
            GenericImage::Rgba32F(_) => "Rgba32F",
        }
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate.
/// The format is guessed from the file content, not from the extension.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data, tagged with its channel layout.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // open the file and map it to memory
    let file = std::fs::File::open(file_path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    // decode the data directly from memory
    let img = image::ImageReader::new(std::io::Cursor::new(&mmap[..]))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = match img.color() {
        image::ColorType::L8 => GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?),
        image::ColorType::La8 => {
            GenericImage::La8(Image::new(size, img.into_luma_alpha8().into_raw())?)
        }
        image::ColorType::Rgb8 => GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
        image::ColorType::Rgba8 => {
            GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?)
        }
        image::ColorType::L16 => {
            GenericImage::L16(Image::new(size, img.into_luma16().into_raw())?)
        }
        image::ColorType::La16 => {
            GenericImage::La16(Image::new(size, img.into_luma_alpha16().into_raw())?)
        }
        image::ColorType::Rgb16 => {
            GenericImage::Rgb16(Image::new(size, img.into_rgb16().into_raw())?)
        }
        image::ColorType::Rgba16 => {
            GenericImage::Rgba16(Image::new(size, img.into_rgba16().into_raw())?)
        }
        image::ColorType::Rgb32F => {
            GenericImage::Rgb32F(Image::new(size, img.into_rgb32f().into_raw())?)
        }
        image::ColorType::Rgba32F => {
            GenericImage::Rgba32F(Image::new(size, img.into_rgba32f().into_raw())?)
        }
        other => return Err(IoError::UnsupportedImageFormat(format!("{other:?}"))),
    };

    Ok(image)
}
