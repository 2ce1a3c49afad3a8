use std::path::Path;

use image as image_lib;

use super::{Picture, Pixel};
use crate::error::{BlurError, Result};

/// File extensions accepted by [`Picture::load`] and [`Picture::save`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

fn image_error(path: &Path, source: image_lib::ImageError) -> BlurError {
    match source {
        image_lib::ImageError::IoError(source) => BlurError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => BlurError::Image {
            path: path.to_path_buf(),
            source,
        },
    }
}

impl Picture {
    /// Decodes an image file into an RGB picture. Alpha is discarded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Picture> {
        let path = path.as_ref();
        let img = image_lib::open(path)
            .map_err(|e| image_error(path, e))?
            .into_rgb8();

        let width = img.width() as usize;
        let height = img.height() as usize;
        let pixels = img
            .pixels()
            .map(|p| Pixel::new(p.0[0], p.0[1], p.0[2]))
            .collect();

        tracing::debug!(path = %path.display(), width, height, "Loaded picture");

        Picture::new(width, height, pixels)
    }

    /// Encodes the picture; the format is chosen from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let (width, height) = self.dimensions_u32()?;

        let bytes: Vec<u8> = self
            .pixels()
            .iter()
            .flat_map(|p| [p.red, p.green, p.blue])
            .collect();

        let img = image_lib::RgbImage::from_raw(width, height, bytes).ok_or_else(|| {
            BlurError::InvalidPicture("pixel buffer does not match dimensions".to_string())
        })?;
        img.save(path).map_err(|e| image_error(path, e))?;

        tracing::debug!(path = %path.display(), width, height, "Saved picture");

        Ok(())
    }

    fn dimensions_u32(&self) -> Result<(u32, u32)> {
        let convert = |value: usize| {
            u32::try_from(value).map_err(|_| {
                BlurError::InvalidPicture(format!("dimension {value} does not fit an image file"))
            })
        };
        Ok((convert(self.width())?, convert(self.height())?))
    }
}
