mod io;


use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{BlurError, Result};

pub use io::SUPPORTED_EXTENSIONS;

/// One RGB sample, eight bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }
}

/// A dense, row-major W×H grid of pixels.
///
/// Coordinates are `(i, j)`: `i` is the column in `0..width`, `j` the row in
/// `0..height`. The outermost ring of pixels is the border; everything else is
/// the interior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl Picture {
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BlurError::InvalidPicture(format!(
                "dimensions must be at least 1x1, got {width}x{height}"
            )));
        }
        if pixels.len() != width * height {
            return Err(BlurError::InvalidPicture(format!(
                "pixel count {} does not match {width}x{height}",
                pixels.len()
            )));
        }

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn new_filled(width: usize, height: usize, pixel: Pixel) -> Result<Self> {
        Self::new(width, height, vec![pixel; width * height])
    }

    /// Builds a picture by evaluating `f(i, j)` for every coordinate.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        let mut pixels = Vec::with_capacity(width * height);
        for j in 0..height {
            for i in 0..width {
                pixels.push(f(i, j));
            }
        }
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Offset of `(i, j)` in the row-major pixel store.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the picture.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.width && j < self.height,
            "({i}, {j}) out of bounds for {}x{} picture",
            self.width,
            self.height
        );
        j * self.width + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Pixel {
        self.pixels[self.index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, pixel: Pixel) {
        let idx = self.index(i, j);
        self.pixels[idx] = pixel;
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }

    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.width || j + 1 == self.height
    }

    /// Number of interior pixels, i.e. valid 3x3 blur centers.
    pub fn interior_len(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }

    /// Counts pixels that differ between two pictures of equal size.
    ///
    /// # Panics
    /// Panics if the pictures have different dimensions.
    pub fn diff_count(&self, other: &Picture) -> usize {
        assert_eq!(self.width, other.width, "width mismatch");
        assert_eq!(self.height, other.height, "height mismatch");

        self.pixels
            .iter()
            .zip(other.pixels.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl Index<(usize, usize)> for Picture {
    type Output = Pixel;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.pixels[Picture::index(self, i, j)]
    }
}

impl IndexMut<(usize, usize)> for Picture {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let idx = Picture::index(self, i, j);
        &mut self.pixels[idx]
    }
}
