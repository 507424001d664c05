use crate::error::{DepixError, Result};
use crate::geometry::GridPos;
use rgb::{RGB8, RGBA8};

/// A rectangular grid of RGB pixels, row-major. Width and height are
/// always greater than zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<RGB8>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, pixels: Vec<RGB8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if pixels.len() != expected {
            return Err(DepixError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid by asking `color(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut color: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> RGB8,
    {
        check_dimensions(width, height)?;
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(color(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid from decoded RGBA pixels. Alpha is dropped.
    pub fn from_rgba(width: usize, height: usize, pixels: &[RGBA8]) -> Result<Self> {
        Self::new(width, height, pixels.iter().map(|p| p.rgb()).collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<RGB8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Colour at `pos`, which must be inside the grid.
    pub(crate) fn color(&self, pos: GridPos) -> RGB8 {
        debug_assert!(self.contains(pos), "{pos:?} outside {}x{}", self.width, self.height);
        self.pixels[pos.y as usize * self.width + pos.x as usize]
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(DepixError::InvalidDimensions { width, height });
    }
    Ok(())
}
