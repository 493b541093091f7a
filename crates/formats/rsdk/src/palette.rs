use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, Writer};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A run of RGB palette entries, stored as 3 bytes per colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<Color>,
}

impl Palette {
    pub const COLORS_PER_ROW: usize = 16;

    /// `rows` rows of black.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            colors: vec![Color::default(); rows * Self::COLORS_PER_ROW],
        }
    }

    /// Read `rows` rows of [`Palette::COLORS_PER_ROW`] colours.
    pub fn read(c: &mut Cursor<'_>, rows: usize) -> Result<Self> {
        let count = rows * Self::COLORS_PER_ROW;
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let rgb = c.read_bytes(3)?;
            colors.push(Color::new(rgb[0], rgb[1], rgb[2]));
        }
        Ok(Self { colors })
    }

    /// Write exactly `rows` rows. The record has no length field, so any
    /// other colour count is an error rather than misaligned output.
    pub fn write(&self, w: &mut Writer, rows: usize) -> Result<()> {
        let expected = rows * Self::COLORS_PER_ROW;
        if self.colors.len() != expected {
            return Err(Error::PaletteSize {
                expected,
                found: self.colors.len(),
            });
        }
        for color in &self.colors {
            w.write_bytes(&[color.r, color.g, color.b]);
        }
        Ok(())
    }

    /// Number of complete rows held.
    pub fn rows(&self) -> usize {
        self.colors.len() / Self::COLORS_PER_ROW
    }
}
