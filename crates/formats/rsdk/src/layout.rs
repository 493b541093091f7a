use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::{Error, Result};

/// The blank chunk.
pub const EMPTY_CHUNK: u16 = 0;

/// Foreground chunk layout: `height` rows of `width` 128x128 chunk indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayout {
    width: u8,
    height: u8,
    rows: Vec<Vec<u16>>,
}

impl TileLayout {
    /// A layout of the given size filled with [`EMPTY_CHUNK`].
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![EMPTY_CHUNK; width as usize]; height as usize],
        }
    }

    /// Width in chunks.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Height in chunks.
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn rows(&self) -> &[Vec<u16>] {
        &self.rows
    }

    /// Mutable row access. Rows may be edited freely; changing a row's length
    /// makes encoding fail until [`TileLayout::resize`] or a fix restores it.
    pub fn rows_mut(&mut self) -> &mut [Vec<u16>] {
        &mut self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Set one cell. Returns `false` if the position is out of bounds.
    pub fn set(&mut self, x: usize, y: usize, chunk: u16) -> bool {
        match self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                *cell = chunk;
                true
            }
            None => false,
        }
    }

    /// Resize to `width` x `height`.
    ///
    /// New rows are first created at the old width, then every row is resized
    /// to the new width. Added cells are [`EMPTY_CHUNK`]; shrinking drops
    /// trailing rows and columns.
    pub fn resize(&mut self, width: u8, height: u8) {
        let old_width = self.width as usize;
        self.width = width;
        self.height = height;

        self.rows
            .resize_with(height as usize, || vec![EMPTY_CHUNK; old_width]);
        for row in &mut self.rows {
            row.resize(width as usize, EMPTY_CHUNK);
        }
    }

    /// Check that the row count and every row length match the stored size.
    pub fn validate(&self) -> Result<()> {
        if self.rows.len() != self.height as usize {
            return Err(Error::DimensionMismatch {
                row: self.rows.len().min(self.height as usize),
                expected: self.width as usize,
                found: 0,
            });
        }
        for (row, cells) in self.rows.iter().enumerate() {
            if cells.len() != self.width as usize {
                return Err(Error::DimensionMismatch {
                    row,
                    expected: self.width as usize,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }

    /// Read `height` rows of `width` u16 cells in the given byte order.
    pub(crate) fn read(c: &mut Cursor<'_>, width: u8, height: u8, endian: Endian) -> Result<Self> {
        let mut rows = Vec::with_capacity(height as usize);
        for _ in 0..height {
            let mut row = Vec::with_capacity(width as usize);
            for _ in 0..width {
                row.push(c.read_u16(endian)?);
            }
            rows.push(row);
        }
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    pub(crate) fn write(&self, w: &mut Writer, endian: Endian) -> Result<()> {
        self.validate()?;
        for row in &self.rows {
            for &cell in row {
                w.write_u16(cell, endian);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u8, height: u8) -> TileLayout {
        let mut layout = TileLayout::new(width, height);
        for y in 0..height as usize {
            for x in 0..width as usize {
                layout.set(x, y, (y * 16 + x + 1) as u16);
            }
        }
        layout
    }

    #[test]
    fn grow_both_dimensions_keeps_rows_uniform() {
        let mut layout = numbered(2, 2);
        layout.resize(5, 4);
        assert_eq!(layout.rows().len(), 4);
        assert!(layout.rows().iter().all(|r| r.len() == 5));
        assert_eq!(layout.get(1, 1), Some(18));
        assert_eq!(layout.get(4, 3), Some(EMPTY_CHUNK));
        assert_eq!(layout.get(2, 0), Some(EMPTY_CHUNK));
        layout.validate().unwrap();
    }

    #[test]
    fn shrink_then_regrow_does_not_leak() {
        let mut layout = numbered(2, 2);
        layout.resize(4, 1);
        assert_eq!(layout.rows().to_vec(), vec![vec![1u16, 2, 0, 0]]);

        layout.resize(2, 2);
        assert_eq!(layout.get(0, 0), Some(1));
        assert_eq!(layout.get(1, 0), Some(2));
        // Row 1 was dropped by the shrink; it comes back blank.
        assert_eq!(layout.get(0, 1), Some(EMPTY_CHUNK));
        assert_eq!(layout.get(1, 1), Some(EMPTY_CHUNK));
        assert_eq!(layout.get(2, 0), None);
    }

    #[test]
    fn set_out_of_bounds() {
        let mut layout = TileLayout::new(1, 1);
        assert!(!layout.set(1, 0, 7));
        assert!(!layout.set(0, 1, 7));
        assert!(layout.set(0, 0, 7));
        assert_eq!(layout.get(0, 0), Some(7));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let mut layout = TileLayout::new(3, 2);
        layout.rows_mut()[1].pop();
        assert!(matches!(
            layout.validate(),
            Err(Error::DimensionMismatch {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
        let mut w = Writer::new();
        assert!(layout.write(&mut w, Endian::Big).is_err());
    }

    #[test]
    fn cell_byte_order() {
        let mut layout = TileLayout::new(1, 1);
        layout.set(0, 0, 0x1234);

        let mut w = Writer::new();
        layout.write(&mut w, Endian::Big).unwrap();
        assert_eq!(w.into_bytes(), [0x12, 0x34]);

        let mut w = Writer::new();
        layout.write(&mut w, Endian::Little).unwrap();
        assert_eq!(w.into_bytes(), [0x34, 0x12]);
    }
}
