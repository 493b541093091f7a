use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;

/// A 16.16 fixed-point coordinate. The raw value 65536 is 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ONE: Self = Self(1 << 16);

    /// Whole-unit value with no fractional part.
    pub fn from_int(v: i16) -> Self {
        Self((v as i32) << 16)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.0
    }

    /// Convert from floating point, truncating toward zero.
    ///
    /// Existing assets were authored with truncation, so repeated float
    /// round trips drift; values outside the i32 range saturate.
    pub fn from_f32(v: f32) -> Self {
        Self((v * 65536.0) as i32)
    }

    /// Whole-unit part as stored by v3 records (the high 16 bits).
    pub fn high16(self) -> i16 {
        (self.0 >> 16) as i16
    }

    /// Read a v3 coordinate: signed high byte, unsigned low byte, shifted
    /// back to 16.16. The low 16 bits are always zero.
    pub(crate) fn read_v3(c: &mut Cursor<'_>) -> Result<Self> {
        let hi = c.read_i8()? as i32;
        let lo = c.read_u8()? as i32;
        let whole = ((hi << 8) | lo) as i16;
        Ok(Self((whole as i32) << 16))
    }

    pub(crate) fn write_v3(self, w: &mut Writer) {
        w.write_u8((self.0 >> 24) as u8);
        w.write_u8(((self.0 >> 16) & 0xFF) as u8);
    }

    /// Read a v4 coordinate: the full 16.16 value as a little-endian i32.
    pub(crate) fn read_v4(c: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self(c.read_i32(Endian::Little)?))
    }

    pub(crate) fn write_v4(self, w: &mut Writer) {
        w.write_i32(self.0, Endian::Little);
    }
}

impl From<i32> for Fixed {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}
