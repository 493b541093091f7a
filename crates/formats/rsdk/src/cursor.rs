use crate::error::{Error, Result};

/// Byte order of a multi-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Read cursor over a byte slice.
///
/// Multi-byte reads take an explicit [`Endian`]; the two stage generations
/// disagree on byte order, so nothing here assumes a default.
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self, endian: Endian) -> Result<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(match endian {
            Endian::Little => u16::from_le_bytes(bytes),
            Endian::Big => u16::from_be_bytes(bytes),
        })
    }

    pub fn read_i16(&mut self, endian: Endian) -> Result<i16> {
        Ok(self.read_u16(endian)? as i16)
    }

    pub fn read_u32(&mut self, endian: Endian) -> Result<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(match endian {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        })
    }

    pub fn read_i32(&mut self, endian: Endian) -> Result<i32> {
        Ok(self.read_u32(endian)? as i32)
    }

    /// Read a boolean byte. Any nonzero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        let offset = self.pos;
        let v = self.read_u8()?;
        if v > 1 {
            tracing::warn!(offset, value = v, "non-canonical boolean byte treated as true");
        }
        Ok(v != 0)
    }

    /// Read a boolean byte, rejecting anything other than 0 or 1.
    pub fn read_bool_strict(&mut self) -> Result<bool> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::InvalidEnumValue {
                kind: "bool",
                value,
                offset,
            }),
        }
    }

    /// Read a u8 and map it through `from_u8`, failing with
    /// [`Error::InvalidEnumValue`] when it has no mapping.
    pub fn read_enum<T>(&mut self, kind: &'static str, from_u8: impl FnOnce(u8) -> Option<T>) -> Result<T> {
        let offset = self.pos;
        let value = self.read_u8()?;
        from_u8(value).ok_or(Error::InvalidEnumValue {
            kind,
            value,
            offset,
        })
    }

    /// Read an engine string: u8 length, then that many single-byte characters.
    ///
    /// Bytes map one-to-one onto U+0000..=U+00FF, so decoding never fails.
    pub fn read_rsdk_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

/// Writer that builds a byte buffer.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    pub fn write_u16(&mut self, v: u16, endian: Endian) {
        match endian {
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    pub fn write_i16(&mut self, v: i16, endian: Endian) {
        self.write_u16(v as u16, endian);
    }

    pub fn write_u32(&mut self, v: u32, endian: Endian) {
        match endian {
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    pub fn write_i32(&mut self, v: i32, endian: Endian) {
        self.write_u32(v as u32, endian);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    /// Write an engine string: u8 length + one byte per character.
    pub fn write_rsdk_string(&mut self, s: &str) -> Result<()> {
        let mut bytes = Vec::with_capacity(s.len());
        for ch in s.chars() {
            let b = u8::try_from(u32::from(ch)).map_err(|_| Error::UnencodableChar { ch })?;
            bytes.push(b);
        }
        let len = u8::try_from(bytes.len()).map_err(|_| Error::StringTooLong { len: bytes.len() })?;
        self.buf.push(len);
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}
