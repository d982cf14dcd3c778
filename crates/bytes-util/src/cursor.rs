use std::ops::{Deref, DerefMut};

use byteorder::{BigEndian, ByteOrder};

use crate::CursorError;

/// A read cursor over a borrowed byte buffer.
///
/// The cursor never owns the buffer, it only tracks a position inside it.
/// All integer reads are big-endian.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The whole underlying buffer, regardless of the current position.
    pub fn get_ref(&self) -> &'a [u8] {
        self.buf
    }

    /// Number of bytes between the current position and the end of the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Number of bytes consumed since the start of the buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns `true` if there is nothing left to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Returns `true` if at least `n` bytes are left.
    #[inline]
    pub fn has_at_least(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    fn ensure(&self, n: usize) -> Result<(), CursorError> {
        if self.has_at_least(n) {
            Ok(())
        } else {
            Err(CursorError::InsufficientBytes {
                needed: n,
                available: self.remaining(),
            })
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        self.ensure(n)?;

        let buf = self.buf;
        let slice = &buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Read a big-endian 24-bit unsigned integer.
    pub fn read_u24(&mut self) -> Result<u32, CursorError> {
        Ok(BigEndian::read_u24(self.take(3)?))
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Read a big-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    /// Read a big-endian `i16`.
    pub fn read_i16(&mut self) -> Result<i16, CursorError> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    /// Read a big-endian IEEE-754 double.
    pub fn read_f64(&mut self) -> Result<f64, CursorError> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    /// Borrow the next `n` bytes without copying them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        self.take(n)
    }

    /// Copy the next `n` bytes into an owned string.
    ///
    /// The bytes must be valid UTF-8. On error the cursor does not move.
    pub fn read_string(&mut self, n: usize) -> Result<String, CursorError> {
        self.ensure(n)?;

        let text = std::str::from_utf8(&self.buf[self.pos..self.pos + n])?;
        self.pos += n;
        Ok(text.to_owned())
    }

    /// Copy the next `n` bytes into an owned string, replacing invalid UTF-8
    /// sequences with `U+FFFD`.
    pub fn read_string_lossy(&mut self, n: usize) -> Result<String, CursorError> {
        Ok(String::from_utf8_lossy(self.take(n)?).into_owned())
    }

    /// Move the cursor by `delta` bytes, backwards if `delta` is negative.
    ///
    /// # Panics
    ///
    /// Panics if the new position would fall before the start or after the
    /// end of the buffer. Callers check [`remaining`](Self::remaining) or
    /// [`offset`](Self::offset) first.
    pub fn skip(&mut self, delta: isize) {
        match self.pos.checked_add_signed(delta) {
            Some(pos) if pos <= self.buf.len() => self.pos = pos,
            _ => panic!(
                "skip by {delta} from offset {} is out of bounds (len {})",
                self.pos,
                self.buf.len()
            ),
        }
    }

    /// Limit reading to the next `len` bytes.
    ///
    /// The returned guard dereferences to a cursor that only sees those `len`
    /// bytes. When the guard is dropped this cursor lands exactly `len` bytes
    /// past its current position, no matter how much of the sub cursor was
    /// consumed or how the scope was left.
    pub fn sub_cursor(&mut self, len: usize) -> Result<SubCursor<'_, 'a>, CursorError> {
        self.ensure(len)?;

        let buf = self.buf;
        let inner = ByteCursor::new(&buf[self.pos..self.pos + len]);
        Ok(SubCursor {
            parent: self,
            inner,
            len,
        })
    }
}

/// A cursor limited to a window of its parent.
///
/// Created by [`ByteCursor::sub_cursor`]. Dropping it commits the parent
/// position to the end of the window.
#[derive(Debug)]
pub struct SubCursor<'c, 'a> {
    parent: &'c mut ByteCursor<'a>,
    inner: ByteCursor<'a>,
    len: usize,
}

impl SubCursor<'_, '_> {
    /// Offset of the window start within the parent buffer.
    pub fn start_offset(&self) -> usize {
        self.parent.offset()
    }

    /// Size of the window.
    pub fn window_len(&self) -> usize {
        self.len
    }
}

impl<'a> Deref for SubCursor<'_, 'a> {
    type Target = ByteCursor<'a>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SubCursor<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Drop for SubCursor<'_, '_> {
    fn drop(&mut self) {
        // `sub_cursor` checked that the window fits.
        self.parent.pos += self.len;
    }
}

/// A write cursor over a borrowed, fixed-size byte buffer.
///
/// Writes never grow the buffer. All integer writes are big-endian.
#[derive(Debug)]
pub struct ByteCursorMut<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteCursorMut<'a> {
    /// Create a new cursor positioned at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes that can still be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Number of bytes written (or skipped) since the start of the buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns `true` if the buffer is full.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Returns `true` if at least `n` more bytes fit.
    #[inline]
    pub fn has_at_least(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    fn reserve(&mut self, n: usize) -> Result<&mut [u8], CursorError> {
        if !self.has_at_least(n) {
            return Err(CursorError::InsufficientBytes {
                needed: n,
                available: self.remaining(),
            });
        }

        let start = self.pos;
        self.pos += n;
        Ok(&mut self.buf[start..start + n])
    }

    /// Write one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), CursorError> {
        self.reserve(1)?[0] = value;
        Ok(())
    }

    /// Write a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> Result<(), CursorError> {
        BigEndian::write_u16(self.reserve(2)?, value);
        Ok(())
    }

    /// Write the low 24 bits of `value`, big-endian.
    pub fn write_u24(&mut self, value: u32) -> Result<(), CursorError> {
        BigEndian::write_u24(self.reserve(3)?, value & 0x00FF_FFFF);
        Ok(())
    }

    /// Write a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> Result<(), CursorError> {
        BigEndian::write_u32(self.reserve(4)?, value);
        Ok(())
    }

    /// Write a big-endian `u64`.
    pub fn write_u64(&mut self, value: u64) -> Result<(), CursorError> {
        BigEndian::write_u64(self.reserve(8)?, value);
        Ok(())
    }

    /// Write a big-endian `i16`.
    pub fn write_i16(&mut self, value: i16) -> Result<(), CursorError> {
        BigEndian::write_i16(self.reserve(2)?, value);
        Ok(())
    }

    /// Write a big-endian IEEE-754 double.
    pub fn write_f64(&mut self, value: f64) -> Result<(), CursorError> {
        BigEndian::write_f64(self.reserve(8)?, value);
        Ok(())
    }

    /// Copy `bytes` into the buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CursorError> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Move the cursor by `delta` bytes, backwards if `delta` is negative.
    ///
    /// # Panics
    ///
    /// Panics if the new position would fall outside the buffer.
    pub fn skip(&mut self, delta: isize) {
        match self.pos.checked_add_signed(delta) {
            Some(pos) if pos <= self.buf.len() => self.pos = pos,
            _ => panic!(
                "skip by {delta} from offset {} is out of bounds (len {})",
                self.pos,
                self.buf.len()
            ),
        }
    }
}
