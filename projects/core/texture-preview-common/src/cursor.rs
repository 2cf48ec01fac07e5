//! Bounds-checked, position-tracking reader over an in-memory byte blob.
//!
//! Every header parser and pixel decoder reads through a [`StreamCursor`]. Reads never
//! panic: running past the end yields [`DecodeError::TruncatedStream`] and leaves the
//! position untouched.

use crate::error::{DecodeError, DecodeResult};
use alloc::string::String;
use likely_stable::unlikely;

/// Reader over a borrowed byte slice with an explicit position.
#[derive(Debug, Clone, Copy)]
pub struct StreamCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

macro_rules! read_primitive {
    ($name_le:ident, $name_be:ident, $ty:ty) => {
        #[doc = concat!("Reads a little endian `", stringify!($ty), "` and advances past it.")]
        #[inline]
        pub fn $name_le(&mut self) -> DecodeResult<$ty> {
            let bytes = self.read_array::<{ core::mem::size_of::<$ty>() }>()?;
            Ok(<$ty>::from_le_bytes(bytes))
        }

        #[doc = concat!("Reads a big endian `", stringify!($ty), "` and advances past it.")]
        #[inline]
        pub fn $name_be(&mut self) -> DecodeResult<$ty> {
            let bytes = self.read_array::<{ core::mem::size_of::<$ty>() }>()?;
            Ok(<$ty>::from_be_bytes(bytes))
        }
    };
}

impl<'a> StreamCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total length of the underlying stream.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying stream is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current absolute position.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Bytes left between the current position and the end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The whole underlying stream, independent of the position.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Everything from the current position onwards, without advancing.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Reads `count` bytes and advances past them.
    pub fn read_bytes(&mut self, count: usize) -> DecodeResult<&'a [u8]> {
        if unlikely(count > self.remaining()) {
            return Err(self.truncated(count));
        }
        let start = self.pos;
        self.pos += count;
        Ok(&self.data[start..self.pos])
    }

    /// Returns the next `count` bytes without advancing.
    pub fn peek_bytes(&self, count: usize) -> DecodeResult<&'a [u8]> {
        if unlikely(count > self.remaining()) {
            return Err(self.truncated(count));
        }
        Ok(&self.data[self.pos..self.pos + count])
    }

    /// Reads a fixed size array and advances past it.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    read_primitive!(read_u16_le, read_u16_be, u16);
    read_primitive!(read_u32_le, read_u32_be, u32);
    read_primitive!(read_u64_le, read_u64_be, u64);

    /// Reads bytes up to a NUL terminator, consuming the terminator.
    ///
    /// Bytes are interpreted as Latin-1 so arbitrary data never fails to convert.
    /// A string running to the end of the stream without a terminator is a truncation.
    pub fn read_null_terminated_string(&mut self) -> DecodeResult<String> {
        let rest = self.rest();
        let Some(end) = rest.iter().position(|&b| b == 0) else {
            return Err(self.truncated(rest.len() + 1));
        };
        let text = rest[..end].iter().map(|&b| b as char).collect();
        self.pos += end + 1;
        Ok(text)
    }

    /// Advances by `count` bytes.
    pub fn skip(&mut self, count: usize) -> DecodeResult<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Moves to an absolute position. Seeking to exactly [`Self::len`] is allowed.
    pub fn seek(&mut self, target: usize) -> DecodeResult<()> {
        if unlikely(target > self.data.len()) {
            return Err(DecodeError::SeekOutOfBounds {
                target: target as i64,
                len: self.data.len(),
            });
        }
        self.pos = target;
        Ok(())
    }

    /// Moves relative to the current position.
    pub fn relative_seek(&mut self, delta: i64) -> DecodeResult<()> {
        let target = (self.pos as i64).checked_add(delta);
        match target {
            Some(target) if target >= 0 && target as u64 <= self.data.len() as u64 => {
                self.pos = target as usize;
                Ok(())
            }
            _ => Err(DecodeError::SeekOutOfBounds {
                target: target.unwrap_or(i64::MAX),
                len: self.data.len(),
            }),
        }
    }

    /// A fresh cursor over the same data, positioned at the start.
    ///
    /// The dispatcher hands one of these to every scoring decoder.
    #[inline]
    pub fn fork(&self) -> Self {
        Self::new(self.data)
    }

    fn truncated(&self, needed: usize) -> DecodeError {
        DecodeError::TruncatedStream {
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    const DATA: [u8; 10] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, b'h', 0];

    #[test]
    fn reads_both_endiannesses() {
        let mut cursor = StreamCursor::new(&DATA);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0201);
        assert_eq!(cursor.read_u16_be().unwrap(), 0x0304);
        assert_eq!(cursor.read_u32_le().unwrap(), 0x08070605);
        assert_eq!(cursor.offset(), 8);

        let mut cursor = StreamCursor::new(&DATA);
        assert_eq!(cursor.read_u64_be().unwrap(), 0x0102030405060708);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn truncated_read_fails_without_advancing() {
        let mut cursor = StreamCursor::new(&DATA);
        cursor.seek(8).unwrap();
        let err = cursor.read_u32_le().unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedStream {
                offset: 8,
                needed: 4,
                available: 2
            }
        );
        assert_eq!(cursor.offset(), 8);
    }

    #[test]
    fn null_terminated_string() {
        let mut cursor = StreamCursor::new(&DATA);
        cursor.skip(8).unwrap();
        assert_eq!(cursor.read_null_terminated_string().unwrap(), "h");
        assert_eq!(cursor.remaining(), 0);

        let mut unterminated = StreamCursor::new(&DATA[..9]);
        unterminated.skip(8).unwrap();
        assert!(unterminated.read_null_terminated_string().is_err());
    }

    #[rstest]
    #[case(0, true)]
    #[case(10, true)]
    #[case(11, false)]
    fn absolute_seek_bounds(#[case] target: usize, #[case] ok: bool) {
        let mut cursor = StreamCursor::new(&DATA);
        assert_eq!(cursor.seek(target).is_ok(), ok);
    }

    #[rstest]
    #[case(4, -4, Some(0))]
    #[case(4, 6, Some(10))]
    #[case(4, -5, None)]
    #[case(4, 7, None)]
    #[case(4, i64::MAX, None)]
    fn relative_seek_bounds(#[case] start: usize, #[case] delta: i64, #[case] end: Option<usize>) {
        let mut cursor = StreamCursor::new(&DATA);
        cursor.seek(start).unwrap();
        match end {
            Some(expected) => {
                cursor.relative_seek(delta).unwrap();
                assert_eq!(cursor.offset(), expected);
            }
            None => {
                assert!(cursor.relative_seek(delta).is_err());
                assert_eq!(cursor.offset(), start);
            }
        }
    }

    #[test]
    fn fork_restarts_at_zero() {
        let mut cursor = StreamCursor::new(&DATA);
        cursor.skip(3).unwrap();
        let fork = cursor.fork();
        assert_eq!(fork.offset(), 0);
        assert_eq!(fork.len(), DATA.len());
        assert_eq!(cursor.peek_bytes(2).unwrap(), &[0x04, 0x05]);
    }
}
