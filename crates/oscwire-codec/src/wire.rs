//! Cursor and alignment primitives shared by every field reader and writer.

use bytes::{BufMut, BytesMut};

use crate::byte_order::ByteOrder;
use crate::error::{CodecError, Result};

/// Pads `dst` with NUL bytes so that the bytes written since `start` end on
/// the next 4-byte boundary.
///
/// An already aligned field still receives a full word of padding, which is
/// what guarantees every string and blob is NUL-terminated on the wire.
pub(crate) fn pad_null(dst: &mut BytesMut, start: usize) {
    let written = dst.len() - start;
    dst.put_bytes(0, 4 - written % 4);
}

/// Bounded read cursor over a fully buffered packet.
///
/// Positions are absolute offsets into `buf`; `end` bounds every read, so a
/// nested packet can never read into its sibling.
#[derive(Debug)]
pub(crate) struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
    order: ByteOrder,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(buf: &'a [u8], pos: usize, end: usize, order: ByteOrder) -> Result<Self> {
        if end > buf.len() || pos > end {
            return Err(CodecError::malformed(pos, "cursor outside input"));
        }
        Ok(Self {
            buf,
            pos,
            end,
            order,
        })
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn has_remaining(&self) -> bool {
        self.pos < self.end
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        if self.has_remaining() {
            Some(self.buf[self.pos])
        } else {
            None
        }
    }

    /// A cursor over `[pos, end)` that shares this cursor's byte order.
    pub(crate) fn bounded(&self, end: usize) -> Result<Self> {
        if end > self.end {
            return Err(CodecError::malformed(
                self.pos,
                "nested packet length exceeds remaining input",
            ));
        }
        Self::new(self.buf, self.pos, end, self.order)
    }

    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
    }

    pub(crate) fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let raw = self.take_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(raw);
        Ok(out)
    }

    pub(crate) fn take_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let stop = self
            .pos
            .checked_add(len)
            .filter(|stop| *stop <= self.end)
            .ok_or_else(|| CodecError::malformed(self.pos, "unexpected end of input"))?;
        let slice = &self.buf[self.pos..stop];
        self.pos = stop;
        Ok(slice)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        let raw = self.take::<4>()?;
        Ok(self.order.read_i32(raw))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let raw = self.take::<4>()?;
        Ok(self.order.read_u32(raw))
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        let raw = self.take::<8>()?;
        Ok(self.order.read_i64(raw))
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        let raw = self.take::<4>()?;
        Ok(self.order.read_f32(raw))
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        let raw = self.take::<8>()?;
        Ok(self.order.read_f64(raw))
    }

    /// Reads a NUL-terminated ASCII string and skips to the next 4-byte boundary.
    pub(crate) fn read_string(&mut self) -> Result<String> {
        let window = &self.buf[self.pos..self.end];
        let len = window
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| CodecError::malformed(self.pos, "unterminated string"))?;
        let text = window[..len]
            .iter()
            .map(|b| if b.is_ascii() { char::from(*b) } else { '?' })
            .collect();
        self.skip_terminated(len);
        Ok(text)
    }

    /// Moves past `len` content bytes plus one terminator, then rounds up to a
    /// multiple of four.
    ///
    /// Blobs go through this as well even though they carry no terminator.
    pub(crate) fn skip_terminated(&mut self, len: usize) {
        let next = self.pos.saturating_add(len).saturating_add(1);
        let aligned = next.saturating_add(3) / 4 * 4;
        self.seek(aligned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_adds_full_word_when_aligned() {
        let mut buf = BytesMut::from(&b"/abc"[..]);
        pad_null(&mut buf, 0);
        assert_eq!(&buf[..], b"/abc\0\0\0\0");
    }

    #[test]
    fn pad_is_relative_to_start() {
        let mut buf = BytesMut::from(&b"xx/a"[..]);
        pad_null(&mut buf, 2);
        assert_eq!(buf.len(), 6);
        assert_eq!(&buf[2..], b"/a\0\0");
    }

    #[test]
    fn read_string_skips_padding() {
        let data = b"/ab\0,i\0\0";
        let mut cursor = ByteCursor::new(data, 0, data.len(), ByteOrder::BigEndian).unwrap();
        assert_eq!(cursor.read_string().unwrap(), "/ab");
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read_string().unwrap(), ",i");
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn unterminated_string_is_malformed() {
        let data = b"/abc";
        let mut cursor = ByteCursor::new(data, 0, data.len(), ByteOrder::BigEndian).unwrap();
        assert!(matches!(
            cursor.read_string(),
            Err(CodecError::Malformed { offset: 0, .. })
        ));
    }

    #[test]
    fn fixed_read_past_end_is_malformed() {
        let data = [0u8; 3];
        let mut cursor = ByteCursor::new(&data, 0, 3, ByteOrder::BigEndian).unwrap();
        assert!(matches!(
            cursor.read_i32(),
            Err(CodecError::Malformed { .. })
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn bounded_cursor_rejects_overrun() {
        let data = [0u8; 8];
        let cursor = ByteCursor::new(&data, 0, 4, ByteOrder::BigEndian).unwrap();
        assert!(cursor.bounded(8).is_err());
        let inner = cursor.bounded(2).unwrap();
        assert_eq!(inner.end(), 2);
    }

    #[test]
    fn skip_clamps_at_end() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data, 4, 8, ByteOrder::BigEndian).unwrap();
        cursor.skip_terminated(4);
        assert_eq!(cursor.position(), 8);
        assert!(!cursor.has_remaining());
    }
}
