use bytes::{BufMut, BytesMut};

/// Byte order shared by every multi-byte numeric field on the wire.
///
/// This is a property of the codec instance, not of individual packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Network byte order. What every other OSC implementation speaks.
    #[default]
    BigEndian,
    /// Little-endian, for peers that were configured to swap.
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the machine this code runs on.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }

    pub(crate) fn put_i32(self, dst: &mut BytesMut, value: i32) {
        match self {
            Self::BigEndian => dst.put_i32(value),
            Self::LittleEndian => dst.put_i32_le(value),
        }
    }

    pub(crate) fn put_u32(self, dst: &mut BytesMut, value: u32) {
        match self {
            Self::BigEndian => dst.put_u32(value),
            Self::LittleEndian => dst.put_u32_le(value),
        }
    }

    pub(crate) fn put_i64(self, dst: &mut BytesMut, value: i64) {
        match self {
            Self::BigEndian => dst.put_i64(value),
            Self::LittleEndian => dst.put_i64_le(value),
        }
    }

    pub(crate) fn put_f32(self, dst: &mut BytesMut, value: f32) {
        match self {
            Self::BigEndian => dst.put_f32(value),
            Self::LittleEndian => dst.put_f32_le(value),
        }
    }

    pub(crate) fn put_f64(self, dst: &mut BytesMut, value: f64) {
        match self {
            Self::BigEndian => dst.put_f64(value),
            Self::LittleEndian => dst.put_f64_le(value),
        }
    }

    pub(crate) fn i32_bytes(self, value: i32) -> [u8; 4] {
        match self {
            Self::BigEndian => value.to_be_bytes(),
            Self::LittleEndian => value.to_le_bytes(),
        }
    }

    pub(crate) fn read_i32(self, raw: [u8; 4]) -> i32 {
        match self {
            Self::BigEndian => i32::from_be_bytes(raw),
            Self::LittleEndian => i32::from_le_bytes(raw),
        }
    }

    pub(crate) fn read_u32(self, raw: [u8; 4]) -> u32 {
        match self {
            Self::BigEndian => u32::from_be_bytes(raw),
            Self::LittleEndian => u32::from_le_bytes(raw),
        }
    }

    pub(crate) fn read_i64(self, raw: [u8; 8]) -> i64 {
        match self {
            Self::BigEndian => i64::from_be_bytes(raw),
            Self::LittleEndian => i64::from_le_bytes(raw),
        }
    }

    pub(crate) fn read_f32(self, raw: [u8; 4]) -> f32 {
        match self {
            Self::BigEndian => f32::from_be_bytes(raw),
            Self::LittleEndian => f32::from_le_bytes(raw),
        }
    }

    pub(crate) fn read_f64(self, raw: [u8; 8]) -> f64 {
        match self {
            Self::BigEndian => f64::from_be_bytes(raw),
            Self::LittleEndian => f64::from_le_bytes(raw),
        }
    }
}
