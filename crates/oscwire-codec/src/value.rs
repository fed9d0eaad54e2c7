//! Argument values and their wire encoding.
//!
//! | argument            | tag   | payload                                  |
//! |---------------------|-------|------------------------------------------|
//! | `Int`               | `i`   | 4 bytes                                  |
//! | `Long`              | `h`   | 8 bytes                                  |
//! | `Float` (finite)    | `f`   | 4 bytes                                  |
//! | `Float` (+infinity) | `I`   | none                                     |
//! | `Double`            | `d`   | 8 bytes                                  |
//! | `String`            | `s`   | ASCII bytes, NUL padded to 4             |
//! | `Blob`              | `b`   | 4-byte length, raw bytes, NUL padded     |
//! | `TimeTag`           | `t`   | 8 bytes                                  |
//! | `Char`              | `c`   | code point as 4-byte integer             |
//! | `Color`             | `r`   | not encodable                            |
//! | `True` / `False`    | `T`/`F` | none                                   |
//! | `Nil`               | `N`   | none                                     |

use bytes::{BufMut, Bytes, BytesMut};

use crate::byte_order::ByteOrder;
use crate::error::{CodecError, Result};
use crate::tags;
use crate::time_tag::TimeTag;
use crate::wire::{pad_null, ByteCursor};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A single typed message argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Blob(Bytes),
    TimeTag(TimeTag),
    Char(char),
    Color(Color),
    True,
    False,
    Nil,
}

impl Argument {
    /// The type-tag character announcing this argument.
    pub fn type_tag(&self) -> char {
        match self {
            Self::Int(_) => tags::INT32,
            Self::Long(_) => tags::INT64,
            Self::Float(v) if *v == f32::INFINITY => tags::INFINITUM,
            Self::Float(_) => tags::FLOAT32,
            Self::Double(_) => tags::FLOAT64,
            Self::String(_) => tags::STRING,
            Self::Blob(_) => tags::BLOB,
            Self::TimeTag(_) => tags::TIME_TAG,
            Self::Char(_) => tags::CHAR,
            Self::Color(_) => tags::COLOR,
            Self::True => tags::TRUE,
            Self::False => tags::FALSE,
            Self::Nil => tags::NIL,
        }
    }

    /// Human-readable kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int32",
            Self::Long(_) => "int64",
            Self::Float(_) => "float32",
            Self::Double(_) => "float64",
            Self::String(_) => "string",
            Self::Blob(_) => "blob",
            Self::TimeTag(_) => "time tag",
            Self::Char(_) => "char",
            Self::Color(_) => "color",
            Self::True | Self::False => "bool",
            Self::Nil => "nil",
        }
    }

    /// Append this argument's payload to `dst`.
    ///
    /// Strings and blobs are padded relative to `start`, the offset where the
    /// enclosing packet began.
    pub(crate) fn encode_into(
        &self,
        order: ByteOrder,
        dst: &mut BytesMut,
        start: usize,
    ) -> Result<()> {
        match self {
            Self::Int(v) => order.put_i32(dst, *v),
            Self::Long(v) => order.put_i64(dst, *v),
            Self::Float(v) if *v == f32::INFINITY => {}
            Self::Float(v) => order.put_f32(dst, *v),
            Self::Double(v) => order.put_f64(dst, *v),
            Self::String(text) => put_padded_string(dst, text, start),
            Self::Blob(data) => {
                let len = i32::try_from(data.len()).map_err(|_| {
                    CodecError::malformed(dst.len() - start, "blob longer than i32::MAX")
                })?;
                order.put_i32(dst, len);
                dst.put_slice(data);
                pad_null(dst, start);
            }
            Self::TimeTag(tag) => tag.encode_into(order, dst),
            Self::Char(c) => order.put_i32(dst, *c as u32 as i32),
            Self::Color(_) => {
                return Err(CodecError::UnsupportedType { kind: self.kind() });
            }
            Self::True | Self::False | Self::Nil => {}
        }
        Ok(())
    }

    /// Read the argument announced by `tag`, or `None` for tags the decoder
    /// skips without consuming input.
    pub(crate) fn decode_from(tag: char, cursor: &mut ByteCursor<'_>) -> Result<Option<Self>> {
        let value = match tag {
            tags::INT32 => Self::Int(cursor.read_i32()?),
            tags::INT64 => Self::Long(cursor.read_i64()?),
            tags::FLOAT32 => Self::Float(cursor.read_f32()?),
            tags::FLOAT64 => Self::Double(cursor.read_f64()?),
            tags::STRING | tags::SYMBOL => Self::String(cursor.read_string()?),
            tags::BLOB => Self::Blob(read_blob(cursor)?),
            tags::TIME_TAG => Self::TimeTag(TimeTag::decode_from(cursor)?),
            tags::CHAR => {
                let offset = cursor.position();
                let code = cursor.read_i32()?;
                let c = u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| CodecError::malformed(offset, "invalid character code point"))?;
                Self::Char(c)
            }
            tags::TRUE => Self::True,
            tags::FALSE => Self::False,
            tags::NIL => Self::Nil,
            tags::INFINITUM => Self::Float(f32::INFINITY),
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}

/// Write `text` as ASCII (non-ASCII characters become `?`) followed by NUL padding.
pub(crate) fn put_padded_string(dst: &mut BytesMut, text: &str, start: usize) {
    dst.reserve(text.len() + 4);
    for c in text.chars() {
        dst.put_u8(if c.is_ascii() { c as u8 } else { b'?' });
    }
    pad_null(dst, start);
}

fn read_blob(cursor: &mut ByteCursor<'_>) -> Result<Bytes> {
    let offset = cursor.position();
    let len = cursor.read_i32()?;
    let len =
        usize::try_from(len).map_err(|_| CodecError::malformed(offset, "negative blob length"))?;
    let data = cursor
        .take_slice(len)
        .map_err(|_| CodecError::malformed(offset, "blob length exceeds remaining input"))?;
    // Same terminator-and-round-up step as strings, although blobs have no terminator.
    cursor.skip_terminated(0);
    Ok(Bytes::copy_from_slice(data))
}

impl From<i32> for Argument {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Argument {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Argument {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Argument {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Argument {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Argument {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Bytes> for Argument {
    fn from(v: Bytes) -> Self {
        Self::Blob(v)
    }
}

impl From<Vec<u8>> for Argument {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(Bytes::from(v))
    }
}

impl From<&[u8]> for Argument {
    fn from(v: &[u8]) -> Self {
        Self::Blob(Bytes::copy_from_slice(v))
    }
}

impl From<TimeTag> for Argument {
    fn from(v: TimeTag) -> Self {
        Self::TimeTag(v)
    }
}

impl From<char> for Argument {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<Color> for Argument {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

impl From<bool> for Argument {
    fn from(v: bool) -> Self {
        if v {
            Self::True
        } else {
            Self::False
        }
    }
}

impl<T: Into<Argument>> From<Option<T>> for Argument {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

/// Types that can be read back out of an [`Argument`] by typed accessors.
pub trait FromArgument: Sized {
    /// Kind name reported in [`CodecError::TypeMismatch`].
    const KIND: &'static str;

    fn from_argument(arg: &Argument) -> Option<Self>;
}

macro_rules! from_argument {
    ($ty:ty, $kind:literal, $pat:pat => $out:expr) => {
        impl FromArgument for $ty {
            const KIND: &'static str = $kind;

            fn from_argument(arg: &Argument) -> Option<Self> {
                match arg {
                    $pat => Some($out),
                    _ => None,
                }
            }
        }
    };
}

from_argument!(i32, "int32", Argument::Int(v) => *v);
from_argument!(i64, "int64", Argument::Long(v) => *v);
from_argument!(f32, "float32", Argument::Float(v) => *v);
from_argument!(f64, "float64", Argument::Double(v) => *v);
from_argument!(String, "string", Argument::String(v) => v.clone());
from_argument!(Bytes, "blob", Argument::Blob(v) => v.clone());
from_argument!(TimeTag, "time tag", Argument::TimeTag(v) => *v);
from_argument!(char, "char", Argument::Char(v) => *v);
from_argument!(Color, "color", Argument::Color(v) => *v);

impl FromArgument for bool {
    const KIND: &'static str = "bool";

    fn from_argument(arg: &Argument) -> Option<Self> {
        match arg {
            Argument::True => Some(true),
            Argument::False => Some(false),
            _ => None,
        }
    }
}
