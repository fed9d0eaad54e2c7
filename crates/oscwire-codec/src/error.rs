use crate::time_tag::TimeTag;

/// Errors that can occur while building, encoding or decoding OSC packets.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A value kind has no wire representation.
    #[error("unsupported argument type: {kind}")]
    UnsupportedType { kind: &'static str },

    /// The input ended early or a length prefix overran the buffer.
    #[error("malformed packet at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },

    /// A bundle prefix or message address did not have the expected shape.
    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    /// A nested bundle is stamped earlier than the bundle containing it.
    #[error("nested bundle time tag {child} precedes parent time tag {parent}")]
    OrderingViolation { parent: TimeTag, child: TimeTag },

    /// Index-based argument access outside the argument list.
    #[error("argument index {index} out of range ({len} arguments)")]
    OutOfRange { index: usize, len: usize },

    /// Index-based argument read with the wrong expected kind.
    #[error("argument {index} is {found}, expected {expected}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// A time tag at or before 1900-01-01T00:00:00 or past the 32-bit seconds range.
    #[error("invalid time tag: {0}")]
    InvalidTimestamp(String),

    /// An encoded nested packet was not 4-byte aligned.
    #[error("nested packet is {len} bytes, not a multiple of 4")]
    Unaligned { len: usize },

    /// An I/O error surfaced through the datagram codec.
    #[cfg(feature = "async")]
    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Self {
        Self::Malformed { offset, reason }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
