use bytes::BytesMut;
use tracing::debug;

use crate::byte_order::ByteOrder;
use crate::error::{CodecError, Result};
use crate::tags;
use crate::value::{put_padded_string, Argument, FromArgument};
use crate::wire::ByteCursor;

/// Every message address starts with this character.
pub const ADDRESS_PREFIX: char = '/';

/// An OSC message: an address pattern plus an ordered list of typed arguments.
///
/// Wire format:
/// ```text
/// ┌──────────────────────┬────────────────────────┬──────────────────────┐
/// │ Address, NUL padded  │ ",tags", NUL padded    │ Argument payloads    │
/// └──────────────────────┴────────────────────────┴──────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    address: String,
    type_tag: String,
    arguments: Vec<Argument>,
}

impl Message {
    /// Create a message with no arguments.
    ///
    /// Fails with [`CodecError::FormatMismatch`] unless `address` starts with `/`.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        if !address.starts_with(ADDRESS_PREFIX) {
            return Err(CodecError::FormatMismatch(format!(
                "message address {address:?} must start with '{ADDRESS_PREFIX}'"
            )));
        }
        Ok(Self {
            address,
            type_tag: tags::DEFAULT.to_string(),
            arguments: Vec::new(),
        })
    }

    /// Create a message carrying a single argument.
    pub fn with_argument(address: impl Into<String>, value: impl Into<Argument>) -> Result<Self> {
        let mut message = Self::new(address)?;
        message.append(value);
        Ok(message)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The type-tag string, starting with `,` and holding one character per argument.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Append an argument and return its index.
    pub fn append(&mut self, value: impl Into<Argument>) -> usize {
        let value = value.into();
        self.type_tag.push(value.type_tag());
        self.arguments.push(value);
        self.arguments.len() - 1
    }

    /// Append a nil argument and return its index.
    pub fn append_nil(&mut self) -> usize {
        self.append(Argument::Nil)
    }

    /// Borrow the argument at `index`.
    pub fn argument(&self, index: usize) -> Result<&Argument> {
        self.arguments.get(index).ok_or(CodecError::OutOfRange {
            index,
            len: self.arguments.len(),
        })
    }

    /// Read the argument at `index` as `T`.
    ///
    /// ```
    /// use oscwire_codec::Message;
    ///
    /// let message = Message::with_argument("/volume", 0.5f32)?;
    /// assert_eq!(message.get::<f32>(0)?, 0.5);
    /// assert!(message.get::<i32>(0).is_err());
    /// # Ok::<(), oscwire_codec::CodecError>(())
    /// ```
    pub fn get<T: FromArgument>(&self, index: usize) -> Result<T> {
        let arg = self.argument(index)?;
        T::from_argument(arg).ok_or(CodecError::TypeMismatch {
            index,
            expected: T::KIND,
            found: arg.kind(),
        })
    }

    /// Replace the argument at `index`, keeping the type-tag string in step.
    pub fn update_value_at(&mut self, index: usize, value: impl Into<Argument>) -> Result<()> {
        let len = self.arguments.len();
        let slot = self
            .arguments
            .get_mut(index)
            .ok_or(CodecError::OutOfRange { index, len })?;
        let value = value.into();
        let tag = value.type_tag();
        *slot = value;

        // Tags are ASCII, so byte offset == char offset; +1 skips the leading ','.
        let mut buf = [0u8; 4];
        self.type_tag
            .replace_range(index + 1..index + 2, tag.encode_utf8(&mut buf));
        Ok(())
    }

    /// Drop every argument and reset the type-tag string.
    pub fn clear_arguments(&mut self) {
        self.type_tag.clear();
        self.type_tag.push(tags::DEFAULT);
        self.arguments.clear();
    }

    pub(crate) fn encode_into(&self, order: ByteOrder, dst: &mut BytesMut) -> Result<()> {
        let start = dst.len();
        put_padded_string(dst, &self.address, start);
        put_padded_string(dst, &self.type_tag, start);
        for arg in &self.arguments {
            arg.encode_into(order, dst, start)?;
        }
        Ok(())
    }

    pub(crate) fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let address = cursor.read_string()?;
        let mut message = Self::new(address)?;

        let type_tag = cursor.read_string()?;
        for tag in type_tag.chars() {
            if tag == tags::DEFAULT {
                continue;
            }
            match Argument::decode_from(tag, cursor)? {
                Some(arg) => {
                    message.append(arg);
                }
                None => {
                    debug!(
                        address = %message.address,
                        tag = %tag,
                        name = tags::tag_name(tag),
                        "skipping type tag without a decoder"
                    );
                }
            }
        }

        Ok(message)
    }
}
