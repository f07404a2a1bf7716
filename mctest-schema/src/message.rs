//! The binary codec contract shared by every record type.

use crate::error::Result;

/// A record with a protobuf binary encoding.
///
/// Encoding is infallible: required fields are plain typed fields, so a
/// record that exists is always complete. Decoding validates everything the
/// type system cannot (required-field presence, enum range, wire types).
pub trait Message: Sized {
    /// The schema name of the record, used in error reports.
    const NAME: &'static str;

    /// Exact size in bytes of [`encode`](Message::encode)'s output.
    fn encoded_len(&self) -> usize;

    /// Append the record's fields to `buf` without any length prefix.
    fn encode_raw(&self, buf: &mut Vec<u8>);

    /// Decode a record from exactly `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MalformedInput`](crate::SchemaError::MalformedInput),
    /// [`SchemaError::MissingRequiredField`](crate::SchemaError::MissingRequiredField),
    /// [`SchemaError::InvalidEnumValue`](crate::SchemaError::InvalidEnumValue) or
    /// [`SchemaError::TypeMismatch`](crate::SchemaError::TypeMismatch). There is no
    /// partial result.
    fn decode(bytes: &[u8]) -> Result<Self>;

    /// Encode the record into a new buffer.
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_raw(&mut buf);
        buf
    }
}
