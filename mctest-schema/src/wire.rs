//! Protobuf binary wire primitives.
//!
//! Records are laid out exactly as `protoc` would lay out the equivalent
//! proto2 messages: each field is a varint key (`tag << 3 | wire_type`)
//! followed by its payload. Only the wire types this schema needs are ever
//! written, but the [`Decoder`] can step over every wire type so that
//! fields added by newer writers are skipped rather than rejected.

use std::fmt;

use tracing::trace;

use crate::error::{Result, SchemaError};
use crate::message::Message;

/// Largest field number protobuf allows.
const MAX_TAG: u64 = (1 << 29) - 1;

/// Nesting limit when stepping over unknown groups.
const MAX_GROUP_DEPTH: usize = 64;

/// The low three bits of a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Base-128 varint (`int32`, `enum`, `bool`, ...).
    Varint,
    /// Eight little-endian bytes (`double`, `fixed64`).
    Fixed64,
    /// Varint length followed by that many bytes (`string`, messages, packed).
    LengthDelimited,
    /// Deprecated group start.
    StartGroup,
    /// Deprecated group end.
    EndGroup,
    /// Four little-endian bytes (`float`, `fixed32`).
    Fixed32,
}

impl WireType {
    fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            3 => Some(Self::StartGroup),
            4 => Some(Self::EndGroup),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    fn bits(self) -> u64 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::LengthDelimited => 2,
            Self::StartGroup => 3,
            Self::EndGroup => 4,
            Self::Fixed32 => 5,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Varint => write!(f, "varint"),
            Self::Fixed64 => write!(f, "fixed64"),
            Self::LengthDelimited => write!(f, "length-delimited"),
            Self::StartGroup => write!(f, "start-group"),
            Self::EndGroup => write!(f, "end-group"),
            Self::Fixed32 => write!(f, "fixed32"),
        }
    }
}

pub(crate) fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push(((value & 0x7f) as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

pub(crate) fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

fn encode_key(tag: u32, wire_type: WireType, buf: &mut Vec<u8>) {
    encode_varint((u64::from(tag) << 3) | wire_type.bits(), buf);
}

fn key_len(tag: u32) -> usize {
    varint_len(u64::from(tag) << 3)
}

pub(crate) fn encode_string(tag: u32, value: &str, buf: &mut Vec<u8>) {
    encode_key(tag, WireType::LengthDelimited, buf);
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value.as_bytes());
}

pub(crate) fn string_len(tag: u32, value: &str) -> usize {
    key_len(tag) + varint_len(value.len() as u64) + value.len()
}

/// Enums are `int32` on the wire, so negative values are sign-extended to ten bytes.
pub(crate) fn encode_enum(tag: u32, value: i32, buf: &mut Vec<u8>) {
    encode_key(tag, WireType::Varint, buf);
    encode_varint(i64::from(value) as u64, buf);
}

pub(crate) fn enum_len(tag: u32, value: i32) -> usize {
    key_len(tag) + varint_len(i64::from(value) as u64)
}

pub(crate) fn encode_double(tag: u32, value: f64, buf: &mut Vec<u8>) {
    encode_key(tag, WireType::Fixed64, buf);
    buf.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn double_len(tag: u32) -> usize {
    key_len(tag) + 8
}

pub(crate) fn encode_nested<M: Message>(tag: u32, message: &M, buf: &mut Vec<u8>) {
    encode_key(tag, WireType::LengthDelimited, buf);
    encode_varint(message.encoded_len() as u64, buf);
    message.encode_raw(buf);
}

pub(crate) fn nested_len<M: Message>(tag: u32, message: &M) -> usize {
    let len = message.encoded_len();
    key_len(tag) + varint_len(len as u64) + len
}

pub(crate) fn f64_from_le(bytes: &[u8]) -> f64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    f64::from_le_bytes(raw)
}

/// A bounds-checked cursor over one encoded record.
///
/// Every failure is reported against the record type the decoder was created
/// for, so nested records get their own decoder.
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
    message: &'static str,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(buf: &'a [u8], message: &'static str) -> Self {
        Self { buf, pos: 0, message }
    }

    pub(crate) fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    pub(crate) fn malformed(&self, reason: impl fmt::Display) -> SchemaError {
        SchemaError::MalformedInput {
            message: self.message,
            reason: format!("{reason} (at byte {})", self.pos),
        }
    }

    pub(crate) fn read_varint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(self.malformed("truncated varint"));
            };
            self.pos += 1;
            if shift == 63 && byte > 1 {
                return Err(self.malformed("varint overflows 64 bits"));
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(self.malformed("varint longer than 10 bytes"))
    }

    pub(crate) fn read_key(&mut self) -> Result<(u32, WireType)> {
        let key = self.read_varint()?;
        let wire_type = WireType::from_bits(key & 0x7)
            .ok_or_else(|| self.malformed(format!("invalid wire type {}", key & 0x7)))?;
        let tag = key >> 3;
        if tag == 0 || tag > MAX_TAG {
            return Err(self.malformed(format!("invalid field tag {tag}")));
        }
        Ok((tag as u32, wire_type))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| self.malformed(format!("length {len} exceeds remaining input")))?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| self.malformed("length overflows usize"))?;
        self.take(len)
    }

    pub(crate) fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_length_delimited()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| self.malformed(format!("invalid UTF-8 in string field: {e}")))
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        self.take(8).map(f64_from_le)
    }

    /// Reads an enum varint as the sign-extended value it carries.
    ///
    /// Not truncated to `i32`, so `2^32 + 1` stays distinct from `1`.
    pub(crate) fn read_enum(&mut self) -> Result<i64> {
        Ok(self.read_varint()? as i64)
    }

    pub(crate) fn read_nested<M: Message>(
        &mut self,
        field: &'static str,
        tag: u32,
        wire_type: WireType,
    ) -> Result<M> {
        self.expect_wire_type(field, tag, WireType::LengthDelimited, wire_type)?;
        let bytes = self.read_length_delimited()?;
        M::decode(bytes)
    }

    pub(crate) fn expect_wire_type(
        &self,
        field: &'static str,
        tag: u32,
        expected: WireType,
        actual: WireType,
    ) -> Result<()> {
        if expected == actual {
            return Ok(());
        }
        Err(SchemaError::TypeMismatch { message: self.message, field, tag, expected, actual })
    }

    pub(crate) fn skip_unknown(&mut self, tag: u32, wire_type: WireType) -> Result<()> {
        trace!(record = self.message, tag, %wire_type, "skipping unknown field");
        self.skip_field(tag, wire_type, 0)
    }

    fn skip_field(&mut self, tag: u32, wire_type: WireType, depth: usize) -> Result<()> {
        match wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
            WireType::LengthDelimited => {
                self.read_length_delimited()?;
            }
            WireType::StartGroup => {
                if depth >= MAX_GROUP_DEPTH {
                    return Err(self.malformed("groups nested too deeply"));
                }
                loop {
                    if !self.has_remaining() {
                        return Err(self.malformed(format!("unterminated group {tag}")));
                    }
                    let (inner_tag, inner_type) = self.read_key()?;
                    if inner_type == WireType::EndGroup {
                        if inner_tag != tag {
                            return Err(self.malformed(format!(
                                "group {tag} closed by end-group {inner_tag}"
                            )));
                        }
                        break;
                    }
                    self.skip_field(inner_tag, inner_type, depth + 1)?;
                }
            }
            WireType::EndGroup => {
                return Err(self.malformed(format!("unexpected end-group {tag}")));
            }
        }
        Ok(())
    }
}
