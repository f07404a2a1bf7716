//! The embedding of a single token.

use serde::ser::{self, Serialize, Serializer};
use serde::Deserialize;

use crate::error::Result;
use crate::message::Message;
use crate::text_format::{TextFormat, TextWriter};
use crate::wire::{self, Decoder, WireType};

const VALUE_TAG: u32 = 1;

/// An ordered sequence of `f64` values, one embedding per token position.
///
/// The dimensionality is whatever the producer chose; nothing here checks
/// that vectors in one story agree on it.
///
/// JSON has no NaN or infinity, so serializing a vector holding either is an
/// error rather than a silent `null`. The binary codec carries them as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    /// The embedding components.
    pub value: Vec<f64>,
}

impl Vector {
    /// Wrap a list of components.
    pub fn new(value: Vec<f64>) -> Self {
        Self { value }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The components as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.value
    }
}

impl Serialize for Vector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let Some((index, component)) =
            self.value.iter().enumerate().find(|(_, component)| !component.is_finite())
        {
            return Err(ser::Error::custom(format_args!(
                "vector component {index} is {component}, which JSON cannot represent"
            )));
        }
        self.value.serialize(serializer)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(value: Vec<f64>) -> Self {
        Self { value }
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self { value: iter.into_iter().collect() }
    }
}

impl Message for Vector {
    const NAME: &'static str = "Vector";

    fn encoded_len(&self) -> usize {
        self.value.len() * wire::double_len(VALUE_TAG)
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        for component in &self.value {
            wire::encode_double(VALUE_TAG, *component, buf);
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes, Self::NAME);
        let mut value = Vec::new();
        while decoder.has_remaining() {
            let (tag, wire_type) = decoder.read_key()?;
            match (tag, wire_type) {
                (VALUE_TAG, WireType::Fixed64) => value.push(decoder.read_f64()?),
                // Packed encoding, written by proto3 producers and `[packed = true]`.
                (VALUE_TAG, WireType::LengthDelimited) => {
                    let packed = decoder.read_length_delimited()?;
                    if packed.len() % 8 != 0 {
                        return Err(decoder.malformed(format!(
                            "packed double field of {} bytes",
                            packed.len()
                        )));
                    }
                    value.extend(packed.chunks_exact(8).map(wire::f64_from_le));
                }
                (VALUE_TAG, _) => {
                    decoder.expect_wire_type("value", tag, WireType::Fixed64, wire_type)?;
                }
                _ => decoder.skip_unknown(tag, wire_type)?,
            }
        }
        Ok(Self { value })
    }
}

impl TextFormat for Vector {
    fn write_text(&self, writer: &mut TextWriter) {
        for component in &self.value {
            writer.double_field("value", *component);
        }
    }
}
