//! The token type that separates the word family from the embedding family.

use std::fmt;

use crate::text_format::TextWriter;
use crate::vector::Vector;
use crate::wire::{self, Decoder, WireType};

/// One position of a passage, question or answer.
///
/// Implemented by [`String`] (word family) and [`Vector`] (embedding family)
/// only. A record is generic over a single token type, so the two families
/// can never be mixed inside one story.
pub trait Token: private::TokenCodec + Clone + PartialEq + fmt::Debug + Send + Sync {}

impl Token for String {}

impl Token for Vector {}

pub(crate) mod private {
    use super::*;
    use crate::error::Result;

    pub trait TokenCodec: Sized {
        const ANSWER: &'static str;
        const QUESTION: &'static str;
        const STORY: &'static str;

        fn field_len(&self, tag: u32) -> usize;

        fn encode_field(&self, tag: u32, buf: &mut Vec<u8>);

        fn decode_field(
            decoder: &mut Decoder<'_>,
            field: &'static str,
            tag: u32,
            wire_type: WireType,
        ) -> Result<Self>;

        fn write_text_field(&self, name: &str, writer: &mut TextWriter);
    }

    impl TokenCodec for String {
        const ANSWER: &'static str = "AnswerAsWords";
        const QUESTION: &'static str = "QuestionAsWords";
        const STORY: &'static str = "StoryAsWords";

        fn field_len(&self, tag: u32) -> usize {
            wire::string_len(tag, self)
        }

        fn encode_field(&self, tag: u32, buf: &mut Vec<u8>) {
            wire::encode_string(tag, self, buf);
        }

        fn decode_field(
            decoder: &mut Decoder<'_>,
            field: &'static str,
            tag: u32,
            wire_type: WireType,
        ) -> Result<Self> {
            decoder.expect_wire_type(field, tag, WireType::LengthDelimited, wire_type)?;
            decoder.read_string()
        }

        fn write_text_field(&self, name: &str, writer: &mut TextWriter) {
            writer.string_field(name, self);
        }
    }

    impl TokenCodec for Vector {
        const ANSWER: &'static str = "AnswerAsEmbeddings";
        const QUESTION: &'static str = "QuestionAsEmbeddings";
        const STORY: &'static str = "StoryAsEmbeddings";

        fn field_len(&self, tag: u32) -> usize {
            wire::nested_len(tag, self)
        }

        fn encode_field(&self, tag: u32, buf: &mut Vec<u8>) {
            wire::encode_nested(tag, self, buf);
        }

        fn decode_field(
            decoder: &mut Decoder<'_>,
            field: &'static str,
            tag: u32,
            wire_type: WireType,
        ) -> Result<Self> {
            decoder.read_nested::<Vector>(field, tag, wire_type)
        }

        fn write_text_field(&self, name: &str, writer: &mut TextWriter) {
            writer.message_field(name, self);
        }
    }
}
