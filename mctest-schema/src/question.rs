//! Questions and their answer choices.

use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::error::{Result, SchemaError};
use crate::message::Message;
use crate::question_type::QuestionType;
use crate::text_format::{TextFormat, TextWriter};
use crate::token::Token;
use crate::vector::Vector;
use crate::wire::{self, Decoder, WireType};

const TYPE_TAG: u32 = 1;
const TOKENS_TAG: u32 = 2;
const ANSWERS_TAG: u32 = 3;

/// A question about a story, with its ordered answer choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question<T> {
    /// Whether one or several passage sentences are needed to answer.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The question text, one entry per token.
    pub tokens: Vec<T>,
    /// Answer choices in presentation order; index 0 is choice "A".
    pub answers: Vec<Answer<T>>,
}

/// A question as text tokens.
pub type QuestionAsWords = Question<String>;

/// A question as one embedding per token.
pub type QuestionAsEmbeddings = Question<Vector>;

impl<T> Question<T> {
    /// Create a question with no tokens and no answers.
    pub fn new(question_type: QuestionType) -> Self {
        Self { question_type, tokens: Vec::new(), answers: Vec::new() }
    }

    /// Create a new builder.
    pub fn builder() -> QuestionBuilder<T> {
        QuestionBuilder::default()
    }
}

/// Builder for a [`Question`] whose type may not be known up front.
#[derive(Debug, Clone)]
pub struct QuestionBuilder<T> {
    question_type: Option<QuestionType>,
    tokens: Vec<T>,
    answers: Vec<Answer<T>>,
}

impl<T> Default for QuestionBuilder<T> {
    fn default() -> Self {
        Self { question_type: None, tokens: Vec::new(), answers: Vec::new() }
    }
}

impl<T> QuestionBuilder<T> {
    /// Set the question type.
    pub fn question_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    /// Append question tokens.
    pub fn tokens(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append one answer choice.
    pub fn answer(mut self, answer: impl Into<Answer<T>>) -> Self {
        self.answers.push(answer.into());
        self
    }

    /// Build the [`Question`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingRequiredField`] if the type was never set.
    pub fn build(self) -> Result<Question<T>>
    where
        T: Token,
    {
        let question_type = self.question_type.ok_or(SchemaError::MissingRequiredField {
            message: <Question<T> as Message>::NAME,
            field: "type",
        })?;
        Ok(Question { question_type, tokens: self.tokens, answers: self.answers })
    }
}

impl<T: Token> Message for Question<T> {
    const NAME: &'static str = T::QUESTION;

    fn encoded_len(&self) -> usize {
        wire::enum_len(TYPE_TAG, self.question_type.as_i32())
            + self.tokens.iter().map(|token| token.field_len(TOKENS_TAG)).sum::<usize>()
            + self.answers.iter().map(|answer| wire::nested_len(ANSWERS_TAG, answer)).sum::<usize>()
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        wire::encode_enum(TYPE_TAG, self.question_type.as_i32(), buf);
        for token in &self.tokens {
            token.encode_field(TOKENS_TAG, buf);
        }
        for answer in &self.answers {
            wire::encode_nested(ANSWERS_TAG, answer, buf);
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes, Self::NAME);
        let mut question_type = None;
        let mut tokens = Vec::new();
        let mut answers: Vec<Answer<T>> = Vec::new();
        while decoder.has_remaining() {
            let (tag, wire_type) = decoder.read_key()?;
            match tag {
                TYPE_TAG => {
                    decoder.expect_wire_type("type", tag, WireType::Varint, wire_type)?;
                    let value = decoder.read_enum()?;
                    let parsed = i32::try_from(value)
                        .ok()
                        .and_then(QuestionType::from_i32)
                        .ok_or(SchemaError::InvalidEnumValue {
                            message: Self::NAME,
                            field: "type",
                            value,
                        })?;
                    question_type = Some(parsed);
                }
                TOKENS_TAG => tokens.push(T::decode_field(&mut decoder, "tokens", tag, wire_type)?),
                ANSWERS_TAG => answers.push(decoder.read_nested("answers", tag, wire_type)?),
                _ => decoder.skip_unknown(tag, wire_type)?,
            }
        }
        let question_type = question_type
            .ok_or(SchemaError::MissingRequiredField { message: Self::NAME, field: "type" })?;
        Ok(Self { question_type, tokens, answers })
    }
}

impl<T: Token> TextFormat for Question<T> {
    fn write_text(&self, writer: &mut TextWriter) {
        writer.enum_field("type", self.question_type.as_str_name());
        for token in &self.tokens {
            token.write_text_field("tokens", writer);
        }
        for answer in &self.answers {
            writer.message_field("answers", answer);
        }
    }
}
