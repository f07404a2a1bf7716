//! Candidate answers.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::text_format::{TextFormat, TextWriter};
use crate::token::Token;
use crate::vector::Vector;
use crate::wire::Decoder;

const TOKENS_TAG: u32 = 1;

/// One answer choice, as a token sequence.
///
/// Serialized to JSON as a bare array of tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answer<T> {
    /// The answer text, one entry per token.
    pub tokens: Vec<T>,
}

/// An answer choice as text tokens.
pub type AnswerAsWords = Answer<String>;

/// An answer choice as one embedding per token.
pub type AnswerAsEmbeddings = Answer<Vector>;

impl<T> Answer<T> {
    /// Create an answer from its tokens.
    pub fn new(tokens: Vec<T>) -> Self {
        Self { tokens }
    }
}

impl<T> Default for Answer<T> {
    fn default() -> Self {
        Self { tokens: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Answer<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self { tokens }
    }
}

impl AnswerAsWords {
    /// Build a word answer from anything string-like.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { tokens: words.into_iter().map(Into::into).collect() }
    }
}

impl<T: Token> Message for Answer<T> {
    const NAME: &'static str = T::ANSWER;

    fn encoded_len(&self) -> usize {
        self.tokens.iter().map(|token| token.field_len(TOKENS_TAG)).sum()
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        for token in &self.tokens {
            token.encode_field(TOKENS_TAG, buf);
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes, Self::NAME);
        let mut tokens = Vec::new();
        while decoder.has_remaining() {
            let (tag, wire_type) = decoder.read_key()?;
            match tag {
                TOKENS_TAG => tokens.push(T::decode_field(&mut decoder, "tokens", tag, wire_type)?),
                _ => decoder.skip_unknown(tag, wire_type)?,
            }
        }
        Ok(Self { tokens })
    }
}

impl<T: Token> TextFormat for Answer<T> {
    fn write_text(&self, writer: &mut TextWriter) {
        for token in &self.tokens {
            token.write_text_field("tokens", writer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    #[test]
    fn word_answer_layout() {
        let answer = AnswerAsWords::from_words(["Yes"]);
        assert_eq!(answer.encode(), vec![0x0a, 3, b'Y', b'e', b's']);
    }

    #[test]
    fn skips_unknown_fields() {
        // tokens: "a", unknown varint 7: 42, tokens: "b"
        let bytes = [0x0a, 1, b'a', 0x38, 42, 0x0a, 1, b'b'];
        let answer = AnswerAsWords::decode(&bytes).unwrap();
        assert_eq!(answer.tokens, vec!["a", "b"]);
    }

    #[test]
    fn embedding_answer_reports_nested_vector_errors() {
        // tokens: a one-byte Vector body holding a truncated varint
        let bytes = [0x0a, 1, 0xff];
        assert!(matches!(
            AnswerAsEmbeddings::decode(&bytes),
            Err(SchemaError::MalformedInput { message: "Vector", .. })
        ));
    }

    #[test]
    fn word_answer_rejects_fixed64_tokens() {
        let mut bytes = vec![0x09];
        bytes.extend_from_slice(&1.0f64.to_le_bytes());
        assert!(matches!(
            AnswerAsWords::decode(&bytes),
            Err(SchemaError::TypeMismatch { message: "AnswerAsWords", field: "tokens", .. })
        ));
    }
}
