//! Stories: a passage plus the questions asked about it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::message::Message;
use crate::question::Question;
use crate::text_format::{TextFormat, TextWriter};
use crate::token::Token;
use crate::vector::Vector;
use crate::wire::{self, Decoder, WireType};

const ID_TAG: u32 = 1;
const DESCRIPTION_TAG: u32 = 2;
const PASSAGE_TAG: u32 = 3;
const QUESTIONS_TAG: u32 = 4;

/// A reading-comprehension story.
///
/// Word and embedding stories with the same `id` describe the same content,
/// but nothing checks that correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story<T> {
    /// Corpus identifier, e.g. `mc160.dev.0`.
    pub id: String,
    /// Human-readable description of the story's origin.
    pub description: String,
    /// The passage, one entry per token.
    pub passage: Vec<T>,
    /// Questions about the passage.
    pub questions: Vec<Question<T>>,
}

/// A story as text tokens.
pub type StoryAsWords = Story<String>;

/// A story as one embedding per token.
pub type StoryAsEmbeddings = Story<Vector>;

impl<T> Story<T> {
    /// Create a story with an empty passage and no questions.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            passage: Vec::new(),
            questions: Vec::new(),
        }
    }

    /// Create a new builder.
    pub fn builder() -> StoryBuilder<T> {
        StoryBuilder::default()
    }

    /// Total number of answer choices across all questions.
    pub fn answer_count(&self) -> usize {
        self.questions.iter().map(|question| question.answers.len()).sum()
    }
}

impl Story<String> {
    /// Flatten the story into one lowercase, space-separated token line.
    ///
    /// The passage comes first, then each question's tokens followed by its
    /// answers' tokens when `include_answers` is set. `id`, `description` and
    /// question types are left out.
    ///
    /// ```
    /// use mctest_schema::StoryAsWords;
    ///
    /// let story = StoryAsWords::builder()
    ///     .id("s1")
    ///     .description("sample")
    ///     .passage(["Cats".to_string(), "sleep".to_string()])
    ///     .build()?;
    /// assert_eq!(story.to_token_list(false), "cats sleep");
    /// # Ok::<(), mctest_schema::SchemaError>(())
    /// ```
    pub fn to_token_list(&self, include_answers: bool) -> String {
        let mut tokens: Vec<&str> = self.passage.iter().map(String::as_str).collect();
        for question in &self.questions {
            tokens.extend(question.tokens.iter().map(String::as_str));
            if include_answers {
                for answer in &question.answers {
                    tokens.extend(answer.tokens.iter().map(String::as_str));
                }
            }
        }
        tokens.join(" ").to_lowercase()
    }
}

/// Builder for a [`Story`] assembled field by field.
#[derive(Debug, Clone)]
pub struct StoryBuilder<T> {
    id: Option<String>,
    description: Option<String>,
    passage: Vec<T>,
    questions: Vec<Question<T>>,
}

impl<T> Default for StoryBuilder<T> {
    fn default() -> Self {
        Self { id: None, description: None, passage: Vec::new(), questions: Vec::new() }
    }
}

impl<T> StoryBuilder<T> {
    /// Set the story identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append passage tokens.
    pub fn passage(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.passage.extend(tokens);
        self
    }

    /// Append one question.
    pub fn question(mut self, question: Question<T>) -> Self {
        self.questions.push(question);
        self
    }

    /// Build the [`Story`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingRequiredField`] if `id` or `description`
    /// was never set. An empty string counts as set.
    pub fn build(self) -> Result<Story<T>>
    where
        T: Token,
    {
        let name = <Story<T> as Message>::NAME;
        let id = self
            .id
            .ok_or(SchemaError::MissingRequiredField { message: name, field: "id" })?;
        let description = self
            .description
            .ok_or(SchemaError::MissingRequiredField { message: name, field: "description" })?;
        Ok(Story { id, description, passage: self.passage, questions: self.questions })
    }
}

impl<T: Token> Message for Story<T> {
    const NAME: &'static str = T::STORY;

    fn encoded_len(&self) -> usize {
        wire::string_len(ID_TAG, &self.id)
            + wire::string_len(DESCRIPTION_TAG, &self.description)
            + self.passage.iter().map(|token| token.field_len(PASSAGE_TAG)).sum::<usize>()
            + self
                .questions
                .iter()
                .map(|question| wire::nested_len(QUESTIONS_TAG, question))
                .sum::<usize>()
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        wire::encode_string(ID_TAG, &self.id, buf);
        wire::encode_string(DESCRIPTION_TAG, &self.description, buf);
        for token in &self.passage {
            token.encode_field(PASSAGE_TAG, buf);
        }
        for question in &self.questions {
            wire::encode_nested(QUESTIONS_TAG, question, buf);
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes, Self::NAME);
        let mut id = None;
        let mut description = None;
        let mut passage = Vec::new();
        let mut questions: Vec<Question<T>> = Vec::new();
        while decoder.has_remaining() {
            let (tag, wire_type) = decoder.read_key()?;
            match tag {
                ID_TAG => {
                    decoder.expect_wire_type("id", tag, WireType::LengthDelimited, wire_type)?;
                    id = Some(decoder.read_string()?);
                }
                DESCRIPTION_TAG => {
                    decoder.expect_wire_type(
                        "description",
                        tag,
                        WireType::LengthDelimited,
                        wire_type,
                    )?;
                    description = Some(decoder.read_string()?);
                }
                PASSAGE_TAG => {
                    passage.push(T::decode_field(&mut decoder, "passage", tag, wire_type)?)
                }
                QUESTIONS_TAG => questions.push(decoder.read_nested("questions", tag, wire_type)?),
                _ => decoder.skip_unknown(tag, wire_type)?,
            }
        }
        let id = id.ok_or(SchemaError::MissingRequiredField { message: Self::NAME, field: "id" })?;
        let description = description.ok_or(SchemaError::MissingRequiredField {
            message: Self::NAME,
            field: "description",
        })?;
        Ok(Self { id, description, passage, questions })
    }
}

impl<T: Token> TextFormat for Story<T> {
    fn write_text(&self, writer: &mut TextWriter) {
        writer.string_field("id", &self.id);
        writer.string_field("description", &self.description);
        for token in &self.passage {
            token.write_text_field("passage", writer);
        }
        for question in &self.questions {
            writer.message_field("questions", question);
        }
    }
}
