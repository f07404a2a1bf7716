//! Story, question and answer records for the MCTest reading-comprehension corpus.
//!
//! Every record exists in two structurally identical families:
//!
//! - the word family ([`StoryAsWords`], [`QuestionAsWords`], [`AnswerAsWords`]),
//!   where each token is a `String`;
//! - the embedding family ([`StoryAsEmbeddings`], [`QuestionAsEmbeddings`],
//!   [`AnswerAsEmbeddings`]), where each token is a [`Vector`].
//!
//! Both are instances of the generic [`Story`], [`Question`] and [`Answer`]
//! records, so one story can never mix the two.
//!
//! This crate provides:
//! - Protobuf binary encoding and decoding via [`Message`]
//! - Length-prefixed record streams ([`write_delimited`], [`DelimitedReader`])
//! - Protobuf text format rendering via [`TextFormat`]
//! - JSON lines via `serde`
//!
//! # Example
//!
//! ```rust
//! use mctest_schema::{AnswerAsWords, Message, QuestionAsWords, QuestionType, StoryAsWords};
//!
//! let story = StoryAsWords::builder()
//!     .id("s1")
//!     .description("sample")
//!     .passage(["Cats", "sleep"].map(String::from))
//!     .question(
//!         QuestionAsWords::builder()
//!             .question_type(QuestionType::One)
//!             .tokens(["Do", "cats", "sleep", "?"].map(String::from))
//!             .answer(AnswerAsWords::from_words(["Yes"]))
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let bytes = story.encode();
//! assert_eq!(StoryAsWords::decode(&bytes)?, story);
//! # Ok::<(), mctest_schema::SchemaError>(())
//! ```

mod answer;
mod config;
mod error;
mod json;
mod message;
mod question;
mod question_type;
mod story;
mod stream;
mod text_format;
mod token;
mod vector;
mod wire;

pub use answer::{Answer, AnswerAsEmbeddings, AnswerAsWords};
pub use config::{CodecConfig, CodecConfigBuilder};
pub use error::{Result, SchemaError};
pub use json::{read_json_lines, to_json_line, write_json_line};
pub use message::Message;
pub use question::{Question, QuestionAsEmbeddings, QuestionAsWords, QuestionBuilder};
pub use question_type::QuestionType;
pub use story::{Story, StoryAsEmbeddings, StoryAsWords, StoryBuilder};
pub use stream::{
    DelimitedReader, read_delimited, write_delimited, write_delimited_with_config,
};
pub use text_format::{TextFormat, TextWriter};
pub use token::Token;
pub use vector::Vector;
pub use wire::WireType;
