//! The question type discriminant.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// How many of a question's answers are expected to be correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum QuestionType {
    /// A single sentence of the passage answers the question.
    One = 1,
    /// Answering needs information from several sentences.
    Multiple = 2,
}

impl QuestionType {
    /// The wire value of this variant.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Look up a variant by wire value, `None` outside `{1, 2}`.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Multiple),
            _ => None,
        }
    }

    /// The enum value name used in protobuf text format.
    pub fn as_str_name(self) -> &'static str {
        match self {
            Self::One => "ONE",
            Self::Multiple => "MULTIPLE",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One => write!(f, "one"),
            Self::Multiple => write!(f, "multiple"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" => Ok(Self::One),
            "multiple" => Ok(Self::Multiple),
            _ => Err(SchemaError::UnknownQuestionType(s.to_string())),
        }
    }
}
