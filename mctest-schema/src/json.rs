//! JSON lines rendering, one record per line.
//!
//! Embedding records with NaN or infinite components fail to serialize; see
//! [`Vector`](crate::Vector).

use std::io::{BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Serialize a record as a single JSON line, including the trailing newline.
pub fn to_json_line<T: Serialize>(record: &T) -> Result<String> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    Ok(line)
}

/// Write a record as a single JSON line.
pub fn write_json_line<W: Write, T: Serialize>(writer: &mut W, record: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Iterate over the records of a JSON lines stream, skipping blank lines.
pub fn read_json_lines<R: BufRead, T: DeserializeOwned>(
    reader: R,
) -> impl Iterator<Item = Result<T>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(Into::into)),
        Err(e) => Some(Err(e.into())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerAsWords;
    use crate::error::SchemaError;
    use crate::question::QuestionAsWords;
    use crate::question_type::QuestionType;
    use crate::story::{StoryAsEmbeddings, StoryAsWords};
    use crate::vector::Vector;

    #[test]
    fn story_json_matches_corpus_layout() {
        let story = StoryAsWords::builder()
            .id("mc160.dev.0")
            .description("sample")
            .passage(["Hi".to_string()])
            .question(
                QuestionAsWords::builder()
                    .question_type(QuestionType::One)
                    .tokens(["Why".to_string()])
                    .answer(AnswerAsWords::from_words(["Because"]))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&to_json_line(&story).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "mc160.dev.0",
                "description": "sample",
                "passage": ["Hi"],
                "questions": [{"type": "one", "tokens": ["Why"], "answers": [["Because"]]}],
            })
        );
    }

    #[test]
    fn reads_lines_and_skips_blanks() {
        let input = "{\"id\":\"a\",\"description\":\"\",\"passage\":[],\"questions\":[]}\n\n\
                     {\"id\":\"b\",\"description\":\"\",\"passage\":[],\"questions\":[]}\n";
        let stories: Vec<StoryAsWords> =
            read_json_lines(input.as_bytes()).collect::<Result<_>>().unwrap();
        assert_eq!(stories.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn missing_id_is_a_json_error() {
        let input = "{\"description\":\"\",\"passage\":[],\"questions\":[]}\n";
        let result: Vec<Result<StoryAsWords>> = read_json_lines(input.as_bytes()).collect();
        assert!(matches!(result.as_slice(), [Err(SchemaError::Json(_))]));
    }

    #[test]
    fn non_finite_embedding_is_a_json_error() {
        let mut story = StoryAsEmbeddings::new("e", "");
        story.passage.push(Vector::new(vec![f64::NAN, f64::INFINITY]));

        assert!(matches!(to_json_line(&story), Err(SchemaError::Json(_))));

        let mut out = Vec::new();
        assert!(matches!(write_json_line(&mut out, &story), Err(SchemaError::Json(_))));
    }

    #[test]
    fn embedding_story_reads_back() {
        let mut story = StoryAsEmbeddings::new("e", "d");
        story.passage.push(Vector::new(vec![0.1, -2.5, 1e-300]));
        let line = to_json_line(&story).unwrap();
        let parsed: Vec<StoryAsEmbeddings> =
            read_json_lines(line.as_bytes()).collect::<Result<_>>().unwrap();
        assert_eq!(parsed, vec![story]);
    }

    #[test]
    fn write_json_line_appends_newline() {
        let mut out = Vec::new();
        write_json_line(&mut out, &AnswerAsWords::from_words(["a", "b"])).unwrap();
        assert_eq!(out, b"[\"a\",\"b\"]\n");
    }
}
