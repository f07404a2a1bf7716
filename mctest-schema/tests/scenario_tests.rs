//! End-to-end behaviour of concrete stories in both families.

use mctest_schema::{
    AnswerAsEmbeddings, AnswerAsWords, Message, QuestionAsEmbeddings, QuestionAsWords,
    QuestionType, SchemaError, Story, StoryAsEmbeddings, StoryAsWords, TextFormat, Token, Vector,
    WireType,
};

fn words(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn sample_story() -> StoryAsWords {
    StoryAsWords::builder()
        .id("s1")
        .description("sample")
        .passage(words(&["Cats", "sleep"]))
        .question(
            QuestionAsWords::builder()
                .question_type(QuestionType::One)
                .tokens(words(&["Do", "cats", "sleep", "?"]))
                .answer(AnswerAsWords::from_words(["Yes"]))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn sample_embedding_story() -> StoryAsEmbeddings {
    let vector = |x: f64| Vector::new(vec![x, -x]);
    StoryAsEmbeddings::builder()
        .id("s1")
        .description("sample")
        .passage([vector(0.5), vector(0.25)])
        .question(
            QuestionAsEmbeddings::builder()
                .question_type(QuestionType::One)
                .tokens((0..4).map(|i| vector(i as f64)))
                .answer(AnswerAsEmbeddings::new(vec![vector(9.0)]))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

/// Re-encodes `story` with the leading `type` entry removed from every question.
fn encode_without_question_types<T: Token>(story: &Story<T>) -> Vec<u8> {
    let mut bytes = Story { questions: Vec::new(), ..story.clone() }.encode();
    for question in &story.questions {
        let encoded = question.encode();
        // type is always written first as a two-byte varint field
        assert_eq!(encoded[0], 0x08);
        let stripped = &encoded[2..];
        assert!(stripped.len() < 0x80);
        bytes.push(0x22);
        bytes.push(stripped.len() as u8);
        bytes.extend_from_slice(stripped);
    }
    bytes
}

#[test]
fn sample_story_round_trips_exactly() {
    let story = sample_story();
    let bytes = story.encode();
    let decoded = StoryAsWords::decode(&bytes).unwrap();
    assert_eq!(decoded, story);
    assert_eq!(decoded.encode(), bytes);
}

#[test]
fn sample_story_wire_layout() {
    let bytes = sample_story().encode();
    let expected = b"\
        \x0a\x02s1\
        \x12\x06sample\
        \x1a\x04Cats\
        \x1a\x05sleep\
        \x22\x1d\
        \x08\x01\
        \x12\x02Do\
        \x12\x04cats\
        \x12\x05sleep\
        \x12\x01?\
        \x1a\x05\x0a\x03Yes";
    assert_eq!(bytes, expected.to_vec());
}

#[test]
fn stripping_the_question_type_fails_decoding() {
    let bytes = encode_without_question_types(&sample_story());
    let err = StoryAsWords::decode(&bytes).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::MissingRequiredField { message: "QuestionAsWords", field: "type" }
    ));
}

#[test]
fn stripping_the_question_type_fails_embedding_decoding() {
    let bytes = encode_without_question_types(&sample_embedding_story());
    let err = StoryAsEmbeddings::decode(&bytes).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::MissingRequiredField { message: "QuestionAsEmbeddings", field: "type" }
    ));
}

#[test]
fn question_without_type_is_rejected_in_both_families() {
    // tokens only: one word, or one single-component vector
    let words = [0x12, 1, b'x'];
    assert!(matches!(
        QuestionAsWords::decode(&words),
        Err(SchemaError::MissingRequiredField { message: "QuestionAsWords", field: "type" })
    ));

    let mut embeddings = vec![0x12, 9, 0x09];
    embeddings.extend_from_slice(&1.5f64.to_le_bytes());
    assert!(matches!(
        QuestionAsEmbeddings::decode(&embeddings),
        Err(SchemaError::MissingRequiredField { message: "QuestionAsEmbeddings", field: "type" })
    ));
}

#[test]
fn passage_order_is_preserved() {
    let story = StoryAsWords::builder()
        .id("order")
        .description("")
        .passage(words(&["The", "cat", "sat", "The"]))
        .build()
        .unwrap();
    let decoded = StoryAsWords::decode(&story.encode()).unwrap();
    assert_eq!(decoded.passage, vec!["The", "cat", "sat", "The"]);
}

#[test]
fn answer_order_is_preserved() {
    let mut question = QuestionAsWords::new(QuestionType::Multiple);
    for choice in ["A", "B", "C", "D"] {
        question.answers.push(AnswerAsWords::from_words([choice]));
    }
    let decoded = QuestionAsWords::decode(&question.encode()).unwrap();
    let choices: Vec<&str> = decoded.answers.iter().map(|a| a.tokens[0].as_str()).collect();
    assert_eq!(choices, vec!["A", "B", "C", "D"]);
}

#[test]
fn families_encode_independently() {
    let words_story = sample_story();
    let embedding_story = sample_embedding_story();

    assert_eq!(words_story.passage.len(), embedding_story.passage.len());
    assert_eq!(words_story.answer_count(), embedding_story.answer_count());

    let decoded_words = StoryAsWords::decode(&words_story.encode()).unwrap();
    let decoded_embeddings = StoryAsEmbeddings::decode(&embedding_story.encode()).unwrap();
    assert_eq!(decoded_words, words_story);
    assert_eq!(decoded_embeddings, embedding_story);
}

#[test]
fn word_bytes_do_not_decode_as_embeddings() {
    // "Cats" is a valid string but not a valid Vector body.
    let err = StoryAsEmbeddings::decode(&sample_story().encode()).unwrap_err();
    assert!(matches!(err, SchemaError::MalformedInput { message: "Vector", .. }));
}

#[test]
fn missing_story_fields_are_rejected() {
    let no_id = StoryAsWords::new("", "sample").encode()[2..].to_vec();
    assert!(matches!(
        StoryAsWords::decode(&no_id),
        Err(SchemaError::MissingRequiredField { message: "StoryAsWords", field: "id" })
    ));

    let no_embedding_id = StoryAsEmbeddings::new("", "sample").encode()[2..].to_vec();
    assert!(matches!(
        StoryAsEmbeddings::decode(&no_embedding_id),
        Err(SchemaError::MissingRequiredField { message: "StoryAsEmbeddings", field: "id" })
    ));

    let no_description = [0x0a, 1, b'x'];
    assert!(matches!(
        StoryAsEmbeddings::decode(&no_description),
        Err(SchemaError::MissingRequiredField { message: "StoryAsEmbeddings", field: "description" })
    ));
}

#[test]
fn invalid_question_type_is_rejected_in_both_families() {
    let bytes = [0x08, 0x05];
    assert!(matches!(
        QuestionAsWords::decode(&bytes),
        Err(SchemaError::InvalidEnumValue { message: "QuestionAsWords", field: "type", value: 5 })
    ));
    assert!(matches!(
        QuestionAsEmbeddings::decode(&bytes),
        Err(SchemaError::InvalidEnumValue {
            message: "QuestionAsEmbeddings",
            field: "type",
            value: 5
        })
    ));
}

#[test]
fn wrong_wire_type_on_known_tag_is_rejected() {
    // id encoded as varint
    let bytes = [0x08, 0x01, 0x12, 0];
    assert!(matches!(
        StoryAsWords::decode(&bytes),
        Err(SchemaError::TypeMismatch {
            message: "StoryAsWords",
            field: "id",
            tag: 1,
            expected: WireType::LengthDelimited,
            actual: WireType::Varint,
        })
    ));
}

#[test]
fn truncated_input_is_malformed() {
    let bytes = sample_story().encode();
    for cut in [1, 3, bytes.len() - 1] {
        assert!(
            matches!(
                StoryAsWords::decode(&bytes[..cut]),
                Err(SchemaError::MalformedInput { .. })
            ),
            "cut at {cut}"
        );
    }
}

#[test]
fn sample_story_text_format() {
    let expected = "\
id: \"s1\"
description: \"sample\"
passage: \"Cats\"
passage: \"sleep\"
questions {
  type: ONE
  tokens: \"Do\"
  tokens: \"cats\"
  tokens: \"sleep\"
  tokens: \"?\"
  answers {
    tokens: \"Yes\"
  }
}
";
    assert_eq!(sample_story().to_text_format(), expected);
}

#[test]
fn embedding_text_format_nests_vectors() {
    let mut story = StoryAsEmbeddings::new("e1", "it's");
    story.passage.push(Vector::new(vec![0.5, -1.0]));
    let expected = "\
id: \"e1\"
description: \"it\\'s\"
passage {
  value: 0.5
  value: -1.0
}
";
    assert_eq!(story.to_text_format(), expected);
}
