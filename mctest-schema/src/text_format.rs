//! Protobuf text format rendering.
//!
//! Produces the same layout as protobuf's own text printer:
//! one `name: value` line per field, nested records as `name { ... }` with
//! two-space indentation, strings C-escaped with non-ASCII bytes as octal.

/// A record that can be rendered as protobuf text format.
pub trait TextFormat {
    /// Write the record's fields at the writer's current indentation.
    fn write_text(&self, writer: &mut TextWriter);

    /// Render the record as a standalone text format document.
    fn to_text_format(&self) -> String {
        let mut writer = TextWriter::new();
        self.write_text(&mut writer);
        writer.finish()
    }
}

/// Accumulates text format lines.
#[derive(Debug, Default)]
pub struct TextWriter {
    out: String,
    indent: usize,
}

impl TextWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `name: "value"`.
    pub fn string_field(&mut self, name: &str, value: &str) {
        self.line(&format!("{name}: \"{}\"", escape_bytes(value.as_bytes())));
    }

    /// Write `name: IDENT` for an enum value.
    pub fn enum_field(&mut self, name: &str, ident: &str) {
        self.line(&format!("{name}: {ident}"));
    }

    /// Write `name: value` for a double.
    pub fn double_field(&mut self, name: &str, value: f64) {
        self.line(&format!("{name}: {}", format_double(value)));
    }

    /// Write `name { ... }` around a nested record.
    pub fn message_field<M: TextFormat + ?Sized>(&mut self, name: &str, value: &M) {
        self.line(&format!("{name} {{"));
        self.indent += 1;
        value.write_text(self);
        self.indent -= 1;
        self.line("}");
    }

    /// Consume the writer and return the rendered text.
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut escaped = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\n' => escaped.push_str("\\n"),
            b'\r' => escaped.push_str("\\r"),
            b'\t' => escaped.push_str("\\t"),
            b'"' => escaped.push_str("\\\""),
            b'\'' => escaped.push_str("\\'"),
            b'\\' => escaped.push_str("\\\\"),
            0x20..=0x7e => escaped.push(byte as char),
            _ => escaped.push_str(&format!("\\{byte:03o}")),
        }
    }
    escaped
}

fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    // Debug keeps a trailing ".0" on integral values and prints "inf"/"-inf".
    format!("{value:?}")
}
