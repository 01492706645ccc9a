//! Message -> wire text, the inverse of the parser
//!
//! Each level joins its children with the matching separator from the
//! message's own delimiter set. Parsed leaves are emitted with their
//! original wire spelling; constructed leaves are escape-encoded on the
//! way out.
//! Output always uses the canonical `\r` segment terminator, whatever
//! terminators were accepted on input. Trailing empty fields and components
//! are emitted as-is so that `serialize(parse(m))` reproduces `m`.

use std::fmt;

use crate::hl7::ast::{Component, Field, Message, Repetition, Segment};
use crate::hl7::delimiters::{DelimiterSet, HEADER_NAME, SEGMENT_TERMINATOR};
use crate::hl7::escape;

impl Message {
    /// Render the message in wire format using its own delimiter set.
    pub fn serialize(&self) -> String {
        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|s| s.serialize(&self.delimiters))
            .collect();
        rendered.join(&SEGMENT_TERMINATOR.to_string())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl Segment {
    /// Render one segment line (without the terminator).
    pub fn serialize(&self, delimiters: &DelimiterSet) -> String {
        if self.name == HEADER_NAME && self.fields.len() >= 3 {
            // Stored header field 1 is the field separator itself, not a
            // wire token, and field 2 is the encoding characters; both are
            // delimiter text and must come out verbatim, unescaped.
            let mut out = String::new();
            out.push_str(&self.name);
            out.push(delimiters.field_separator);
            out.push_str(&raw_leaf(&self.fields[2], delimiters));
            for field in &self.fields[3..] {
                out.push(delimiters.field_separator);
                out.push_str(&field.serialize(delimiters));
            }
            return out;
        }
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|f| f.serialize(delimiters))
            .collect();
        rendered.join(&delimiters.field_separator.to_string())
    }
}

impl Field {
    pub fn serialize(&self, delimiters: &DelimiterSet) -> String {
        let rendered: Vec<String> = self
            .repetitions
            .iter()
            .map(|r| r.serialize(delimiters))
            .collect();
        rendered.join(&delimiters.repetition_separator.to_string())
    }
}

impl Repetition {
    pub fn serialize(&self, delimiters: &DelimiterSet) -> String {
        let rendered: Vec<String> = self
            .components
            .iter()
            .map(|c| c.serialize(delimiters))
            .collect();
        rendered.join(&delimiters.component_separator.to_string())
    }
}

impl Component {
    pub fn serialize(&self, delimiters: &DelimiterSet) -> String {
        let rendered: Vec<String> = self
            .subcomponents
            .iter()
            .map(|s| match &s.raw {
                // A parsed leaf keeps its original escape spelling. Distinct
                // spellings can decode to the same logical text, so encoding
                // the decoded value could emit different wire bytes.
                Some(raw) => raw.clone(),
                None => escape::encode(&s.value, delimiters),
            })
            .collect();
        rendered.join(&delimiters.subcomponent_separator.to_string())
    }
}

/// A leaf value emitted without escape encoding, for the header's
/// delimiter-bearing fields.
fn raw_leaf(field: &Field, delimiters: &DelimiterSet) -> String {
    match field.as_value() {
        Some(v) => v.to_string(),
        None => field.serialize(delimiters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hl7::parser::parse;

    #[test]
    fn minimal_header_round_trips() {
        let text = "MSH|^~\\&";
        assert_eq!(parse(text).unwrap().serialize(), text);
    }

    #[test]
    fn segment_terminator_is_normalized_to_cr() {
        let msg = parse("MSH|^~\\&|A\nPID|1\n").unwrap();
        assert_eq!(msg.serialize(), "MSH|^~\\&|A\rPID|1");
    }

    #[test]
    fn detached_field_serialization_uses_given_delimiters() {
        let f = Field::from_components(vec!["ADT".into(), "A01".into()]);
        assert_eq!(f.serialize(&DelimiterSet::default()), "ADT^A01");
    }

    #[test]
    fn encoding_happens_only_at_leaves() {
        let seg = Segment::new("NTE", vec![Field::leaf("a|b")]);
        assert_eq!(seg.serialize(&DelimiterSet::default()), "NTE|a\\F\\b");
    }

    #[test]
    fn parsed_leaves_keep_their_escape_spelling() {
        // \E\ and an equivalent pass-through spelling decode to the same
        // text; the output must still match the input byte for byte.
        let text = "MSH|^~\\&|A\rNTE|1|C:\\E\\dir\\E\\file";
        let msg = parse(text).unwrap();
        let nte = msg.get_segment("NTE").unwrap();
        assert_eq!(nte.get_field(2).unwrap().as_value(), Some("C:\\dir\\file"));
        assert_eq!(msg.serialize(), text);
    }
}
