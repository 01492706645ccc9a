//! Raw text -> Message
//!
//! Parsing is data-driven splitting: the header declares the five delimiter
//! characters, and every line is then split into fields, repetitions,
//! components, and subcomponents. Empty slices between consecutive
//! separators are kept; positions carry meaning in HL7, and collapsing
//! them would break round-trip fidelity.
//!
//! Structural problems fail the whole parse. Downstream consumers assume a
//! well-formed tree, and a silently truncated healthcare message is worse
//! than a rejected one.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::hl7::ast::{Component, Field, Message, Repetition, Segment, Subcomponent};
use crate::hl7::delimiters::{DelimiterSet, HEADER_NAME};
use crate::hl7::error::ParseError;
use crate::hl7::escape;

/// Accepts `\r`, `\n`, and `\r\n` as segment terminators; blank lines are
/// discarded.
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// A segment name is exactly three uppercase ASCII letters or digits.
static SEGMENT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{3}$").unwrap());

/// Parse a raw HL7 v2 message into a [`Message`].
///
/// The input must start with the `MSH` header segment, whose own characters
/// define the delimiter set used for the rest of the message.
pub fn parse(text: &str) -> Result<Message, ParseError> {
    // Enumerate raw lines first so error positions refer to the input,
    // blank lines included, then drop the blanks.
    let lines: Vec<(usize, &str)> = LINE_BREAK
        .split(text)
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.is_empty())
        .collect();
    let (_, header_line) = *lines.first().ok_or(ParseError::EmptyMessage)?;

    if !header_line.starts_with(HEADER_NAME) {
        return Err(ParseError::MalformedHeader(format!(
            "message must start with {HEADER_NAME}, got {:?}",
            truncate(header_line)
        )));
    }
    let delimiters = DelimiterSet::from_header(header_line)?;

    let segments = lines
        .iter()
        .map(|(number, line)| parse_segment(line, *number, &delimiters))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(segments = segments.len(), "parsed HL7 message");
    Ok(Message::new(segments, delimiters))
}

fn parse_segment(line: &str, number: usize, delimiters: &DelimiterSet) -> Result<Segment, ParseError> {
    let tokens: Vec<&str> = line.split(delimiters.field_separator).collect();
    let name = tokens[0];
    if !SEGMENT_NAME.is_match(name) {
        return Err(ParseError::MalformedSegment {
            line: number,
            reason: format!(
                "segment name must be 3 uppercase letters/digits, got {:?}",
                truncate(name)
            ),
        });
    }

    let fields = if name == HEADER_NAME {
        // MSH-1 is the field separator character itself and MSH-2 the four
        // encoding characters. Both are delimiter text, so they are stored
        // verbatim, never escape-decoded; splitting them further would
        // destroy them.
        let mut fields = Vec::with_capacity(tokens.len() + 1);
        fields.push(Field::leaf(name));
        fields.push(Field::leaf(delimiters.field_separator.to_string()));
        fields.push(Field::leaf(tokens.get(1).copied().unwrap_or_default()));
        fields.extend(tokens[2..].iter().map(|t| parse_field(t, delimiters)));
        fields
    } else {
        tokens.iter().map(|t| parse_field(t, delimiters)).collect()
    };

    Ok(Segment {
        name: name.to_string(),
        fields,
    })
}

fn parse_field(text: &str, delimiters: &DelimiterSet) -> Field {
    Field {
        repetitions: text
            .split(delimiters.repetition_separator)
            .map(|r| parse_repetition(r, delimiters))
            .collect(),
    }
}

fn parse_repetition(text: &str, delimiters: &DelimiterSet) -> Repetition {
    Repetition {
        components: text
            .split(delimiters.component_separator)
            .map(|c| Component {
                subcomponents: c
                    .split(delimiters.subcomponent_separator)
                    .map(|s| Subcomponent {
                        value: escape::decode(s, delimiters),
                        raw: Some(s.to_string()),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(16).collect()
}
