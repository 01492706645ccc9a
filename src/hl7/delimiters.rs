//! Per-message delimiter set
//!
//! HL7 v2 messages declare their own tokenization characters in the header
//! segment: the character right after the segment name is the field
//! separator, and the four characters after that are the component,
//! repetition, escape, and subcomponent characters, in that order. The set
//! travels with the parsed message so that messages from trading partners
//! with different conventions can be handled in the same process.

use serde::{Deserialize, Serialize};

use crate::hl7::error::ParseError;

/// Segment terminator used on output. Input also accepts `\n` and `\r\n`,
/// but serialization always emits the canonical carriage return.
pub const SEGMENT_TERMINATOR: char = '\r';

/// The name of the message header segment.
pub const HEADER_NAME: &str = "MSH";

/// The five control characters governing tokenization of a single message.
///
/// The conventional set is `|^~\&`. A `DelimiterSet` is always owned by a
/// `Message`; there is no process-wide delimiter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterSet {
    pub field_separator: char,
    pub component_separator: char,
    pub repetition_separator: char,
    pub escape_character: char,
    pub subcomponent_separator: char,
}

impl Default for DelimiterSet {
    fn default() -> Self {
        DelimiterSet {
            field_separator: '|',
            component_separator: '^',
            repetition_separator: '~',
            escape_character: '\\',
            subcomponent_separator: '&',
        }
    }
}

impl DelimiterSet {
    /// Read the delimiter set out of a raw header line.
    ///
    /// The line must be at least 8 characters: the 3-character segment name,
    /// the field separator, and the four encoding characters. The five
    /// characters must be distinct, printable, and non-whitespace.
    pub fn from_header(line: &str) -> Result<Self, ParseError> {
        let chars: Vec<char> = line.chars().take(8).collect();
        if chars.len() < 8 {
            return Err(ParseError::MalformedHeader(format!(
                "header segment is too short to declare delimiters: {:?}",
                line
            )));
        }
        let set = DelimiterSet {
            field_separator: chars[3],
            component_separator: chars[4],
            repetition_separator: chars[5],
            escape_character: chars[6],
            subcomponent_separator: chars[7],
        };
        set.validate()?;
        Ok(set)
    }

    /// The MSH-2 value: component, repetition, escape, and subcomponent
    /// characters in wire order (`^~\&` for the default set).
    pub fn encoding_characters(&self) -> String {
        let mut s = String::with_capacity(4);
        s.push(self.component_separator);
        s.push(self.repetition_separator);
        s.push(self.escape_character);
        s.push(self.subcomponent_separator);
        s
    }

    /// Whether `c` is one of the five control characters of this set.
    pub fn is_delimiter(&self, c: char) -> bool {
        c == self.field_separator
            || c == self.component_separator
            || c == self.repetition_separator
            || c == self.escape_character
            || c == self.subcomponent_separator
    }

    fn validate(&self) -> Result<(), ParseError> {
        let all = [
            self.field_separator,
            self.component_separator,
            self.repetition_separator,
            self.escape_character,
            self.subcomponent_separator,
        ];
        for (i, c) in all.iter().enumerate() {
            if c.is_whitespace() || c.is_control() {
                return Err(ParseError::MalformedHeader(format!(
                    "delimiter {:?} is not a printable non-whitespace character",
                    c
                )));
            }
            if all[..i].contains(c) {
                return Err(ParseError::MalformedHeader(format!(
                    "delimiter {:?} is declared twice",
                    c
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_conventional() {
        let d = DelimiterSet::default();
        assert_eq!(d.field_separator, '|');
        assert_eq!(d.encoding_characters(), "^~\\&");
    }

    #[test]
    fn from_header_reads_wire_order() {
        let d = DelimiterSet::from_header("MSH|^~\\&|APP|FAC").unwrap();
        assert_eq!(d, DelimiterSet::default());

        let d = DelimiterSet::from_header("MSH_^~\\&_APP").unwrap();
        assert_eq!(d.field_separator, '_');
        assert_eq!(d.component_separator, '^');
        assert_eq!(d.subcomponent_separator, '&');
    }

    #[test]
    fn from_header_rejects_short_lines() {
        assert!(matches!(
            DelimiterSet::from_header("MSH|^~\\"),
            Err(ParseError::MalformedHeader(_))
        ));
    }

    #[test]
    fn from_header_rejects_duplicate_delimiters() {
        assert!(matches!(
            DelimiterSet::from_header("MSH||~\\&|"),
            Err(ParseError::MalformedHeader(_))
        ));
    }

    #[test]
    fn from_header_rejects_whitespace_delimiters() {
        assert!(matches!(
            DelimiterSet::from_header("MSH|^ \\&|"),
            Err(ParseError::MalformedHeader(_))
        ));
    }

    #[test]
    fn is_delimiter_covers_all_five() {
        let d = DelimiterSet::default();
        for c in ['|', '^', '~', '\\', '&'] {
            assert!(d.is_delimiter(c));
        }
        assert!(!d.is_delimiter('A'));
    }
}
