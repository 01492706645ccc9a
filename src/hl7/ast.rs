//! Message tree and accessors
//!
//! A parsed message is a tree: Message -> Segment -> Field -> Repetition ->
//! Component -> subcomponent leaves. Leaves expose *logical* (unescaped)
//! text; a parsed leaf also remembers its exact wire spelling so the
//! serializer can reproduce the input character for character.
//!
//! Accessors never panic and never mutate. Asking for something that is not
//! on the wire returns `None`: optional segments and fields are routinely
//! absent in real feeds, and consumer code is written as chained optional
//! access.
//!
//! ## Field numbering
//!
//! `Segment::get_field` is 1-based, matching HL7 names like PID-3; field 0
//! is the segment name itself. For the header segment the parser stores
//! MSH-1 (the field separator character) and MSH-2 (the encoding
//! characters) as real fields 1 and 2, so the documented HL7 field number
//! works uniformly for every segment: `get_field(9)` on the header is the
//! message type, `get_field(10)` the control ID.

use serde::{Deserialize, Serialize};

use crate::hl7::delimiters::{DelimiterSet, HEADER_NAME};

/// An ordered sequence of segments plus the delimiter set they were parsed
/// with (or should be serialized with).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub delimiters: DelimiterSet,
    pub segments: Vec<Segment>,
}

/// A named record within a message, e.g. `MSH` or `PID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub fields: Vec<Field>,
}

/// One field: one or more repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub repetitions: Vec<Repetition>,
}

/// One repetition: one or more components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repetition {
    pub components: Vec<Component>,
}

/// One component: one or more subcomponent leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub subcomponents: Vec<Subcomponent>,
}

/// A leaf value. `value` is the decoded logical text; `raw` is the escape
/// spelling the leaf had on the wire, present only when it came from the
/// parser. Serialization prefers `raw`, because distinct wire spellings
/// (`\E\` versus a pass-through custom sequence) can decode to the same
/// logical text.
///
/// To change a parsed leaf, replace it with [`Subcomponent::new`], which
/// clears the stored spelling so the new text gets encoded.
///
/// In serde form a leaf is a plain string, the logical text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Subcomponent {
    pub value: String,
    pub raw: Option<String>,
}

impl Subcomponent {
    /// A constructed leaf with no wire spelling yet; the serializer will
    /// escape-encode `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Subcomponent {
            value: value.into(),
            raw: None,
        }
    }
}

impl From<String> for Subcomponent {
    fn from(value: String) -> Self {
        Subcomponent::new(value)
    }
}

impl From<Subcomponent> for String {
    fn from(leaf: Subcomponent) -> String {
        leaf.value
    }
}

/// Two leaves are the same leaf when their logical text matches; the wire
/// spelling is a serialization detail.
impl PartialEq for Subcomponent {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Message {
    /// Assemble a message from segments and a delimiter set.
    pub fn new(segments: Vec<Segment>, delimiters: DelimiterSet) -> Self {
        Message {
            delimiters,
            segments,
        }
    }

    /// The first segment, conventionally the MSH header.
    pub fn header(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// The first segment with the given 3-letter name.
    pub fn get_segment(&self, name: &str) -> Option<&Segment> {
        self.get_segment_occurrence(name, 0)
    }

    /// The Nth (0-based) segment with the given name. Segments with the
    /// same name keep their wire order.
    pub fn get_segment_occurrence(&self, name: &str, occurrence: usize) -> Option<&Segment> {
        self.segments.iter().filter(|s| s.name == name).nth(occurrence)
    }

    /// All segments with the given name, in wire order.
    pub fn get_all_segments(&self, name: &str) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.name == name).collect()
    }
}

impl Segment {
    /// Build a segment from a name and already-assembled fields. The name
    /// becomes stored field 0.
    pub fn new(name: &str, fields: Vec<Field>) -> Self {
        let mut all = Vec::with_capacity(fields.len() + 1);
        all.push(Field::leaf(name));
        all.extend(fields);
        Segment {
            name: name.to_string(),
            fields: all,
        }
    }

    /// Build a header segment for the given delimiter set. `fields` are
    /// MSH-3 onward; MSH-1 and MSH-2 are materialized from the set.
    pub fn header(delimiters: &DelimiterSet, fields: Vec<Field>) -> Self {
        let mut all = Vec::with_capacity(fields.len() + 3);
        all.push(Field::leaf(HEADER_NAME));
        all.push(Field::leaf(delimiters.field_separator.to_string()));
        all.push(Field::leaf(delimiters.encoding_characters()));
        all.extend(fields);
        Segment {
            name: HEADER_NAME.to_string(),
            fields: all,
        }
    }

    /// The field at the HL7-documented 1-based number; field 0 is the
    /// segment name.
    pub fn get_field(&self, number: usize) -> Option<&Field> {
        self.fields.get(number)
    }

    /// Shortcut for the Nth component of the first repetition of a field.
    /// Both indexes are 1-based, matching names like PID-3.1.
    pub fn get_component(&self, field: usize, component: usize) -> Option<&Component> {
        self.get_field(field)?
            .get_repetition(1)?
            .get_component(component)
    }
}

impl Field {
    /// A field holding a single scalar value.
    pub fn leaf(value: impl Into<String>) -> Self {
        Field {
            repetitions: vec![Repetition {
                components: vec![Component {
                    subcomponents: vec![Subcomponent::new(value)],
                }],
            }],
        }
    }

    /// A single-repetition field from scalar component values.
    pub fn from_components(values: Vec<String>) -> Self {
        Field {
            repetitions: vec![Repetition {
                components: values
                    .into_iter()
                    .map(|v| Component {
                        subcomponents: vec![Subcomponent::new(v)],
                    })
                    .collect(),
            }],
        }
    }

    /// The Nth repetition, 1-based.
    pub fn get_repetition(&self, number: usize) -> Option<&Repetition> {
        number.checked_sub(1).and_then(|i| self.repetitions.get(i))
    }

    /// Shortcut for the Nth component of the first repetition, 1-based.
    pub fn get_component(&self, number: usize) -> Option<&Component> {
        self.get_repetition(1)?.get_component(number)
    }

    /// Scalar coercion: the leaf string, provided the field has exactly one
    /// repetition with one component with one subcomponent. `None` whenever
    /// that would discard structure.
    pub fn as_value(&self) -> Option<&str> {
        match self.repetitions.as_slice() {
            [only] => match only.components.as_slice() {
                [component] => component.as_value(),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Repetition {
    /// The Nth component, 1-based.
    pub fn get_component(&self, number: usize) -> Option<&Component> {
        number.checked_sub(1).and_then(|i| self.components.get(i))
    }
}

impl Component {
    /// The Nth subcomponent's logical text, 1-based.
    pub fn get_subcomponent(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.subcomponents.get(i))
            .map(|s| s.value.as_str())
    }

    /// Scalar coercion: the leaf string when no subcomponent structure is
    /// present. A component with several subcomponents is not a scalar and
    /// yields `None` rather than silently dropping data.
    pub fn as_value(&self) -> Option<&str> {
        match self.subcomponents.as_slice() {
            [only] => Some(only.value.as_str()),
            _ => None,
        }
    }
}
