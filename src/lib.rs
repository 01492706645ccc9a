//! # hl7v2
//!
//! A parser, serializer, and ACK builder for HL7 v2.x messages.
//!
//! The library contract is small: `parse` a raw de-framed message string
//! into a [`hl7::Message`], navigate it with 1-based accessors matching the
//! HL7 numbering convention, `serialize` it back to wire format, and
//! `build_ack` an acknowledgment. Transport framing (MLLP), conformance
//! validation, and batch (FHS/BHS) wrappers are out of scope.

pub mod hl7;

pub use hl7::{
    parse, AckCode, AckError, AckOptions, Component, DelimiterSet, Field, FormatRegistry, Message,
    ParseError, Repetition, Segment, Subcomponent,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_surface_round_trips_a_minimal_message() {
        let msg = parse("MSH|^~\\&|A|B").unwrap();
        assert_eq!(msg.serialize(), "MSH|^~\\&|A|B");
    }
}
