//! HL7 v2.x message engine
//!
//! Parses raw pipe-and-hat messages into a navigable tree, serializes the
//! tree back to wire format, and builds acknowledgment (ACK) messages.
//!
//! The engine is a pure transformation library: no I/O, no shared state.
//! Every message carries its own delimiter set, discovered from its MSH
//! header, so messages from trading partners with different conventions can
//! be processed concurrently.
//!
//! ```text
//! raw text --parse--> Message --accessors--> values
//!                        |
//!                    build_ack
//!                        v
//!                     Message --serialize--> raw text
//! ```

pub mod ack;
pub mod ast;
pub mod datetime;
pub mod delimiters;
pub mod error;
pub mod escape;
pub mod formats;
pub mod parser;
pub mod serializer;

pub use ack::{AckCode, AckOptions};
pub use ast::{Component, Field, Message, Repetition, Segment, Subcomponent};
pub use datetime::{format_hl7_datetime, parse_hl7_datetime};
pub use delimiters::{DelimiterSet, HEADER_NAME, SEGMENT_TERMINATOR};
pub use error::{AckError, ParseError};
pub use formats::{FormatError, FormatRegistry, Formatter};
pub use parser::parse;
