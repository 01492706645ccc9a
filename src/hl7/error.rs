//! Error taxonomy for the HL7 engine
//!
//! Structural parse errors are fatal for the whole message: a partially
//! parsed HL7 message is worse than no message, so the parser never returns
//! a truncated tree. Accessor misses are deliberately *not* errors; they are
//! `Option`s, since optional segments and fields are routinely absent.

use std::fmt;

/// Errors that can occur while parsing a raw message.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The input contained no segment lines at all.
    EmptyMessage,
    /// The first line is not a header segment carrying all five delimiters.
    MalformedHeader(String),
    /// A segment line whose first field is not a 3-character uppercase
    /// alphanumeric name. Carries the 1-based input line number, blank
    /// lines included.
    MalformedSegment { line: usize, reason: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyMessage => write!(f, "Empty HL7 message"),
            ParseError::MalformedHeader(msg) => write!(f, "Malformed header segment: {msg}"),
            ParseError::MalformedSegment { line, reason } => {
                write!(f, "Malformed segment at line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that can occur while building an acknowledgment.
#[derive(Debug, Clone, PartialEq)]
pub enum AckError {
    /// A positive ack would reference a control ID the inbound message does
    /// not carry; a blank MSA-2 would be meaningless to the sender.
    MissingControlId,
}

impl fmt::Display for AckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckError::MissingControlId => {
                write!(f, "Inbound message has no control ID to acknowledge")
            }
        }
    }
}

impl std::error::Error for AckError {}
