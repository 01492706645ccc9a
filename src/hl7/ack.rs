//! Acknowledgment construction
//!
//! Given an inbound message, build a new ACK message: routing fields
//! swapped (the ACK's sender is the original receiver), a fresh control ID,
//! and an MSA segment carrying the acknowledgment code plus the control ID
//! being acknowledged. The inbound message is never mutated; the ACK is a
//! freshly assembled tree sharing the inbound delimiter set.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;

use crate::hl7::ast::{Field, Message, Segment};
use crate::hl7::datetime::format_hl7_datetime;
use crate::hl7::delimiters::HEADER_NAME;
use crate::hl7::error::AckError;

/// MSA-1 acknowledgment codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckCode {
    /// AA: application accept.
    #[default]
    ApplicationAccept,
    /// AE: application error.
    ApplicationError,
    /// AR: application reject.
    ApplicationReject,
    /// CA: commit accept (enhanced mode).
    CommitAccept,
    /// CE: commit error (enhanced mode).
    CommitError,
    /// CR: commit reject (enhanced mode).
    CommitReject,
}

impl AckCode {
    pub fn as_str(self) -> &'static str {
        match self {
            AckCode::ApplicationAccept => "AA",
            AckCode::ApplicationError => "AE",
            AckCode::ApplicationReject => "AR",
            AckCode::CommitAccept => "CA",
            AckCode::CommitError => "CE",
            AckCode::CommitReject => "CR",
        }
    }

    /// Whether this code acknowledges success. A positive ack must
    /// reference the inbound control ID.
    pub fn is_positive(self) -> bool {
        matches!(self, AckCode::ApplicationAccept | AckCode::CommitAccept)
    }
}

impl fmt::Display for AckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AckCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AA" => Ok(AckCode::ApplicationAccept),
            "AE" => Ok(AckCode::ApplicationError),
            "AR" => Ok(AckCode::ApplicationReject),
            "CA" => Ok(AckCode::CommitAccept),
            "CE" => Ok(AckCode::CommitError),
            "CR" => Ok(AckCode::CommitReject),
            other => Err(format!("unknown acknowledgment code: {other:?}")),
        }
    }
}

/// Options for [`Message::build_ack`].
#[derive(Debug, Clone, Default)]
pub struct AckOptions {
    pub code: AckCode,
    /// MSA-3 text; defaults to `OK`.
    pub text: Option<String>,
    /// Optional ERR segment appended after the MSA.
    pub err_segment: Option<Segment>,
}

impl Message {
    /// Build an acknowledgment for this message.
    ///
    /// A positive code requires the inbound message to carry a control ID
    /// (MSH-10); acknowledging success against a blank control ID would be
    /// meaningless to the sender. Negative acks are built even when the
    /// inbound header is missing or incomplete.
    pub fn build_ack(&self, options: &AckOptions) -> Result<Message, AckError> {
        let delimiters = self.delimiters;
        let msh = self.get_segment(HEADER_NAME);
        let inbound = |number: usize| -> Field {
            msh.and_then(|s| s.get_field(number))
                .cloned()
                .unwrap_or_else(|| Field::leaf(""))
        };

        let control_id = msh
            .and_then(|s| s.get_field(10))
            .map(|f| f.serialize(&delimiters))
            .unwrap_or_default();
        if options.code.is_positive() && control_id.is_empty() {
            return Err(AckError::MissingControlId);
        }

        let now = Utc::now();
        let version = msh
            .and_then(|s| s.get_field(12))
            .filter(|f| !f.serialize(&delimiters).is_empty())
            .cloned()
            .unwrap_or_else(|| Field::leaf("2.5.1"));

        let header = Segment::header(
            &delimiters,
            vec![
                inbound(5), // sending app <- inbound receiving app
                inbound(6), // sending facility <- inbound receiving facility
                inbound(3), // receiving app <- inbound sending app
                inbound(4), // receiving facility <- inbound sending facility
                Field::leaf(format_hl7_datetime(now)),
                Field::leaf(""),
                ack_message_type(msh),
                Field::leaf(now.timestamp_millis().to_string()),
                Field::leaf("P"),
                version,
            ],
        );

        let msa = Segment::new(
            "MSA",
            vec![
                Field::leaf(options.code.as_str()),
                Field::leaf(control_id),
                Field::leaf(options.text.clone().unwrap_or_else(|| "OK".to_string())),
            ],
        );

        let mut segments = vec![header, msa];
        if let Some(err) = &options.err_segment {
            segments.push(err.clone());
        }
        Ok(Message::new(segments, delimiters))
    }
}

/// Mirror the shape of the inbound message type. HL7 v2.1 carries one
/// component, v2.2–v2.3 two, v2.3.1+ three; rather than inspecting the
/// version, reproduce whatever shape the sender used.
fn ack_message_type(msh: Option<&Segment>) -> Field {
    let message_type = msh.and_then(|s| s.get_field(9));
    let trigger = message_type
        .and_then(|f| f.get_component(2))
        .and_then(|c| c.as_value())
        .filter(|v| !v.is_empty());
    let structure = message_type
        .and_then(|f| f.get_component(3))
        .and_then(|c| c.as_value())
        .filter(|v| !v.is_empty());
    match (trigger, structure) {
        (Some(t), Some(_)) => {
            Field::from_components(vec!["ACK".into(), t.to_string(), "ACK".into()])
        }
        (Some(t), None) => Field::from_components(vec!["ACK".into(), t.to_string()]),
        _ => Field::leaf("ACK"),
    }
}
