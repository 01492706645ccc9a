//! Round-trip fidelity tests
//!
//! Parsing then serializing must reproduce the input character for
//! character (after normalizing segment terminators to `\r`), and
//! re-parsing the serialized output must yield a structurally identical
//! tree. Empty-field positions, delimiters, and escape sequences all
//! survive the cycle.

use hl7v2::hl7::parser::parse;

fn assert_round_trip(text: &str) {
    let msg = parse(text).unwrap();
    let normalized = text
        .replace("\r\n", "\r")
        .replace('\n', "\r")
        .trim_end_matches('\r')
        .to_string();
    assert_eq!(msg.serialize(), normalized);

    let reparsed = parse(&msg.serialize()).unwrap();
    assert_eq!(reparsed, msg);
}

#[test]
fn minimal_message() {
    assert_round_trip("MSH|^~\\&");
}

#[test]
fn ack_message() {
    assert_round_trip(
        "MSH|^~\\&|Main_HIS|XYZ_HOSPITAL|iFW|ABC_Lab|20160915003015||ACK|9B38584D|P|2.6.1|\r\
MSA|AA|9B38584D|Everything was okay dokay!|",
    );
}

#[test]
fn adt_with_trailing_empty_fields() {
    assert_round_trip(
        "MSH|^~\\&|EPIC|EPICADT|SMS|SMSADT|199912271408|CHARRIS|ADT^A04|1817457|D|2.5|\r\
PID||0493575^^^2^ID 1|454721||DOE^JOHN^^^^|DOE^JOHN^^^^|19480203|M||B|254 MYSTREET AVE^^MYTOWN^OH^44123^USA||(216)123-4567|||M|NON|400003403~1129086|\r\
NK1||ROE^MARIE^^^^|SPO||(216)123-4567||EC|||||||||||||||||||||||||||",
    );
}

#[test]
fn newline_terminated_input_normalizes_to_cr() {
    assert_round_trip("MSH|^~\\&|A|B\nPID|1||X^Y\nOBX|1|NM|GLU\n");
    assert_round_trip("MSH|^~\\&|A|B\r\nPID|1||X^Y\r\n");
}

#[test]
fn non_standard_delimiters_round_trip() {
    assert_round_trip(
        "MSH_^~\\&_Main_XYZ_iFW_ABC_20160915003015__ACK_9B38584D_P_2.6.1_\r\
MSA_AA_9B38584D_Everything was okay dokay!_",
    );
}

#[test]
fn escape_sequences_survive_the_cycle() {
    assert_round_trip("MSH|^~\\&|A\rNTE|1|pipe \\F\\ hat \\S\\ amp \\T\\ tilde \\R\\ esc \\E\\ done");
}

#[test]
fn custom_escape_sequences_pass_through_unresolved() {
    let text = "MSH|^~\\&|A\rOBX|1|ED|doc|1|\\X0D0A\\binary\\X0D0A\\";
    assert_round_trip(text);
    let msg = parse(text).unwrap();
    let obx = msg.get_segment("OBX").unwrap();
    assert_eq!(
        obx.get_field(5).unwrap().as_value(),
        Some("\\X0D0A\\binary\\X0D0A\\")
    );
}

#[test]
fn escaped_backslashes_keep_their_wire_spelling() {
    // \E\dir\E\ and the pass-through spelling \dir\ decode to the same
    // logical text, so the serializer must reuse the parsed spelling
    // instead of re-encoding the decoded value.
    let text = "MSH|^~\\&|A\rNTE|1|C:\\E\\path\\E\\file";
    assert_round_trip(text);
    let msg = parse(text).unwrap();
    let nte = msg.get_segment("NTE").unwrap();
    assert_eq!(nte.get_field(2).unwrap().as_value(), Some("C:\\path\\file"));
}

#[test]
fn repetitions_components_and_subcomponents_round_trip() {
    assert_round_trip(
        "MSH|^~\\&|A\rINV|2049001|OK^^HL70383~CURRENT^^99ROC|R1|514|1|8||||||20181030||||256616",
    );
    assert_round_trip("MSH|^~\\&|A\rSPM|1|022&BARCODE||SERPLAS^^99ROC|||||||P^^HL70369|||~~~~");
}

#[test]
fn blank_interior_lines_are_discarded() {
    let msg = parse("MSH|^~\\&|A\r\r\rPID|1\r\r").unwrap();
    assert_eq!(msg.segments.len(), 2);
    assert_eq!(msg.serialize(), "MSH|^~\\&|A\rPID|1");
}
