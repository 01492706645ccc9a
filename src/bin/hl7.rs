//! Command-line interface for hl7v2
//! Inspect raw HL7 v2.x message files and build acknowledgments for them.
//!
//! Usage:
//!   hl7 parse `<path>` [--format `<format>`]   - Parse a message file and print a rendering
//!   hl7 ack `<path>` [--code `<code>`] [--text `<text>`] - Build and print an ACK
//!   hl7 list-formats                          - List all available output formats

use clap::{Arg, Command};
use hl7v2::hl7::ack::AckOptions;
use hl7v2::hl7::formats::FormatRegistry;
use hl7v2::hl7::parser::parse;
use hl7v2::hl7::Message;

fn main() {
    let matches = Command::new("hl7")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting HL7 v2.x messages and building ACKs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a message file and print a rendering")
                .arg(
                    Arg::new("path")
                        .help("Path to the raw HL7 message file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'tree', 'wire', 'json', 'yaml')")
                        .default_value("tree"),
                ),
        )
        .subcommand(
            Command::new("ack")
                .about("Build an acknowledgment for a message file")
                .arg(
                    Arg::new("path")
                        .help("Path to the raw HL7 message file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("code")
                        .long("code")
                        .short('c')
                        .help("Acknowledgment code (AA, AE, AR, CA, CE, CR)")
                        .default_value("AA"),
                )
                .arg(
                    Arg::new("text")
                        .long("text")
                        .short('t')
                        .help("MSA-3 text (defaults to 'OK')"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            let message = read_and_parse(path);
            handle_parse_command(&message, format);
        }
        Some(("ack", ack_matches)) => {
            let path = ack_matches.get_one::<String>("path").unwrap();
            let code = ack_matches.get_one::<String>("code").unwrap();
            let text = ack_matches.get_one::<String>("text").cloned();
            let message = read_and_parse(path);
            handle_ack_command(&message, code, text);
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn read_and_parse(path: &str) -> Message {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });
    parse(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the parse command
fn handle_parse_command(message: &Message, format: &str) {
    let registry = FormatRegistry::with_defaults();
    let output = registry.serialize(message, format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!("{}", display_terminators(&output));
}

/// Handle the ack command
fn handle_ack_command(message: &Message, code: &str, text: Option<String>) {
    let code = code.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let options = AckOptions {
        code,
        text,
        err_segment: None,
    };
    let ack = message.build_ack(&options).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!("{}", display_terminators(&ack.serialize()));
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:");
    for (name, description) in registry.describe_formats() {
        println!("  {:<8} {}", name, description);
    }
}

/// Carriage-return terminators render as overwritten lines on a terminal;
/// show them as newlines instead.
fn display_terminators(wire: &str) -> String {
    wire.replace('\r', "\n")
}
