//! Escape-sequence sublanguage
//!
//! Within a leaf value, delimiter characters are carried as escape
//! sequences: `\F\` (field), `\S\` (component), `\T\` (subcomponent),
//! `\R\` (repetition), and `\E\` (the escape character itself), where `\`
//! stands for whatever escape character the message declares. Other
//! well-formed sequences (`\X0D0A\` hex data, `\Z...\` locale escapes, and
//! so on) are passed through unresolved in *both* directions so a
//! parse/serialize cycle never corrupts them.
//!
//! Real-world feeds are not always conformant: an unterminated escape (a
//! trailing `\` with no closing `\`) is kept as a literal character and
//! logged, rather than failing the message.

use tracing::warn;

use crate::hl7::delimiters::DelimiterSet;

/// Replace escape sequences in a wire leaf with the logical characters they
/// stand for.
pub fn decode(raw: &str, delimiters: &DelimiterSet) -> String {
    let esc = delimiters.escape_character;
    if !raw.contains(esc) {
        return raw.to_string();
    }
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != esc {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match chars[i + 1..].iter().position(|&c| c == esc) {
            None => {
                warn!(leaf = raw, "unterminated escape sequence; keeping literal escape character");
                out.push(esc);
                i += 1;
            }
            Some(rel) => {
                let close = i + 1 + rel;
                let body = &chars[i + 1..close];
                match known_code(body, delimiters) {
                    Some(resolved) => out.push(resolved),
                    None => {
                        // Custom escape (hex data, locale, highlighting...):
                        // out of scope to resolve, preserved verbatim.
                        out.push(esc);
                        out.extend(body);
                        out.push(esc);
                    }
                }
                i = close + 1;
            }
        }
    }
    out
}

/// Escape every delimiter character in a logical value so it can be embedded
/// in wire format. Inverse of [`decode`].
pub fn encode(logical: &str, delimiters: &DelimiterSet) -> String {
    let d = delimiters;
    let esc = d.escape_character;
    let chars: Vec<char> = logical.chars().collect();
    let mut out = String::with_capacity(logical.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == d.field_separator {
            push_sequence(&mut out, esc, 'F');
        } else if c == d.component_separator {
            push_sequence(&mut out, esc, 'S');
        } else if c == d.subcomponent_separator {
            push_sequence(&mut out, esc, 'T');
        } else if c == d.repetition_separator {
            push_sequence(&mut out, esc, 'R');
        } else if c == esc {
            // A literal escape character, unless it opens a custom sequence
            // that decode would pass through; those are preserved verbatim
            // so that encode/decode stay inverses of each other.
            if let Some(close) = custom_sequence_end(&chars, i, d) {
                out.extend(&chars[i..=close]);
                i = close + 1;
                continue;
            }
            push_sequence(&mut out, esc, 'E');
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

fn push_sequence(out: &mut String, esc: char, code: char) {
    out.push(esc);
    out.push(code);
    out.push(esc);
}

/// Resolve an escape body against the five standard single-character codes.
fn known_code(body: &[char], d: &DelimiterSet) -> Option<char> {
    if body.len() != 1 {
        return None;
    }
    match body[0] {
        'F' => Some(d.field_separator),
        'S' => Some(d.component_separator),
        'T' => Some(d.subcomponent_separator),
        'R' => Some(d.repetition_separator),
        'E' => Some(d.escape_character),
        _ => None,
    }
}

/// If the escape character at `start` opens a well-formed sequence that
/// decode would pass through unresolved, return the index of its closing
/// escape character.
fn custom_sequence_end(chars: &[char], start: usize, d: &DelimiterSet) -> Option<usize> {
    let rel = chars[start + 1..]
        .iter()
        .position(|&c| c == d.escape_character)?;
    let close = start + 1 + rel;
    let body = &chars[start + 1..close];
    if known_code(body, d).is_some() {
        return None;
    }
    if body.iter().any(|&c| d.is_delimiter(c)) {
        return None;
    }
    Some(close)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d() -> DelimiterSet {
        DelimiterSet::default()
    }

    #[test]
    fn decode_resolves_standard_sequences() {
        assert_eq!(decode("a\\F\\b", &d()), "a|b");
        assert_eq!(decode("a\\S\\b", &d()), "a^b");
        assert_eq!(decode("a\\T\\b", &d()), "a&b");
        assert_eq!(decode("a\\R\\b", &d()), "a~b");
        assert_eq!(decode("a\\E\\b", &d()), "a\\b");
    }

    #[test]
    fn decode_passes_custom_sequences_through() {
        assert_eq!(decode("x\\X0D0A\\y", &d()), "x\\X0D0A\\y");
        assert_eq!(decode("x\\Zqq\\y", &d()), "x\\Zqq\\y");
    }

    #[test]
    fn decode_keeps_unterminated_escape_as_literal() {
        assert_eq!(decode("abc\\", &d()), "abc\\");
        assert_eq!(decode("a\\F\\b\\", &d()), "a|b\\");
    }

    #[test]
    fn encode_escapes_every_delimiter() {
        assert_eq!(encode("a|b^c~d&e", &d()), "a\\F\\b\\S\\c\\R\\d\\T\\e");
        assert_eq!(encode("back\\slash", &d()), "back\\E\\slash");
    }

    #[test]
    fn encode_preserves_custom_sequences() {
        assert_eq!(encode("x\\X0D0A\\y", &d()), "x\\X0D0A\\y");
    }

    #[test]
    fn encode_escapes_text_that_collides_with_standard_sequences() {
        // A logical value that happens to contain the text "\F\" must not
        // decode back into a field separator.
        let logical = "a\\F\\b";
        let wire = encode(logical, &d());
        assert_eq!(wire, "a\\E\\F\\E\\b");
        assert_eq!(decode(&wire, &d()), logical);
    }

    #[test]
    fn encode_decode_round_trip_with_all_specials() {
        let logical = "pipe|hat^tilde~amp&esc\\ done";
        assert_eq!(decode(&encode(logical, &d()), &d()), logical);
    }

    #[test]
    fn custom_delimiter_set_uses_its_own_characters() {
        let custom = DelimiterSet::from_header("MSH#@*!%rest").unwrap();
        assert_eq!(encode("a#b", &custom), "a!F!b");
        assert_eq!(decode("a!F!b", &custom), "a#b");
    }
}
