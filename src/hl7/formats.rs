//! Output formats for parsed messages
//!
//! A pluggable registry of renderings used by the CLI: the raw wire format,
//! serde views of the tree (json/yaml), and a numbered per-segment listing
//! for human inspection. Each format implements the `Formatter` trait and
//! is registered with `FormatRegistry`.

use std::collections::HashMap;
use std::fmt;

use crate::hl7::ast::Message;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Trait for message formatters
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "wire", "tree")
    fn name(&self) -> &str;

    /// Render a message in this format
    fn serialize(&self, message: &Message) -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of message formatters
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Create a registry with all built-in formats registered
    pub fn with_defaults() -> Self {
        let mut registry = FormatRegistry::new();
        registry.register(WireFormatter);
        registry.register(TreeFormatter);
        registry.register(JsonFormatter);
        registry.register(YamlFormatter);
        registry
    }

    /// Register a formatter, replacing any existing one with the same name
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Get a formatter by name
    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    /// Render a message using the named format
    pub fn serialize(&self, message: &Message, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(message)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Descriptions keyed by format name, in sorted order
    pub fn describe_formats(&self) -> Vec<(String, String)> {
        self.list_formats()
            .into_iter()
            .map(|name| {
                let description = self
                    .get(&name)
                    .map(|f| f.description().to_string())
                    .unwrap_or_default();
                (name, description)
            })
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        FormatRegistry::with_defaults()
    }
}

/// Canonical pipe-and-hat wire format with `\r` terminators
pub struct WireFormatter;

impl Formatter for WireFormatter {
    fn name(&self) -> &str {
        "wire"
    }

    fn serialize(&self, message: &Message) -> Result<String, FormatError> {
        Ok(message.serialize())
    }

    fn description(&self) -> &str {
        "Escaped pipe-and-hat text, CR segment terminators"
    }
}

/// Numbered per-segment field listing for human inspection
pub struct TreeFormatter;

impl Formatter for TreeFormatter {
    fn name(&self) -> &str {
        "tree"
    }

    fn serialize(&self, message: &Message) -> Result<String, FormatError> {
        let mut out = String::new();
        for segment in &message.segments {
            out.push_str(&segment.name);
            out.push('\n');
            for (number, field) in segment.fields.iter().enumerate().skip(1) {
                out.push_str(&format!(
                    "  {number}: {}\n",
                    field.serialize(&message.delimiters)
                ));
            }
        }
        Ok(out)
    }

    fn description(&self) -> &str {
        "Per-segment listing with HL7 field numbers"
    }
}

/// serde_json view of the message tree
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, message: &Message) -> Result<String, FormatError> {
        serde_json::to_string_pretty(message)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "JSON rendering of the parsed tree"
    }
}

/// serde_yaml view of the message tree
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, message: &Message) -> Result<String, FormatError> {
        serde_yaml::to_string(message)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "YAML rendering of the parsed tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hl7::parser::parse;

    #[test]
    fn registry_knows_all_builtin_formats() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.list_formats(), vec!["json", "tree", "wire", "yaml"]);
    }

    #[test]
    fn unknown_format_is_an_error() {
        let registry = FormatRegistry::with_defaults();
        let msg = parse("MSH|^~\\&").unwrap();
        assert_eq!(
            registry.serialize(&msg, "xml"),
            Err(FormatError::FormatNotFound("xml".to_string()))
        );
    }

    #[test]
    fn wire_format_is_the_serializer_output() {
        let registry = FormatRegistry::with_defaults();
        let msg = parse("MSH|^~\\&|A\rPID|1").unwrap();
        assert_eq!(
            registry.serialize(&msg, "wire").unwrap(),
            "MSH|^~\\&|A\rPID|1"
        );
    }
}
