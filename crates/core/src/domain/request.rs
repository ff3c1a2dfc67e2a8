// Request Domain Model
// Resolved input values, keyed by declared input name

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::error::{DomainError, Result};

/// Literal scalar value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Integer(i64),
    String(String),
}

impl LiteralValue {
    /// Command-line rendering of the literal
    ///
    /// Integers are rendered from the parsed value, so `030` and `+30` both
    /// come out as `30`.
    pub fn source(&self) -> String {
        match self {
            LiteralValue::Integer(v) => v.to_string(),
            LiteralValue::String(s) => s.clone(),
        }
    }
}

/// Uploaded document, already stored on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file: PathBuf,
    pub mime_type: String,
}

/// Two-dimensional bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub crs: String,
    pub lower: [f64; 2],
    pub upper: [f64; 2],
}

impl BoundingBox {
    pub const DEFAULT_CRS: &'static str = "EPSG:4326";
}

/// One resolved occurrence of an input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    Literal(LiteralValue),
    Document(DocumentRef),
    BoundingBox(BoundingBox),
}

impl InputValue {
    pub fn integer(v: i64) -> Self {
        InputValue::Literal(LiteralValue::Integer(v))
    }

    pub fn string(s: impl Into<String>) -> Self {
        InputValue::Literal(LiteralValue::String(s.into()))
    }

    pub fn document(file: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        InputValue::Document(DocumentRef {
            file: file.into(),
            mime_type: mime_type.into(),
        })
    }
}

/// Runtime-bound request
///
/// Values are bound and validated by the host before any process sees them,
/// so accessors only check presence and shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    inputs: HashMap<String, Vec<InputValue>>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an occurrence of `name`
    pub fn push(&mut self, name: impl Into<String>, value: InputValue) {
        self.inputs.entry(name.into()).or_default().push(value);
    }

    /// Builder-style variant of [`Request::push`]
    pub fn with(mut self, name: impl Into<String>, value: InputValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn values(&self, name: &str) -> &[InputValue] {
        self.inputs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn occurrences(&self, name: &str) -> usize {
        self.values(name).len()
    }

    /// First occurrence, if any
    pub fn first(&self, name: &str) -> Option<&InputValue> {
        self.values(name).first()
    }

    fn require(&self, name: &str) -> Result<&InputValue> {
        self.first(name)
            .ok_or_else(|| DomainError::MissingInput(name.to_string()))
    }

    /// Rendering of the first occurrence of a literal input
    pub fn literal(&self, name: &str) -> Result<String> {
        match self.require(name)? {
            InputValue::Literal(v) => Ok(v.source()),
            _ => Err(type_error(name, "literal")),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            InputValue::Literal(LiteralValue::Integer(v)) => Ok(*v),
            _ => Err(type_error(name, "integer literal")),
        }
    }

    /// Local file of the first occurrence of a complex input
    pub fn document(&self, name: &str) -> Result<&Path> {
        match self.require(name)? {
            InputValue::Document(doc) => Ok(doc.file.as_path()),
            _ => Err(type_error(name, "complex document")),
        }
    }
}

fn type_error(name: &str, expected: &str) -> DomainError {
    DomainError::InputType {
        name: name.to_string(),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_source() {
        let req = Request::new()
            .with("n", InputValue::integer(30))
            .with("s", InputValue::string("/vol/in"));

        assert_eq!(req.literal("n").unwrap(), "30");
        assert_eq!(req.integer("n").unwrap(), 30);
        assert_eq!(req.literal("s").unwrap(), "/vol/in");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let req = Request::new()
            .with("dir", InputValue::string("/a"))
            .with("dir", InputValue::string("/b"));

        assert_eq!(req.occurrences("dir"), 2);
        assert_eq!(req.literal("dir").unwrap(), "/a");
    }

    #[test]
    fn test_missing_input() {
        let req = Request::new();
        assert!(matches!(
            req.literal("absent"),
            Err(DomainError::MissingInput(_))
        ));
        assert!(req.first("absent").is_none());
        assert_eq!(req.occurrences("absent"), 0);
    }

    #[test]
    fn test_integer_rendered_canonically() {
        let zero_padded: i64 = "030".parse().unwrap();
        let signed: i64 = "+30".parse().unwrap();
        let req = Request::new()
            .with("a", InputValue::integer(zero_padded))
            .with("b", InputValue::integer(signed));

        assert_eq!(req.literal("a").unwrap(), "30");
        assert_eq!(req.literal("b").unwrap(), "30");
    }

    #[test]
    fn test_wrong_shape() {
        let req = Request::new().with("doc", InputValue::string("not a document"));
        assert!(matches!(
            req.document("doc"),
            Err(DomainError::InputType { .. })
        ));
        assert!(req.integer("doc").is_err());
    }
}
