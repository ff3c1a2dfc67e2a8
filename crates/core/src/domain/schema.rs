// Process Descriptor Domain Model

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::error::{DomainError, Result};

/// Kind of an input or output field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    LiteralInteger,
    LiteralString,
    ComplexDocument,
    BoundingBox,
}

impl FieldKind {
    pub fn is_literal(&self) -> bool {
        matches!(self, FieldKind::LiteralInteger | FieldKind::LiteralString)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::LiteralInteger => write!(f, "literal-integer"),
            FieldKind::LiteralString => write!(f, "literal-string"),
            FieldKind::ComplexDocument => write!(f, "complex-document"),
            FieldKind::BoundingBox => write!(f, "bounding-box"),
        }
    }
}

/// Occurrence bounds of an input field (WPS default: exactly one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    pub min_occurs: u32,
    pub max_occurs: u32,
}

impl Cardinality {
    pub const fn new(min_occurs: u32, max_occurs: u32) -> Self {
        Self {
            min_occurs,
            max_occurs,
        }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min_occurs as usize && count <= self.max_occurs as usize
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.min_occurs, self.max_occurs)
    }
}

/// Allowed-value constraint on a literal input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    None,
    Range { min: i64, max: i64 },
    AllowedSet { values: Vec<String> },
}

impl Constraint {
    /// Check a literal's textual source against the constraint
    pub fn admits(&self, source: &str) -> bool {
        match self {
            Constraint::None => true,
            Constraint::Range { min, max } => source
                .trim()
                .parse::<i64>()
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(false),
            Constraint::AllowedSet { values } => values.iter().any(|v| v == source),
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::None => write!(f, "-"),
            Constraint::Range { min, max } => write!(f, "[{}, {}]", min, max),
            Constraint::AllowedSet { values } => write!(f, "{{{}}}", values.join(", ")),
        }
    }
}

/// Document format accepted by a complex input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub mime_type: String,
}

impl Format {
    pub const GEOJSON: &'static str = "application/vnd.geo+json";
    pub const JSON: &'static str = "application/json";

    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
        }
    }

    pub fn geojson() -> Self {
        Self::new(Self::GEOJSON)
    }

    pub fn is_json(&self) -> bool {
        self.mime_type == Self::JSON || self.mime_type.ends_with("+json")
    }
}

/// Declared input field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    pub label: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub constraint: Constraint,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<Format>,
}

impl InputField {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            abstract_text: String::new(),
            kind,
            cardinality: Cardinality::default(),
            constraint: Constraint::None,
            formats: Vec::new(),
        }
    }

    pub fn integer(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::LiteralInteger)
    }

    pub fn string(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::LiteralString)
    }

    pub fn document(name: &str, label: &str, formats: Vec<Format>) -> Self {
        Self {
            formats,
            ..Self::new(name, label, FieldKind::ComplexDocument)
        }
    }

    pub fn bounding_box(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::BoundingBox)
    }

    pub fn with_abstract(mut self, text: &str) -> Self {
        self.abstract_text = text.to_string();
        self
    }

    pub fn with_occurs(mut self, min_occurs: u32, max_occurs: u32) -> Self {
        self.cardinality = Cardinality::new(min_occurs, max_occurs);
        self
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.constraint = Constraint::Range { min, max };
        self
    }

    pub fn with_allowed(mut self, values: &[&str]) -> Self {
        self.constraint = Constraint::AllowedSet {
            values: values.iter().map(|v| v.to_string()).collect(),
        };
        self
    }
}

/// Unit of measure attached to an output value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uom(String);

impl Uom {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn unity() -> Self {
        Self::new("unity")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Declared output field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputField {
    pub name: String,
    pub label: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<Uom>,
}

impl OutputField {
    pub fn string(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            abstract_text: String::new(),
            kind: FieldKind::LiteralString,
            uom: None,
        }
    }

    pub fn with_abstract(mut self, text: &str) -> Self {
        self.abstract_text = text.to_string();
        self
    }

    pub fn with_uom(mut self, uom: Uom) -> Self {
        self.uom = Some(uom);
        self
    }
}

/// Immutable description of a WPS process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub identifier: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub version: String,
    pub metadata: Vec<String>,
    pub profile: String,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputField>,
}

impl ProcessDescriptor {
    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputField> {
        self.outputs.iter().find(|f| f.name == name)
    }

    /// Check the descriptor for configuration defects
    ///
    /// A defect here is a startup-time error: the process must not be registered.
    pub fn validate(&self) -> Result<()> {
        if self.identifier.trim().is_empty() {
            return Err(self.defect("identifier is empty"));
        }

        let mut seen = HashSet::new();
        for field in &self.inputs {
            if !seen.insert(field.name.as_str()) {
                return Err(self.defect(format!("duplicate input '{}'", field.name)));
            }
            self.validate_input(field)?;
        }

        let mut seen = HashSet::new();
        for field in &self.outputs {
            if !seen.insert(field.name.as_str()) {
                return Err(self.defect(format!("duplicate output '{}'", field.name)));
            }
        }

        Ok(())
    }

    fn validate_input(&self, field: &InputField) -> Result<()> {
        let c = field.cardinality;
        if c.max_occurs == 0 {
            return Err(self.defect(format!("input '{}' has max_occurs 0", field.name)));
        }
        if c.min_occurs > c.max_occurs {
            return Err(self.defect(format!(
                "input '{}' has min_occurs {} > max_occurs {}",
                field.name, c.min_occurs, c.max_occurs
            )));
        }

        match &field.constraint {
            Constraint::Range { min, max } => {
                if field.kind != FieldKind::LiteralInteger {
                    return Err(self.defect(format!(
                        "range constraint on non-integer input '{}'",
                        field.name
                    )));
                }
                if min > max {
                    return Err(self.defect(format!(
                        "input '{}' has empty range [{}, {}]",
                        field.name, min, max
                    )));
                }
            }
            Constraint::AllowedSet { values } if values.is_empty() => {
                return Err(self.defect(format!(
                    "input '{}' has an empty allowed-value set",
                    field.name
                )));
            }
            _ => {}
        }

        let is_complex = field.kind == FieldKind::ComplexDocument;
        if is_complex && field.formats.is_empty() {
            return Err(self.defect(format!(
                "complex input '{}' declares no supported format",
                field.name
            )));
        }
        if !is_complex && !field.formats.is_empty() {
            return Err(self.defect(format!(
                "formats declared on non-complex input '{}'",
                field.name
            )));
        }

        Ok(())
    }

    pub(crate) fn defect(&self, reason: impl Into<String>) -> DomainError {
        DomainError::SchemaDefect {
            process: self.identifier.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(inputs: Vec<InputField>) -> ProcessDescriptor {
        ProcessDescriptor {
            identifier: "test".to_string(),
            title: "Test".to_string(),
            abstract_text: String::new(),
            version: "0.1".to_string(),
            metadata: vec![],
            profile: String::new(),
            inputs,
            outputs: vec![OutputField::string("out", "Out")],
        }
    }

    #[test]
    fn test_valid_descriptor() {
        let d = descriptor(vec![
            InputField::integer("n", "N").with_range(0, 100),
            InputField::document("doc", "Doc", vec![Format::geojson()]),
            InputField::string("opt", "Opt").with_occurs(0, 1),
        ]);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_duplicate_input_rejected() {
        let d = descriptor(vec![
            InputField::integer("n", "N"),
            InputField::string("n", "N again"),
        ]);
        let err = d.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate input"));
    }

    #[test]
    fn test_inverted_cardinality_rejected() {
        let d = descriptor(vec![InputField::integer("n", "N").with_occurs(2, 1)]);
        assert!(d.validate().is_err());

        let d = descriptor(vec![InputField::integer("n", "N").with_occurs(0, 0)]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_bad_constraints_rejected() {
        let d = descriptor(vec![InputField::integer("n", "N").with_range(10, 0)]);
        assert!(d.validate().is_err());

        let d = descriptor(vec![InputField::string("s", "S").with_range(0, 10)]);
        assert!(d.validate().is_err());

        let d = descriptor(vec![InputField::string("s", "S").with_allowed(&[])]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_complex_formats_checked() {
        let d = descriptor(vec![InputField::document("doc", "Doc", vec![])]);
        assert!(d.validate().is_err());

        let mut field = InputField::string("s", "S");
        field.formats.push(Format::geojson());
        let d = descriptor(vec![field]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_constraint_admits() {
        let range = Constraint::Range { min: 0, max: 100 };
        assert!(range.admits("0"));
        assert!(range.admits("100"));
        assert!(!range.admits("101"));
        assert!(!range.admits("abc"));

        let set = Constraint::AllowedSet {
            values: vec!["S1".to_string(), "S2".to_string()],
        };
        assert!(set.admits("S2"));
        assert!(!set.admits("S3"));
    }

    #[test]
    fn test_descriptor_serializes_abstract_key() {
        let d = descriptor(vec![InputField::integer("n", "N").with_abstract("count")]);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["inputs"][0]["abstract"], "count");
        assert_eq!(json["inputs"][0]["kind"], "literal-integer");
        assert_eq!(json["inputs"][0]["constraint"]["type"], "none");
    }
}
