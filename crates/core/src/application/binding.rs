// Request Binding - raw name=value pairs -> validated, typed Request
// Stands in for the WPS framework's own input validation

use crate::domain::{BoundingBox, FieldKind, InputField, InputValue, ProcessDescriptor, Request};
use crate::error::{AppError, Result};

/// One raw input occurrence, e.g. from `-i cloud_percentage=30`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub name: String,
    pub value: String,
}

impl RawInput {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl std::str::FromStr for RawInput {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, value) = s.split_once('=').ok_or_else(|| {
            AppError::Validation(format!("expected name=value, got '{}'", s))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(format!("empty input name in '{}'", s)));
        }
        Ok(Self::new(name, value))
    }
}

/// Bind raw inputs against a descriptor
///
/// # Errors
/// - AppError::Validation for unknown inputs, cardinality violations,
///   unparseable values, constraint violations and unreadable documents
pub fn bind_request(descriptor: &ProcessDescriptor, raw: &[RawInput]) -> Result<Request> {
    let mut request = Request::new();

    for input in raw {
        let field = descriptor.input(&input.name).ok_or_else(|| {
            AppError::Validation(format!(
                "process '{}' has no input '{}'",
                descriptor.identifier, input.name
            ))
        })?;
        request.push(field.name.clone(), parse_value(field, &input.value)?);
    }

    for field in &descriptor.inputs {
        let count = request.occurrences(&field.name);
        if !field.cardinality.contains(count) {
            return Err(AppError::Validation(format!(
                "input '{}' expects {} occurrence(s), got {}",
                field.name, field.cardinality, count
            )));
        }
    }

    Ok(request)
}

fn parse_value(field: &InputField, raw: &str) -> Result<InputValue> {
    let value = match field.kind {
        FieldKind::LiteralInteger => {
            let v = raw.trim().parse::<i64>().map_err(|_| {
                AppError::Validation(format!(
                    "input '{}' expects an integer, got '{}'",
                    field.name, raw
                ))
            })?;
            InputValue::integer(v)
        }
        FieldKind::LiteralString => InputValue::string(raw),
        FieldKind::ComplexDocument => parse_document(field, raw)?,
        FieldKind::BoundingBox => InputValue::BoundingBox(parse_bbox(field, raw)?),
    };

    if field.kind.is_literal() && !field.constraint.admits(raw.trim()) {
        return Err(AppError::Validation(format!(
            "input '{}' value '{}' violates constraint {}",
            field.name, raw, field.constraint
        )));
    }

    Ok(value)
}

/// Documents are passed by local path; the first declared format applies
///
/// The stored path is absolute: commands run in the scripts directory and must
/// not resolve it against their own working directory.
fn parse_document(field: &InputField, raw: &str) -> Result<InputValue> {
    let file = std::path::absolute(raw.trim()).map_err(|e| {
        AppError::Validation(format!(
            "input '{}' document path '{}' is invalid: {}",
            field.name, raw, e
        ))
    })?;
    let format = field
        .formats
        .first()
        .ok_or_else(|| AppError::Config(format!("input '{}' has no format", field.name)))?;

    let content = std::fs::read_to_string(&file).map_err(|e| {
        AppError::Validation(format!(
            "input '{}' document {} is not readable: {}",
            field.name,
            file.display(),
            e
        ))
    })?;

    if format.is_json() {
        serde_json::from_str::<serde_json::Value>(&content).map_err(|e| {
            AppError::Validation(format!(
                "input '{}' document {} is not valid {}: {}",
                field.name,
                file.display(),
                format.mime_type,
                e
            ))
        })?;
    }

    Ok(InputValue::document(file, format.mime_type.clone()))
}

/// `minx,miny,maxx,maxy[,crs]`
fn parse_bbox(field: &InputField, raw: &str) -> Result<BoundingBox> {
    let invalid = || {
        AppError::Validation(format!(
            "input '{}' expects minx,miny,maxx,maxy[,crs], got '{}'",
            field.name, raw
        ))
    };

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 && parts.len() != 5 {
        return Err(invalid());
    }

    let mut coords = [0f64; 4];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| invalid())?;
    }
    if coords[0] > coords[2] || coords[1] > coords[3] {
        return Err(invalid());
    }

    let crs = parts
        .get(4)
        .map(|s| s.to_string())
        .unwrap_or_else(|| BoundingBox::DEFAULT_CRS.to_string());

    Ok(BoundingBox {
        crs,
        lower: [coords[0], coords[1]],
        upper: [coords[2], coords[3]],
    })
}
