use std::fmt;

use serde::Serialize;

use super::domain::{EnquiryDraft, FieldValue};
use super::schema::{EnquirySchema, FieldSpec, FieldType};

/// A single field-level problem found at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    #[error("{field} is required")]
    MissingField { field: String },
    #[error("{field} must be a valid email address")]
    InvalidEmail { field: String },
    #[error("select at least one option for {field}")]
    EmptySelection { field: String },
    #[error("'{value}' is not an accepted option for {field}")]
    UnknownOption { field: String, value: String },
}

impl Violation {
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingField { field }
            | Violation::InvalidEmail { field }
            | Violation::EmptySelection { field }
            | Violation::UnknownOption { field, .. } => field,
        }
    }
}

/// Non-empty list of violations in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.0
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(Violation::field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub type ValidationResult = Result<(), ValidationErrors>;

/// Checks `draft` against `schema` without touching it.
pub fn validate(draft: &EnquiryDraft, schema: &EnquirySchema) -> ValidationResult {
    let violations: Vec<Violation> = schema
        .fields
        .iter()
        .filter_map(|spec| check_field(spec, draft.get(spec.name)))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn check_field(spec: &FieldSpec, value: Option<&FieldValue>) -> Option<Violation> {
    let field = || spec.name.to_string();
    let items = value.map(FieldValue::items).unwrap_or_default();

    if items.is_empty() {
        if !spec.required {
            return None;
        }
        return Some(match spec.field_type {
            FieldType::Selection { .. } => Violation::EmptySelection { field: field() },
            _ => Violation::MissingField { field: field() },
        });
    }

    match spec.field_type {
        FieldType::Text => None,
        FieldType::Email => {
            let text = items.join(" ");
            (!is_email_shaped(&text)).then(|| Violation::InvalidEmail { field: field() })
        }
        FieldType::Choice { options } | FieldType::Selection { options } => items
            .into_iter()
            .find(|item| !options.iter().any(|option| option == item))
            .map(|value| Violation::UnknownOption {
                field: field(),
                value: value.to_string(),
            }),
    }
}

/// Exactly one `@`, with something on either side.
pub fn is_email_shaped(raw: &str) -> bool {
    let mut parts = raw.trim().split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_requires_single_at_with_both_sides() {
        assert!(is_email_shaped("jane@roastco.com"));
        assert!(is_email_shaped("  jane@roastco  "));
        for bad in ["", "jane", "@roastco.com", "jane@", "jane@@roastco.com", "a@b@c"] {
            assert!(!is_email_shaped(bad), "{bad:?} should be rejected");
        }
    }
}
