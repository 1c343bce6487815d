use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{EnquirySchema, FieldType};

/// Identifier wrapper for open enquiry forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(pub String);

impl FormId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three enquiry forms offered on the site, each with its own schema and template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnquiryKind {
    #[serde(rename = "sourcing")]
    Sourcing,
    #[serde(rename = "contact")]
    GeneralContact,
    #[serde(rename = "partner")]
    PartnerIntroduction,
}

impl EnquiryKind {
    pub const ALL: [EnquiryKind; 3] = [
        EnquiryKind::Sourcing,
        EnquiryKind::GeneralContact,
        EnquiryKind::PartnerIntroduction,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            EnquiryKind::Sourcing => "sourcing",
            EnquiryKind::GeneralContact => "contact",
            EnquiryKind::PartnerIntroduction => "partner",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnquiryKind::Sourcing => "Sourcing Enquiry",
            EnquiryKind::GeneralContact => "General Contact",
            EnquiryKind::PartnerIntroduction => "Partner Introduction",
        }
    }

    pub fn schema(self) -> &'static EnquirySchema {
        EnquirySchema::for_kind(self)
    }

    pub fn success_message(self) -> &'static str {
        match self {
            EnquiryKind::Sourcing => {
                "We'll review your requirements and respond within 1-2 business days."
            }
            EnquiryKind::GeneralContact => "Thank you for your message. We'll be in touch soon.",
            EnquiryKind::PartnerIntroduction => {
                "Thank you for your introduction. We'll review and follow up if there's a fit."
            }
        }
    }

    /// User-facing text for a failed send. The underlying cause is only logged.
    pub fn failure_message(self) -> &'static str {
        match self {
            EnquiryKind::Sourcing => {
                "There was an error submitting your enquiry. Please try again."
            }
            EnquiryKind::GeneralContact => {
                "There was an error sending your message. Please try again."
            }
            EnquiryKind::PartnerIntroduction => {
                "There was an error submitting your introduction. Please try again."
            }
        }
    }
}

impl fmt::Display for EnquiryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown enquiry kind '{0}' (expected sourcing, contact, or partner)")]
pub struct UnknownEnquiryKind(pub String);

impl FromStr for EnquiryKind {
    type Err = UnknownEnquiryKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_ascii_lowercase();
        EnquiryKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == needle)
            .ok_or_else(|| UnknownEnquiryKind(raw.to_string()))
    }
}

/// Value held by a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    /// Insertion-ordered, duplicate-free multi-select.
    Selection(Vec<String>),
}

impl FieldValue {
    pub fn empty_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Selection { .. } => FieldValue::Selection(Vec::new()),
            _ => FieldValue::Text(String::new()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Selection(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Non-blank items, treating a text value as a one-item selection.
    pub fn items(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(text) if text.trim().is_empty() => Vec::new(),
            FieldValue::Text(text) => vec![text.trim()],
            FieldValue::Selection(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            FieldValue::Selection(_) => None,
        }
    }
}

/// In-progress form values for one enquiry, keyed by field name.
///
/// Writes are never rejected here; schema checks happen at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnquiryDraft {
    kind: EnquiryKind,
    fields: BTreeMap<String, FieldValue>,
}

impl EnquiryDraft {
    pub fn new(kind: EnquiryKind) -> Self {
        let fields = kind
            .schema()
            .fields
            .iter()
            .map(|spec| (spec.name.to_string(), FieldValue::empty_for(spec.field_type)))
            .collect();
        Self { kind, fields }
    }

    /// Builds a draft from a submitted field map, applying each value through
    /// the same setters the form uses.
    pub fn from_fields(kind: EnquiryKind, values: BTreeMap<String, FieldValue>) -> Self {
        let mut draft = Self::new(kind);
        for (name, value) in values {
            match value {
                FieldValue::Text(text) => draft.set_field(&name, text),
                FieldValue::Selection(items) => {
                    draft.clear_selection(&name);
                    for item in items {
                        draft.toggle_set_field(&name, &item, true);
                    }
                }
            }
        }
        draft
    }

    pub fn kind(&self) -> EnquiryKind {
        self.kind
    }

    pub fn schema(&self) -> &'static EnquirySchema {
        self.kind.schema()
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Trimmed text for `name`, or `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn selection(&self, name: &str) -> Vec<&str> {
        self.fields
            .get(name)
            .map(FieldValue::items)
            .unwrap_or_default()
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .insert(name.to_string(), FieldValue::Text(value.into()));
    }

    pub fn toggle_set_field(&mut self, name: &str, item: &str, included: bool) {
        let entry = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::Selection(Vec::new()));

        if let FieldValue::Text(_) = entry {
            *entry = FieldValue::Selection(Vec::new());
        }

        if let FieldValue::Selection(items) = entry {
            let present = items.iter().any(|existing| existing == item);
            if included && !present {
                items.push(item.to_string());
            } else if !included && present {
                items.retain(|existing| existing != item);
            }
        }
    }

    fn clear_selection(&mut self, name: &str) {
        self.fields
            .insert(name.to_string(), FieldValue::Selection(Vec::new()));
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }

    /// True when every field still holds its initial empty value.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(FieldValue::is_blank)
    }
}
