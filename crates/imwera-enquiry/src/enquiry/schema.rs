use crate::catalog::ORIGIN_NAMES;

use super::domain::EnquiryKind;

/// Outbound placeholder for absent optional fields. Templates match on the literal.
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NONE_PROVIDED: &str = "None";
pub const NOT_PROVIDED: &str = "Not provided";

const VOLUME_OPTIONS: &[&str] = &["samples", "1-5", "10-50", "container", "unsure"];
const BUYER_TYPE_OPTIONS: &[&str] = &[
    "roaster", "trader", "importer", "exporter", "producer", "other",
];
const REPRESENTING_OPTIONS: &[&str] = &["farm", "coop", "exporter", "milling", "other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Email,
    /// Single value drawn from a fixed option list.
    Choice { options: &'static [&'static str] },
    /// Multi-select drawn from a fixed option list.
    Selection { options: &'static [&'static str] },
}

/// One declared form field and how it maps onto template parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub param: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Literal sent when an optional field is absent.
    pub fallback: &'static str,
}

impl FieldSpec {
    const fn required(name: &'static str, param: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            param,
            field_type,
            required: true,
            fallback: NOT_SPECIFIED,
        }
    }

    const fn optional(name: &'static str, param: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            param,
            field_type,
            required: false,
            fallback: NOT_SPECIFIED,
        }
    }

    const fn with_fallback(mut self, fallback: &'static str) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Field layout of one enquiry kind, in declaration order.
#[derive(Debug, PartialEq, Eq)]
pub struct EnquirySchema {
    pub kind: EnquiryKind,
    pub fields: &'static [FieldSpec],
}

static SOURCING_FIELDS: [FieldSpec; 10] = [
    FieldSpec::required("name", "from_name", FieldType::Text),
    FieldSpec::required("company", "company", FieldType::Text),
    FieldSpec::optional("role", "role", FieldType::Text),
    FieldSpec::required("email", "from_email", FieldType::Email),
    FieldSpec::required("country", "country", FieldType::Text),
    FieldSpec::required(
        "origins",
        "origins",
        FieldType::Selection {
            options: &ORIGIN_NAMES,
        },
    ),
    FieldSpec::optional(
        "volume",
        "volume",
        FieldType::Choice {
            options: VOLUME_OPTIONS,
        },
    ),
    FieldSpec::optional("shippingWindow", "shipping_window", FieldType::Text),
    FieldSpec::optional("processingPreference", "processing_preference", FieldType::Text),
    FieldSpec::optional("notes", "notes", FieldType::Text).with_fallback(NONE_PROVIDED),
];

static CONTACT_FIELDS: [FieldSpec; 6] = [
    FieldSpec::required("name", "from_name", FieldType::Text),
    FieldSpec::optional("company", "company", FieldType::Text),
    FieldSpec::required("email", "from_email", FieldType::Email),
    FieldSpec::required("country", "country", FieldType::Text),
    FieldSpec::optional(
        "buyerType",
        "buyer_type",
        FieldType::Choice {
            options: BUYER_TYPE_OPTIONS,
        },
    ),
    FieldSpec::required("message", "message", FieldType::Text),
];

static PARTNER_FIELDS: [FieldSpec; 8] = [
    FieldSpec::required("name", "from_name", FieldType::Text),
    FieldSpec::required("organization", "organization", FieldType::Text),
    FieldSpec::required("role", "role", FieldType::Text),
    FieldSpec::required("email", "from_email", FieldType::Email),
    FieldSpec::required("country", "country", FieldType::Text),
    FieldSpec::optional(
        "representing",
        "representing",
        FieldType::Choice {
            options: REPRESENTING_OPTIONS,
        },
    ),
    FieldSpec::required("description", "description", FieldType::Text),
    FieldSpec::optional("websiteLink", "website_link", FieldType::Text).with_fallback(NOT_PROVIDED),
];

static SOURCING_SCHEMA: EnquirySchema = EnquirySchema {
    kind: EnquiryKind::Sourcing,
    fields: &SOURCING_FIELDS,
};

static CONTACT_SCHEMA: EnquirySchema = EnquirySchema {
    kind: EnquiryKind::GeneralContact,
    fields: &CONTACT_FIELDS,
};

static PARTNER_SCHEMA: EnquirySchema = EnquirySchema {
    kind: EnquiryKind::PartnerIntroduction,
    fields: &PARTNER_FIELDS,
};

impl EnquirySchema {
    pub fn for_kind(kind: EnquiryKind) -> &'static EnquirySchema {
        match kind {
            EnquiryKind::Sourcing => &SOURCING_SCHEMA,
            EnquiryKind::GeneralContact => &CONTACT_SCHEMA,
            EnquiryKind::PartnerIntroduction => &PARTNER_SCHEMA,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Value of the `form_type` template parameter.
    pub fn form_type(&self) -> &'static str {
        self.kind.label()
    }
}
