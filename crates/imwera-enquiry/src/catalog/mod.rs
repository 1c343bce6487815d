//! Read-only brokerage catalogue: origins, service offerings, and FAQs.

mod faqs;
mod origins;
mod router;
mod services;

pub use faqs::{brokerage_faqs, Faq};
pub use origins::{Origin, OriginProfile, ORIGIN_NAMES};
pub use router::catalog_router;
pub use services::{service_offerings, ServiceIcon, ServiceOffering};
