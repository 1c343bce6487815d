use std::sync::Arc;

use super::domain::FormId;
use super::form::EnquiryForm;

/// Holds open form instances between requests so the service can be exercised in isolation.
pub trait FormRegistry: Send + Sync {
    fn insert(&self, form: Arc<EnquiryForm>) -> Result<(), RegistryError>;
    fn fetch(&self, id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError>;
    fn remove(&self, id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("form already registered")]
    Conflict,
    #[error("form registry unavailable: {0}")]
    Unavailable(String),
}
