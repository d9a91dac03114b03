use thiserror::Error;

/// Inquiry submission validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InquiryError {
    /// Group name, representative name or contact left blank
    #[error("group name, representative name and contact are required (missing: {})", .0.join(", "))]
    MissingContact(Vec<&'static str>),

    /// Quantity that is not an integer of at least 1
    #[error("quantity must be a whole number of at least 1, got '{0}'")]
    InvalidQuantity(String),
}
