//! Domain-specific error types for the mockup engine
//!
//! # Error Categories
//!
//! - **MockupError**: caller bugs at the typed boundary (unknown keys, bad box fields)
//! - **StorageError**: key-value persistence of box overrides
//! - **AssetError**: asset listing and upload collaborators
//! - **InquiryError**: submission payload validation
//!
//! Missing assets, empty colors and out-of-range box nudges are not errors; the
//! engine handles them as ordinary states and never raises one of these types for them.
//!
//! # Examples
//!
//! ```rust
//! use mockup::errors::{MockupError, MockupResult};
//! use mockup::registry::PrintAreaKey;
//!
//! fn parse(key: &str) -> MockupResult<PrintAreaKey> {
//!     key.parse()
//! }
//!
//! assert!(parse("front_left_chest").is_ok());
//! assert!(matches!(
//!     parse("front_middle"),
//!     Err(MockupError::UnknownPrintArea(_))
//! ));
//! ```

pub mod asset;
pub mod inquiry;
pub mod mockup;
pub mod storage;

pub use asset::AssetError;
pub use inquiry::InquiryError;
pub use mockup::MockupError;
pub use storage::StorageError;

/// Result type alias for typed-boundary operations
pub type MockupResult<T> = Result<T, MockupError>;

/// Result type alias for box-override persistence
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for asset and upload collaborators
pub type AssetResult<T> = Result<T, AssetError>;

/// Result type alias for inquiry submission
pub type InquiryResult<T> = Result<T, InquiryError>;
