//! `billcat-core`: shared building blocks for catalog documents.
//!
//! This crate contains the query-time error model and the validation contract
//! every catalog entity implements. It knows nothing about concrete document
//! types.

pub mod entity;
pub mod error;
pub mod source;
pub mod validation;

pub use entity::{CatalogEntity, check_unique_names};
pub use error::{CatalogApiError, CatalogResult, ErrorCode};
pub use source::SourceLocation;
pub use validation::{ValidatingConfig, ValidationError, ValidationErrors, validate_all};
