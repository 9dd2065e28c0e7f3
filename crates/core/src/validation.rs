//! Accumulate-don't-throw validation contract.
//!
//! Validation never stops at the first problem: every entity appends what it
//! finds to a shared [`ValidationErrors`] sink so a catalog author gets the
//! complete list in one pass. Whether a document with errors is usable is the
//! caller's decision.

use serde::Serialize;

use crate::SourceLocation;

/// A single structural problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub description: String,
    pub source: Option<SourceLocation>,
    /// Kind of the offending entity (e.g. "Plan").
    pub object_type: &'static str,
    /// Name of the offending entity.
    pub object_name: String,
}

impl ValidationError {
    pub fn new(
        description: impl Into<String>,
        source: Option<&SourceLocation>,
        object_type: &'static str,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            source: source.cloned(),
            object_type,
            object_name: object_name.into(),
        }
    }
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} '{}': {}", self.object_type, self.object_name, self.description)?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

/// Ordered sink of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) -> &mut Self {
        self.0.push(error);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = core::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Validation and initialization contract shared by every catalog entity.
///
/// `Context` is the read-only document used for name resolution. It is
/// passed explicitly so entities can be validated against a stub context.
pub trait ValidatingConfig {
    type Context: ?Sized;

    /// Append every problem found to `errors` and hand the same sink back.
    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors;

    /// Bind back-references and record where the document was loaded from.
    ///
    /// Must be idempotent: a second call leaves the entity unchanged.
    fn initialize(&mut self, _source: &SourceLocation) {}
}

/// Validate every item of a collection into the same sink.
pub fn validate_all<'e, T: ValidatingConfig>(
    items: &[T],
    catalog: &T::Context,
    errors: &'e mut ValidationErrors,
) -> &'e mut ValidationErrors {
    for item in items {
        item.validate(catalog, errors);
    }
    errors
}
