//! Named catalog entities.

use std::collections::HashSet;

use crate::{SourceLocation, ValidationError, ValidationErrors};

/// Catalog entity marker + minimal interface.
///
/// A catalog entity is identified by its name, which must be unique among
/// entities of the same kind within one document.
pub trait CatalogEntity {
    /// Human-readable kind used in validation reports (e.g. "Plan").
    const KIND: &'static str;

    fn name(&self) -> &str;

    /// Retired entities stay resolvable but cannot be used for new purchases.
    fn is_retired(&self) -> bool {
        false
    }
}

/// Report every name that appears more than once in `entities`.
pub fn check_unique_names<'a, T, I>(
    entities: I,
    source: Option<&SourceLocation>,
    errors: &mut ValidationErrors,
) where
    T: CatalogEntity + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    for entity in entities {
        if !seen.insert(entity.name()) {
            errors.add(ValidationError::new(
                format!("duplicate {} name '{}'", T::KIND, entity.name()),
                source,
                T::KIND,
                entity.name(),
            ));
        }
    }
}
