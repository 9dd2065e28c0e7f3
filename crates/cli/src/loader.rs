//! Document loader: decode, initialize, validate.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use billcat_catalog::{SourceLocation, StandaloneCatalog, ValidatingConfig, ValidationErrors};

/// An initialized document together with everything its validation found.
pub struct Loaded {
    pub catalog: StandaloneCatalog,
    pub errors: ValidationErrors,
}

impl Loaded {
    /// The document, or an error when validation found problems.
    pub fn into_valid(self) -> anyhow::Result<StandaloneCatalog> {
        if self.errors.is_empty() {
            return Ok(self.catalog);
        }
        for error in &self.errors {
            warn!(%error, "catalog validation error");
        }
        anyhow::bail!(
            "catalog has {} validation error(s); run `billcat validate` for details",
            self.errors.len()
        )
    }
}

pub fn load(path: &Path) -> anyhow::Result<Loaded> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let source = SourceLocation::new(format!("file://{}", absolute.display()));
    load_str(&text, source).with_context(|| format!("decoding catalog {}", path.display()))
}

pub fn load_str(text: &str, source: SourceLocation) -> anyhow::Result<Loaded> {
    let mut catalog: StandaloneCatalog = serde_json::from_str(text)?;
    catalog.initialize(&source);

    let mut errors = ValidationErrors::new();
    catalog.validate(&catalog, &mut errors);
    info!(%source, errors = errors.len(), "catalog loaded");

    Ok(Loaded { catalog, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use billcat_catalog::CatalogLookup;

    const FIXTURE: &str = include_str!("../../catalog/tests/fixtures/catalog.json");

    #[test]
    fn loads_initializes_and_validates() {
        let loaded = load_str(FIXTURE, SourceLocation::new("mem://fixture")).unwrap();
        assert!(loaded.errors.is_empty());
        assert!(loaded.catalog.is_initialized());
        assert_eq!(
            loaded.catalog.source_location().map(SourceLocation::as_str),
            Some("mem://fixture")
        );
        assert!(loaded.into_valid().is_ok());
    }

    #[test]
    fn invalid_document_is_refused() {
        let broken = FIXTURE.replace("\"product\": \"Pro\"", "\"product\": \"Shotgun\"");
        let loaded = load_str(&broken, SourceLocation::new("mem://broken")).unwrap();
        assert!(!loaded.errors.is_empty());

        let err = loaded.into_valid().unwrap_err();
        assert!(err.to_string().contains("validation error"));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(load_str("{", SourceLocation::new("mem://bad")).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("/nonexistent/catalog.json")).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
