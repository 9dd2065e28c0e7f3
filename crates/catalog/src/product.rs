use serde::{Deserialize, Serialize};

use billcat_core::{CatalogEntity, ValidatingConfig, ValidationError, ValidationErrors};

use crate::lookup::CatalogLookup;
use crate::types::ProductCategory;

/// A sellable product. Plans reference it by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultProduct {
    name: String,
    category: ProductCategory,
    #[serde(default)]
    retired: bool,
    /// Add-on products that may be purchased on top of this one.
    #[serde(default)]
    available: Vec<String>,
    /// Add-on products that come bundled with this one.
    #[serde(default)]
    included: Vec<String>,
}

impl DefaultProduct {
    pub fn new(name: impl Into<String>, category: ProductCategory) -> Self {
        Self {
            name: name.into(),
            category,
            retired: false,
            available: Vec::new(),
            included: Vec::new(),
        }
    }

    pub fn with_available<I, S>(mut self, addons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available = addons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_included<I, S>(mut self, addons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included = addons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_retired(mut self, retired: bool) -> Self {
        self.retired = retired;
        self
    }

    pub fn category(&self) -> ProductCategory {
        self.category
    }

    /// Names of the add-ons this product is compatible with.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn included(&self) -> &[String] {
        &self.included
    }

    fn validate_addons(
        &self,
        relation: &str,
        names: &[String],
        catalog: &dyn CatalogLookup,
        errors: &mut ValidationErrors,
    ) {
        for addon in names {
            let description = match catalog.find_current_product(Some(addon.as_str())) {
                Err(_) => format!("{relation} product '{addon}' does not exist"),
                Ok(product) if product.category() != ProductCategory::AddOn => {
                    format!("{relation} product '{addon}' is not an add-on")
                }
                Ok(_) => continue,
            };
            errors.add(ValidationError::new(
                description,
                catalog.source_location(),
                Self::KIND,
                &self.name,
            ));
        }
    }
}

impl CatalogEntity for DefaultProduct {
    const KIND: &'static str = "Product";

    fn name(&self) -> &str {
        &self.name
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

impl ValidatingConfig for DefaultProduct {
    type Context = dyn CatalogLookup;

    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors {
        if self.name.trim().is_empty() {
            errors.add(ValidationError::new(
                "product name cannot be empty",
                catalog.source_location(),
                Self::KIND,
                &self.name,
            ));
        }
        self.validate_addons("available", &self.available, catalog, errors);
        self.validate_addons("included", &self.included, catalog, errors);
        errors
    }
}
