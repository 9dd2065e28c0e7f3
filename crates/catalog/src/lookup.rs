//! Read-only name resolution over a catalog document.

use billcat_core::{CatalogResult, SourceLocation};

use crate::plan::DefaultPlan;
use crate::price_list::DefaultPriceList;
use crate::product::DefaultProduct;
use crate::types::Currency;

/// Name-resolution capability handed to entities during validation and to
/// the rules engine during matching.
///
/// [`StandaloneCatalog`](crate::StandaloneCatalog) is the production
/// implementation; tests may provide a stub.
pub trait CatalogLookup {
    fn catalog_name(&self) -> &str;

    /// Where the document was loaded from, once initialized.
    fn source_location(&self) -> Option<&SourceLocation>;

    fn supported_currencies(&self) -> &[Currency];

    fn find_current_product(&self, name: Option<&str>) -> CatalogResult<&DefaultProduct>;

    fn find_current_plan(&self, name: Option<&str>) -> CatalogResult<&DefaultPlan>;

    fn find_current_pricelist(&self, name: Option<&str>) -> CatalogResult<&DefaultPriceList>;

    /// The document-wide default price list.
    fn default_price_list(&self) -> CatalogResult<&DefaultPriceList>;
}
