//! Price lists: named groupings of plans, looked up by product and period.
//!
//! A price list references plans by name. The plans themselves are owned by
//! the catalog's plan collection, so a plan may appear in several lists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use billcat_core::{
    CatalogApiError, CatalogEntity, CatalogResult, SourceLocation, ValidatingConfig,
    ValidationError, ValidationErrors, check_unique_names, validate_all,
};

use crate::lookup::CatalogLookup;
use crate::plan::DefaultPlan;
use crate::product::DefaultProduct;
use crate::types::BillingPeriod;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPriceList {
    name: String,
    #[serde(default)]
    retired: bool,
    /// Names of the plans offered by this list.
    #[serde(default)]
    plans: Vec<String>,
}

impl DefaultPriceList {
    pub fn new<I, S>(name: impl Into<String>, plans: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            retired: false,
            plans: plans.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_retired(mut self, retired: bool) -> Self {
        self.retired = retired;
        self
    }

    pub fn plan_names(&self) -> &[String] {
        &self.plans
    }

    /// First plan of this list for `product` billed every `period`.
    ///
    /// Plan names that do not resolve in `catalog` are skipped; validation
    /// reports them.
    pub fn find_plan<'c, C>(
        &self,
        catalog: &'c C,
        product: &DefaultProduct,
        period: Option<BillingPeriod>,
    ) -> Option<&'c DefaultPlan>
    where
        C: CatalogLookup + ?Sized,
    {
        let period = period?;
        self.plans
            .iter()
            .filter_map(|name| catalog.find_current_plan(Some(name.as_str())).ok())
            .find(|plan| plan.product_name() == product.name() && plan.billing_period() == period)
    }

    fn report(&self, source: Option<&SourceLocation>, errors: &mut ValidationErrors, description: String) {
        errors.add(ValidationError::new(description, source, Self::KIND, &self.name));
    }
}

impl CatalogEntity for DefaultPriceList {
    const KIND: &'static str = "PriceList";

    fn name(&self) -> &str {
        &self.name
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

impl ValidatingConfig for DefaultPriceList {
    type Context = dyn CatalogLookup;

    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors {
        let source = catalog.source_location();
        let mut offered = HashSet::new();

        for name in &self.plans {
            match catalog.find_current_plan(Some(name.as_str())) {
                Err(_) => self.report(source, errors, format!("plan '{name}' does not exist")),
                Ok(plan) => {
                    if !offered.insert((plan.product_name(), plan.billing_period())) {
                        self.report(
                            source,
                            errors,
                            format!(
                                "more than one plan for product '{}' billed {}",
                                plan.product_name(),
                                plan.billing_period()
                            ),
                        );
                    }
                }
            }
        }
        errors
    }
}

/// All price lists of a document, one of which is the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPriceListSet {
    default_price_list: DefaultPriceList,
    #[serde(default)]
    child_price_lists: Vec<DefaultPriceList>,
}

impl DefaultPriceListSet {
    pub fn new(default_price_list: DefaultPriceList, child_price_lists: Vec<DefaultPriceList>) -> Self {
        Self {
            default_price_list,
            child_price_lists,
        }
    }

    pub fn default_price_list(&self) -> &DefaultPriceList {
        &self.default_price_list
    }

    pub fn child_price_lists(&self) -> &[DefaultPriceList] {
        &self.child_price_lists
    }

    /// The default list first, then the others in declaration order.
    pub fn all_price_lists(&self) -> impl Iterator<Item = &DefaultPriceList> {
        std::iter::once(&self.default_price_list).chain(&self.child_price_lists)
    }

    /// Price list named exactly `name`.
    pub fn find_price_list(&self, name: Option<&str>) -> CatalogResult<&DefaultPriceList> {
        let Some(wanted) = name else {
            return Err(CatalogApiError::no_such_price_list(None));
        };
        self.all_price_lists()
            .find(|pl| pl.name() == wanted)
            .ok_or_else(|| CatalogApiError::no_such_price_list(name))
    }

    /// Like [`find_price_list`](Self::find_price_list), except that an absent
    /// or empty name selects the default list.
    pub fn resolve(&self, name: Option<&str>) -> CatalogResult<&DefaultPriceList> {
        match name {
            None | Some("") => Ok(&self.default_price_list),
            Some(_) => self.find_price_list(name),
        }
    }

    /// Plan offered for `product` and `period` by the list named
    /// `price_list_name`, falling back to the default list when that list has
    /// none. `Ok(None)` means no list offers one.
    pub fn plan_for<'c, C>(
        &self,
        catalog: &'c C,
        price_list_name: Option<&str>,
        product: &DefaultProduct,
        period: Option<BillingPeriod>,
    ) -> CatalogResult<Option<&'c DefaultPlan>>
    where
        C: CatalogLookup + ?Sized,
    {
        let price_list = self.resolve(price_list_name)?;
        if let Some(plan) = price_list.find_plan(catalog, product, period) {
            return Ok(Some(plan));
        }
        Ok(self.default_price_list.find_plan(catalog, product, period))
    }
}

impl ValidatingConfig for DefaultPriceListSet {
    type Context = dyn CatalogLookup;

    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors {
        check_unique_names(self.all_price_lists(), catalog.source_location(), errors);
        self.default_price_list.validate(catalog, errors);
        validate_all(&self.child_price_lists, catalog, errors)
    }
}
