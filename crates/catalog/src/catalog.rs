//! The catalog document: owns every entity and answers lookups and policy
//! queries over them.
//!
//! A document is deserialized, then [`initialize`](ValidatingConfig::initialize)d
//! and [`validate`](ValidatingConfig::validate)d, in that order, by a single
//! owner. From then on it is read-only and may be shared freely.

use core::ptr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use billcat_core::{
    CatalogApiError, CatalogEntity, CatalogResult, SourceLocation, ValidatingConfig,
    ValidationError, ValidationErrors, check_unique_names, validate_all,
};

use crate::lookup::CatalogLookup;
use crate::phase::{self, DefaultPlanPhase};
use crate::plan::DefaultPlan;
use crate::price_list::{DefaultPriceList, DefaultPriceListSet};
use crate::product::DefaultProduct;
use crate::rules::{PlanChangeResult, PlanRules};
use crate::specifier::{PlanPhaseSpecifier, PlanSpecifier};
use crate::types::{
    ActionPolicy, BillingAlignment, BillingPeriod, Currency, PlanAlignmentChange,
    PlanAlignmentCreate,
};

/// An add-on plan together with a price list that offers it alongside the
/// base product.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Listing<'c> {
    pub plan: &'c DefaultPlan,
    pub price_list: &'c DefaultPriceList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandaloneCatalog {
    effective_date: DateTime<Utc>,
    catalog_name: String,
    #[serde(skip)]
    catalog_uri: Option<SourceLocation>,
    #[serde(default)]
    supported_currencies: Vec<Currency>,
    #[serde(default)]
    products: Vec<DefaultProduct>,
    #[serde(default)]
    plans: Vec<DefaultPlan>,
    #[serde(default)]
    plan_rules: PlanRules,
    #[serde(default)]
    price_lists: Option<DefaultPriceListSet>,
}

impl StandaloneCatalog {
    pub fn new(catalog_name: impl Into<String>, effective_date: DateTime<Utc>) -> Self {
        Self {
            effective_date,
            catalog_name: catalog_name.into(),
            catalog_uri: None,
            supported_currencies: Vec::new(),
            products: Vec::new(),
            plans: Vec::new(),
            plan_rules: PlanRules::default(),
            price_lists: None,
        }
    }

    pub fn with_supported_currencies(mut self, currencies: Vec<Currency>) -> Self {
        self.supported_currencies = currencies;
        self
    }

    pub fn with_products(mut self, products: Vec<DefaultProduct>) -> Self {
        self.products = products;
        self
    }

    pub fn with_plans(mut self, plans: Vec<DefaultPlan>) -> Self {
        self.plans = plans;
        self
    }

    pub fn with_plan_rules(mut self, plan_rules: PlanRules) -> Self {
        self.plan_rules = plan_rules;
        self
    }

    pub fn with_price_lists(mut self, price_lists: DefaultPriceListSet) -> Self {
        self.price_lists = Some(price_lists);
        self
    }

    pub fn effective_date(&self) -> DateTime<Utc> {
        self.effective_date
    }

    pub fn catalog_uri(&self) -> Option<&SourceLocation> {
        self.catalog_uri.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog_uri.is_some()
    }

    pub fn current_products(&self) -> &[DefaultProduct] {
        &self.products
    }

    pub fn current_plans(&self) -> &[DefaultPlan] {
        &self.plans
    }

    pub fn plan_rules(&self) -> &PlanRules {
        &self.plan_rules
    }

    pub fn price_lists(&self) -> Option<&DefaultPriceListSet> {
        self.price_lists.as_ref()
    }

    pub fn find_current_product(&self, name: Option<&str>) -> CatalogResult<&DefaultProduct> {
        let Some(wanted) = name else {
            return Err(CatalogApiError::no_such_product(None));
        };
        self.products
            .iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| CatalogApiError::no_such_product(name))
    }

    pub fn find_current_plan(&self, name: Option<&str>) -> CatalogResult<&DefaultPlan> {
        let Some(wanted) = name else {
            return Err(CatalogApiError::no_such_plan(None));
        };
        self.plans
            .iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| CatalogApiError::no_such_plan(name))
    }

    /// Plan offered for `product_name` billed every `period` by the named
    /// price list, or by the default list when that one offers none.
    pub fn find_current_plan_for(
        &self,
        product_name: Option<&str>,
        period: Option<BillingPeriod>,
        price_list_name: Option<&str>,
    ) -> CatalogResult<&DefaultPlan> {
        let Some(product_name) = product_name else {
            return Err(CatalogApiError::null_product_name());
        };
        let price_lists = self.price_list_set(price_list_name)?;
        let product = self.find_current_product(Some(product_name))?;

        price_lists
            .plan_for(self, price_list_name, product, period)?
            .ok_or_else(|| {
                let period = period.map_or("NULL", BillingPeriod::as_str);
                CatalogApiError::plan_not_found(product_name, period, price_list_name)
            })
    }

    /// Phase named `<plan name>-<phase type>`.
    pub fn find_current_phase(&self, name: Option<&str>) -> CatalogResult<&DefaultPlanPhase> {
        let Some(name) = name else {
            return Err(CatalogApiError::no_such_phase(None));
        };
        let plan_name = phase::plan_name(name)?;
        let plan = self.find_current_plan(Some(plan_name))?;
        plan.find_phase(name)
    }

    pub fn find_current_pricelist(&self, name: Option<&str>) -> CatalogResult<&DefaultPriceList> {
        if name.is_none() {
            return Err(CatalogApiError::price_list_not_found(None, &self.catalog_name));
        }
        self.price_list_set(name)?.find_price_list(name)
    }

    pub fn plan_change_policy(
        &self,
        from: &PlanPhaseSpecifier,
        to: &PlanSpecifier,
    ) -> CatalogResult<ActionPolicy> {
        self.plan_rules.plan_change_policy(from, to, self)
    }

    pub fn plan_change_alignment(
        &self,
        from: &PlanPhaseSpecifier,
        to: &PlanSpecifier,
    ) -> CatalogResult<PlanAlignmentChange> {
        self.plan_rules.plan_change_alignment(from, to, self)
    }

    pub fn plan_cancel_policy(&self, from: &PlanPhaseSpecifier) -> CatalogResult<ActionPolicy> {
        self.plan_rules.plan_cancel_policy(from, self)
    }

    pub fn plan_create_alignment(&self, to: &PlanSpecifier) -> CatalogResult<PlanAlignmentCreate> {
        self.plan_rules.plan_create_alignment(to, self)
    }

    pub fn billing_alignment(&self, from: &PlanPhaseSpecifier) -> CatalogResult<BillingAlignment> {
        self.plan_rules.billing_alignment(from, self)
    }

    pub fn plan_change(
        &self,
        from: &PlanPhaseSpecifier,
        to: &PlanSpecifier,
    ) -> CatalogResult<PlanChangeResult<'_>> {
        self.plan_rules.plan_change(from, to, self)
    }

    /// True when the product, the plan it resolves to and the price list
    /// are all active.
    pub fn can_create_plan(&self, specifier: &PlanSpecifier) -> CatalogResult<bool> {
        let product = self.find_current_product(specifier.product_name())?;
        let plan = self.find_current_plan_for(
            specifier.product_name(),
            specifier.billing_period(),
            specifier.price_list_name(),
        )?;
        let price_list = self
            .price_list_set(specifier.price_list_name())?
            .resolve(specifier.price_list_name())?;

        Ok(!product.is_retired() && !plan.is_retired() && !price_list.is_retired())
    }

    /// Add-on plans that can be bought on top of `base_product_name`, each
    /// paired with a price list that offers both the add-on plan and a base
    /// plan of the same billing period.
    ///
    /// Unknown products yield an empty list rather than an error.
    pub fn available_addon_listings(&self, base_product_name: Option<&str>) -> Vec<Listing<'_>> {
        match self.addon_listings(base_product_name) {
            Ok(listings) => listings,
            Err(error) => {
                debug!(
                    base_product = base_product_name.unwrap_or("null"),
                    %error,
                    "add-on listing lookup failed, returning no listings"
                );
                Vec::new()
            }
        }
    }

    fn addon_listings(&self, base_product_name: Option<&str>) -> CatalogResult<Vec<Listing<'_>>> {
        let base = self.find_current_product(base_product_name)?;
        let Some(price_lists) = self.price_lists.as_ref() else {
            return Ok(Vec::new());
        };

        let mut listings = Vec::new();
        for addon_name in base.available() {
            let addon = self.find_current_product(Some(addon_name.as_str()))?;
            for plan in self.plans.iter().filter(|p| p.product_name() == addon.name()) {
                let period = Some(plan.billing_period());
                for price_list in price_lists.all_price_lists() {
                    let offers_addon = price_list
                        .find_plan(self, addon, period)
                        .is_some_and(|found| ptr::eq(found, plan));
                    if offers_addon && price_list.find_plan(self, base, period).is_some() {
                        listings.push(Listing { plan, price_list });
                    }
                }
            }
        }
        Ok(listings)
    }

    fn price_list_set(&self, name: Option<&str>) -> CatalogResult<&DefaultPriceListSet> {
        self.price_lists
            .as_ref()
            .ok_or_else(|| CatalogApiError::price_list_not_found(name, &self.catalog_name))
    }

    fn report(&self, errors: &mut ValidationErrors, description: &str) {
        errors.add(ValidationError::new(
            description,
            self.catalog_uri.as_ref(),
            "Catalog",
            &self.catalog_name,
        ));
    }
}

impl CatalogLookup for StandaloneCatalog {
    fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    fn source_location(&self) -> Option<&SourceLocation> {
        self.catalog_uri.as_ref()
    }

    fn supported_currencies(&self) -> &[Currency] {
        &self.supported_currencies
    }

    fn find_current_product(&self, name: Option<&str>) -> CatalogResult<&DefaultProduct> {
        StandaloneCatalog::find_current_product(self, name)
    }

    fn find_current_plan(&self, name: Option<&str>) -> CatalogResult<&DefaultPlan> {
        StandaloneCatalog::find_current_plan(self, name)
    }

    fn find_current_pricelist(&self, name: Option<&str>) -> CatalogResult<&DefaultPriceList> {
        StandaloneCatalog::find_current_pricelist(self, name)
    }

    fn default_price_list(&self) -> CatalogResult<&DefaultPriceList> {
        Ok(self.price_list_set(None)?.default_price_list())
    }
}

impl ValidatingConfig for StandaloneCatalog {
    type Context = dyn CatalogLookup;

    /// Validates the whole document. `catalog` is the context nested entities
    /// resolve names against; pass the document itself.
    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors {
        let before = errors.len();
        debug!(catalog = %self.catalog_name, "validating catalog");

        if self.supported_currencies.is_empty() {
            self.report(errors, "catalog supports no currencies");
        }
        let source = catalog.source_location();
        check_unique_names(&self.products, source, errors);
        check_unique_names(&self.plans, source, errors);

        validate_all(&self.products, catalog, errors);
        validate_all(&self.plans, catalog, errors);
        match &self.price_lists {
            Some(price_lists) => {
                price_lists.validate(catalog, errors);
            }
            None => self.report(errors, "catalog has no price lists"),
        }
        self.plan_rules.validate(catalog, errors);

        debug!(
            catalog = %self.catalog_name,
            errors = errors.len() - before,
            "catalog validated"
        );
        errors
    }

    fn initialize(&mut self, source: &SourceLocation) {
        debug!(catalog = %self.catalog_name, %source, "initializing catalog");
        self.catalog_uri = Some(source.clone());
        self.plan_rules.initialize(source);
        if let Some(price_lists) = self.price_lists.as_mut() {
            price_lists.initialize(source);
        }
        for product in &mut self.products {
            product.initialize(source);
        }
        for plan in &mut self.plans {
            plan.initialize(source);
        }
    }
}
