//! Rule cases and the first-match scan shared by every rule category.

use core::fmt;
use core::ptr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use billcat_core::{CatalogEntity, CatalogResult, ValidationError, ValidationErrors};

use crate::lookup::CatalogLookup;
use crate::price_list::DefaultPriceList;
use crate::product::DefaultProduct;
use crate::specifier::{PlanPhaseSpecifier, PlanSpecifier};
use crate::types::{BillingPeriod, PhaseType, ProductCategory};

/// The independent rule lists of a [`PlanRules`](super::PlanRules).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    ChangePolicy,
    ChangeAlignment,
    CancelPolicy,
    CreateAlignment,
    BillingAlignment,
    PriceList,
}

impl RuleCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleCategory::ChangePolicy => "change_policy",
            RuleCategory::ChangeAlignment => "change_alignment",
            RuleCategory::CancelPolicy => "cancel_policy",
            RuleCategory::CreateAlignment => "create_alignment",
            RuleCategory::BillingAlignment => "billing_alignment",
            RuleCategory::PriceList => "price_list",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query specifier with its names resolved through the catalog.
///
/// Rules compare products and price lists by identity, so both sides of a
/// comparison must come from the same document.
#[derive(Debug, Copy, Clone)]
pub struct ResolvedSpecifier<'c> {
    pub product: &'c DefaultProduct,
    pub billing_period: Option<BillingPeriod>,
    pub price_list: Option<&'c DefaultPriceList>,
    pub phase_type: Option<PhaseType>,
}

impl<'c> ResolvedSpecifier<'c> {
    /// Fails with the lookup error of the first name that does not resolve.
    /// An absent or empty price list name stays absent.
    pub fn plan<C>(catalog: &'c C, specifier: &PlanSpecifier) -> CatalogResult<Self>
    where
        C: CatalogLookup + ?Sized,
    {
        let product = catalog.find_current_product(specifier.product_name())?;
        let price_list = match specifier.price_list_name().filter(|name| !name.is_empty()) {
            Some(name) => Some(catalog.find_current_pricelist(Some(name))?),
            None => None,
        };
        Ok(Self {
            product,
            billing_period: specifier.billing_period(),
            price_list,
            phase_type: None,
        })
    }

    pub fn phase<C>(catalog: &'c C, specifier: &PlanPhaseSpecifier) -> CatalogResult<Self>
    where
        C: CatalogLookup + ?Sized,
    {
        let mut resolved = Self::plan(catalog, specifier.plan_specifier())?;
        resolved.phase_type = specifier.phase_type();
        Ok(resolved)
    }

    pub(crate) fn product_name(&self) -> &'c str {
        self.product.name()
    }
}

/// Pattern over a plan; every absent field is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<ProductCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_period: Option<BillingPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_list: Option<String>,
}

impl PlanPattern {
    /// Matches every plan.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn product(mut self, name: impl Into<String>) -> Self {
        self.product = Some(name.into());
        self
    }

    pub fn product_category(mut self, category: ProductCategory) -> Self {
        self.product_category = Some(category);
        self
    }

    pub fn billing_period(mut self, period: BillingPeriod) -> Self {
        self.billing_period = Some(period);
        self
    }

    pub fn price_list(mut self, name: impl Into<String>) -> Self {
        self.price_list = Some(name.into());
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.product.is_none()
            && self.product_category.is_none()
            && self.billing_period.is_none()
            && self.price_list.is_none()
    }

    /// A name in the pattern that no longer resolves is an error, not a miss.
    pub fn matches<C>(&self, catalog: &C, target: &ResolvedSpecifier<'_>) -> CatalogResult<bool>
    where
        C: CatalogLookup + ?Sized,
    {
        if let Some(name) = self.product.as_deref() {
            let product = catalog.find_current_product(Some(name))?;
            if !ptr::eq(product, target.product) {
                return Ok(false);
            }
        }
        if self
            .product_category
            .is_some_and(|category| category != target.product.category())
        {
            return Ok(false);
        }
        if self
            .billing_period
            .is_some_and(|period| Some(period) != target.billing_period)
        {
            return Ok(false);
        }
        if let Some(name) = self.price_list.as_deref() {
            let price_list = catalog.find_current_pricelist(Some(name))?;
            if !target.price_list.is_some_and(|pl| ptr::eq(pl, price_list)) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(crate) fn validate(
        &self,
        catalog: &dyn CatalogLookup,
        category: RuleCategory,
        errors: &mut ValidationErrors,
    ) {
        if let Some(name) = self.product.as_deref() {
            if catalog.find_current_product(Some(name)).is_err() {
                report(catalog, category, errors, format!("rule names unknown product '{name}'"));
            }
        }
        if let Some(name) = self.price_list.as_deref() {
            if catalog.find_current_pricelist(Some(name)).is_err() {
                report(catalog, category, errors, format!("rule names unknown price list '{name}'"));
            }
        }
    }
}

pub(crate) fn report(
    catalog: &dyn CatalogLookup,
    category: RuleCategory,
    errors: &mut ValidationErrors,
    description: String,
) {
    errors.add(ValidationError::new(
        description,
        catalog.source_location(),
        "PlanRules",
        category.as_str(),
    ));
}

/// Rule keyed on a plan and optionally on the phase the subscription is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasePhase<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_type: Option<PhaseType>,
    #[serde(default)]
    pub plan: PlanPattern,
    pub result: T,
}

impl<T> CasePhase<T> {
    pub fn new(plan: PlanPattern, result: T) -> Self {
        Self {
            phase_type: None,
            plan,
            result,
        }
    }

    pub fn default_rule(result: T) -> Self {
        Self::new(PlanPattern::any(), result)
    }

    pub fn in_phase(mut self, phase_type: PhaseType) -> Self {
        self.phase_type = Some(phase_type);
        self
    }

    pub fn is_default(&self) -> bool {
        self.phase_type.is_none() && self.plan.is_wildcard()
    }

    pub fn matches<C>(&self, catalog: &C, target: &ResolvedSpecifier<'_>) -> CatalogResult<bool>
    where
        C: CatalogLookup + ?Sized,
    {
        if self.phase_type.is_some() && self.phase_type != target.phase_type {
            return Ok(false);
        }
        self.plan.matches(catalog, target)
    }
}

/// Rule keyed on a plan only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasePlan<T> {
    #[serde(default)]
    pub plan: PlanPattern,
    pub result: T,
}

impl<T> CasePlan<T> {
    pub fn new(plan: PlanPattern, result: T) -> Self {
        Self { plan, result }
    }

    pub fn default_rule(result: T) -> Self {
        Self::new(PlanPattern::any(), result)
    }

    pub fn is_default(&self) -> bool {
        self.plan.is_wildcard()
    }

    pub fn matches<C>(&self, catalog: &C, target: &ResolvedSpecifier<'_>) -> CatalogResult<bool>
    where
        C: CatalogLookup + ?Sized,
    {
        self.plan.matches(catalog, target)
    }
}

/// Rule keyed on both sides of a plan change. `phase_type` refers to the
/// phase the subscription is leaving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseChange<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_type: Option<PhaseType>,
    #[serde(default)]
    pub from: PlanPattern,
    #[serde(default)]
    pub to: PlanPattern,
    pub result: T,
}

impl<T> CaseChange<T> {
    pub fn new(from: PlanPattern, to: PlanPattern, result: T) -> Self {
        Self {
            phase_type: None,
            from,
            to,
            result,
        }
    }

    pub fn default_rule(result: T) -> Self {
        Self::new(PlanPattern::any(), PlanPattern::any(), result)
    }

    pub fn in_phase(mut self, phase_type: PhaseType) -> Self {
        self.phase_type = Some(phase_type);
        self
    }

    pub fn is_default(&self) -> bool {
        self.phase_type.is_none() && self.from.is_wildcard() && self.to.is_wildcard()
    }

    pub fn matches<C>(
        &self,
        catalog: &C,
        from: &ResolvedSpecifier<'_>,
        to: &ResolvedSpecifier<'_>,
    ) -> CatalogResult<bool>
    where
        C: CatalogLookup + ?Sized,
    {
        if self.phase_type.is_some() && self.phase_type != from.phase_type {
            return Ok(false);
        }
        Ok(self.from.matches(catalog, from)? && self.to.matches(catalog, to)?)
    }
}

/// First case, in declaration order, for which `matches` holds.
pub(crate) fn first_match<'r, K, F>(
    category: RuleCategory,
    cases: &'r [K],
    mut matches: F,
) -> CatalogResult<Option<&'r K>>
where
    F: FnMut(&K) -> CatalogResult<bool>,
{
    for (index, case) in cases.iter().enumerate() {
        if matches(case)? {
            trace!(%category, index, "plan rule matched");
            return Ok(Some(case));
        }
    }
    trace!(%category, "no plan rule matched");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_is_a_wildcard() {
        assert!(PlanPattern::any().is_wildcard());
        assert!(!PlanPattern::any().billing_period(BillingPeriod::Annual).is_wildcard());
        assert!(!PlanPattern::any().product_category(ProductCategory::AddOn).is_wildcard());
    }

    #[test]
    fn default_rules_have_no_conditions() {
        assert!(CasePhase::default_rule(1).is_default());
        assert!(!CasePhase::default_rule(1).in_phase(PhaseType::Trial).is_default());
        assert!(CasePlan::default_rule(1).is_default());
        assert!(CaseChange::default_rule(1).is_default());
        assert!(!CaseChange::new(PlanPattern::any(), PlanPattern::any().product("Pro"), 1).is_default());
    }

    #[test]
    fn first_match_respects_declaration_order() {
        let cases = [1, 2, 3, 4];
        let hit = first_match(RuleCategory::CancelPolicy, &cases, |c| Ok(c % 2 == 0)).unwrap();
        assert_eq!(hit, Some(&2));

        let miss = first_match(RuleCategory::CancelPolicy, &cases, |c| Ok(*c > 10)).unwrap();
        assert_eq!(miss, None);
    }

    #[test]
    fn first_match_stops_on_the_first_error() {
        let cases = [1, 2, 3];
        let mut seen = Vec::new();
        let result = first_match(RuleCategory::PriceList, &cases, |c| {
            seen.push(*c);
            if *c == 2 {
                Err(billcat_core::CatalogApiError::no_such_product(Some("gone")))
            } else {
                Ok(false)
            }
        });
        assert!(result.is_err());
        assert_eq!(seen, [1, 2]);
    }

    #[test]
    fn pattern_serializes_without_wildcards() {
        let json = serde_json::to_value(PlanPattern::any().product("Basic")).unwrap();
        assert_eq!(json, serde_json::json!({ "product": "Basic" }));
    }

    #[test]
    fn category_names() {
        assert_eq!(RuleCategory::ChangePolicy.to_string(), "change_policy");
        assert_eq!(RuleCategory::PriceList.as_str(), "price_list");
    }
}
