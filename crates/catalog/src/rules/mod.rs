//! Plan rules: ordered, first-match-wins policy and alignment tables.
//!
//! Every category is an ordered list of cases. A query resolves its
//! specifiers through the catalog, then takes the result of the first case
//! whose non-wildcard fields all agree with it. Rule order is the precedence
//! chain; nothing reorders cases by specificity. Validation requires an
//! all-wildcard case in each policy category so that every well-formed query
//! finds an answer.

mod case;

use core::ptr;

use serde::{Deserialize, Serialize};

use billcat_core::{
    CatalogApiError, CatalogEntity, CatalogResult, ValidatingConfig, ValidationErrors,
};

pub use case::{CaseChange, CasePhase, CasePlan, PlanPattern, ResolvedSpecifier, RuleCategory};

use crate::lookup::CatalogLookup;
use crate::price_list::DefaultPriceList;
use crate::specifier::{PlanPhaseSpecifier, PlanSpecifier};
use crate::types::{ActionPolicy, BillingAlignment, PlanAlignmentChange, PlanAlignmentCreate};
use case::{first_match, report};

/// Outcome of a plan change: where the subscription lands and how.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlanChangeResult<'c> {
    pub new_price_list: &'c DefaultPriceList,
    pub policy: ActionPolicy,
    pub alignment: PlanAlignmentChange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRules {
    #[serde(default)]
    change_policy: Vec<CaseChange<ActionPolicy>>,
    #[serde(default)]
    change_alignment: Vec<CaseChange<PlanAlignmentChange>>,
    #[serde(default)]
    cancel_policy: Vec<CasePhase<ActionPolicy>>,
    #[serde(default)]
    create_alignment: Vec<CasePlan<PlanAlignmentCreate>>,
    #[serde(default)]
    billing_alignment: Vec<CasePhase<BillingAlignment>>,
    /// Price list a change lands on when the target names none.
    #[serde(default)]
    price_list: Vec<CasePlan<String>>,
}

impl PlanRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_change_policy(mut self, cases: Vec<CaseChange<ActionPolicy>>) -> Self {
        self.change_policy = cases;
        self
    }

    pub fn with_change_alignment(mut self, cases: Vec<CaseChange<PlanAlignmentChange>>) -> Self {
        self.change_alignment = cases;
        self
    }

    pub fn with_cancel_policy(mut self, cases: Vec<CasePhase<ActionPolicy>>) -> Self {
        self.cancel_policy = cases;
        self
    }

    pub fn with_create_alignment(mut self, cases: Vec<CasePlan<PlanAlignmentCreate>>) -> Self {
        self.create_alignment = cases;
        self
    }

    pub fn with_billing_alignment(mut self, cases: Vec<CasePhase<BillingAlignment>>) -> Self {
        self.billing_alignment = cases;
        self
    }

    pub fn with_price_list(mut self, cases: Vec<CasePlan<String>>) -> Self {
        self.price_list = cases;
        self
    }

    pub fn plan_change_policy<C>(
        &self,
        from: &PlanPhaseSpecifier,
        to: &PlanSpecifier,
        catalog: &C,
    ) -> CatalogResult<ActionPolicy>
    where
        C: CatalogLookup + ?Sized,
    {
        let from = ResolvedSpecifier::phase(catalog, from)?;
        let to = ResolvedSpecifier::plan(catalog, to)?;
        self.change_policy_for(catalog, &from, &to)
    }

    pub fn plan_change_alignment<C>(
        &self,
        from: &PlanPhaseSpecifier,
        to: &PlanSpecifier,
        catalog: &C,
    ) -> CatalogResult<PlanAlignmentChange>
    where
        C: CatalogLookup + ?Sized,
    {
        let from = ResolvedSpecifier::phase(catalog, from)?;
        let to = ResolvedSpecifier::plan(catalog, to)?;
        self.change_alignment_for(catalog, &from, &to)
    }

    pub fn plan_cancel_policy<C>(
        &self,
        from: &PlanPhaseSpecifier,
        catalog: &C,
    ) -> CatalogResult<ActionPolicy>
    where
        C: CatalogLookup + ?Sized,
    {
        let from = ResolvedSpecifier::phase(catalog, from)?;
        let hit = first_match(RuleCategory::CancelPolicy, &self.cancel_policy, |case| {
            case.matches(catalog, &from)
        })?;
        outcome(RuleCategory::CancelPolicy, hit.map(|case| case.result))
    }

    pub fn plan_create_alignment<C>(
        &self,
        to: &PlanSpecifier,
        catalog: &C,
    ) -> CatalogResult<PlanAlignmentCreate>
    where
        C: CatalogLookup + ?Sized,
    {
        let to = ResolvedSpecifier::plan(catalog, to)?;
        let hit = first_match(RuleCategory::CreateAlignment, &self.create_alignment, |case| {
            case.matches(catalog, &to)
        })?;
        outcome(RuleCategory::CreateAlignment, hit.map(|case| case.result))
    }

    pub fn billing_alignment<C>(
        &self,
        from: &PlanPhaseSpecifier,
        catalog: &C,
    ) -> CatalogResult<BillingAlignment>
    where
        C: CatalogLookup + ?Sized,
    {
        let from = ResolvedSpecifier::phase(catalog, from)?;
        let hit = first_match(RuleCategory::BillingAlignment, &self.billing_alignment, |case| {
            case.matches(catalog, &from)
        })?;
        outcome(RuleCategory::BillingAlignment, hit.map(|case| case.result))
    }

    /// Price list selected for `specifier` by the price-list rules, or the
    /// catalog's default list when no rule applies.
    pub fn price_list_for<'c, C>(
        &self,
        specifier: &ResolvedSpecifier<'_>,
        catalog: &'c C,
    ) -> CatalogResult<&'c DefaultPriceList>
    where
        C: CatalogLookup + ?Sized,
    {
        let hit = first_match(RuleCategory::PriceList, &self.price_list, |case| {
            case.matches(catalog, specifier)
        })?;
        match hit {
            Some(case) => catalog.find_current_pricelist(Some(case.result.as_str())),
            None => catalog.default_price_list(),
        }
    }

    /// Policy and alignment for moving from `from` to `to` in one call.
    ///
    /// When `to` names no price list, the price-list rules pick one based on
    /// the current plan. Fails with `IllegalChangeRequest` when the policy is
    /// `ILLEGAL` or when the change would land on the current plan.
    pub fn plan_change<'c, C>(
        &self,
        from: &PlanPhaseSpecifier,
        to: &PlanSpecifier,
        catalog: &'c C,
    ) -> CatalogResult<PlanChangeResult<'c>>
    where
        C: CatalogLookup + ?Sized,
    {
        let resolved_from = ResolvedSpecifier::phase(catalog, from)?;
        let mut resolved_to = ResolvedSpecifier::plan(catalog, to)?;

        let new_price_list = match resolved_to.price_list {
            Some(price_list) => price_list,
            None => self.price_list_for(&resolved_from, catalog)?,
        };
        resolved_to.price_list = Some(new_price_list);

        let identical = ptr::eq(resolved_from.product, resolved_to.product)
            && resolved_from.billing_period == resolved_to.billing_period
            && resolved_from
                .price_list
                .is_some_and(|current| ptr::eq(current, new_price_list));

        let policy = if identical {
            ActionPolicy::Illegal
        } else {
            self.change_policy_for(catalog, &resolved_from, &resolved_to)?
        };
        if policy == ActionPolicy::Illegal {
            let from_period = resolved_from.billing_period.map(|p| p.as_str());
            let to_period = resolved_to.billing_period.map(|p| p.as_str());
            return Err(CatalogApiError::illegal_change_request(
                [
                    Some(resolved_from.product_name()),
                    from_period,
                    resolved_from.price_list.map(|pl| pl.name()),
                ],
                [
                    Some(resolved_to.product_name()),
                    to_period,
                    Some(new_price_list.name()),
                ],
            ));
        }

        let alignment = self.change_alignment_for(catalog, &resolved_from, &resolved_to)?;
        Ok(PlanChangeResult {
            new_price_list,
            policy,
            alignment,
        })
    }

    fn change_policy_for<C>(
        &self,
        catalog: &C,
        from: &ResolvedSpecifier<'_>,
        to: &ResolvedSpecifier<'_>,
    ) -> CatalogResult<ActionPolicy>
    where
        C: CatalogLookup + ?Sized,
    {
        let hit = first_match(RuleCategory::ChangePolicy, &self.change_policy, |case| {
            case.matches(catalog, from, to)
        })?;
        outcome(RuleCategory::ChangePolicy, hit.map(|case| case.result))
    }

    fn change_alignment_for<C>(
        &self,
        catalog: &C,
        from: &ResolvedSpecifier<'_>,
        to: &ResolvedSpecifier<'_>,
    ) -> CatalogResult<PlanAlignmentChange>
    where
        C: CatalogLookup + ?Sized,
    {
        let hit = first_match(RuleCategory::ChangeAlignment, &self.change_alignment, |case| {
            case.matches(catalog, from, to)
        })?;
        outcome(RuleCategory::ChangeAlignment, hit.map(|case| case.result))
    }
}

fn outcome<T>(category: RuleCategory, result: Option<T>) -> CatalogResult<T> {
    result.ok_or_else(|| CatalogApiError::no_matching_rule(category.as_str()))
}

impl ValidatingConfig for PlanRules {
    type Context = dyn CatalogLookup;

    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors {
        let defaults = [
            (RuleCategory::ChangePolicy, self.change_policy.iter().any(CaseChange::is_default)),
            (RuleCategory::ChangeAlignment, self.change_alignment.iter().any(CaseChange::is_default)),
            (RuleCategory::CancelPolicy, self.cancel_policy.iter().any(CasePhase::is_default)),
            (RuleCategory::CreateAlignment, self.create_alignment.iter().any(CasePlan::is_default)),
            (RuleCategory::BillingAlignment, self.billing_alignment.iter().any(CasePhase::is_default)),
        ];
        for (category, has_default) in defaults {
            if !has_default {
                report(catalog, category, errors, "no default rule".to_string());
            }
        }

        for case in &self.change_policy {
            case.from.validate(catalog, RuleCategory::ChangePolicy, errors);
            case.to.validate(catalog, RuleCategory::ChangePolicy, errors);
        }
        for case in &self.change_alignment {
            case.from.validate(catalog, RuleCategory::ChangeAlignment, errors);
            case.to.validate(catalog, RuleCategory::ChangeAlignment, errors);
        }
        for case in &self.cancel_policy {
            case.plan.validate(catalog, RuleCategory::CancelPolicy, errors);
        }
        for case in &self.create_alignment {
            case.plan.validate(catalog, RuleCategory::CreateAlignment, errors);
        }
        for case in &self.billing_alignment {
            case.plan.validate(catalog, RuleCategory::BillingAlignment, errors);
        }
        for case in &self.price_list {
            case.plan.validate(catalog, RuleCategory::PriceList, errors);
            if catalog.find_current_pricelist(Some(case.result.as_str())).is_err() {
                report(
                    catalog,
                    RuleCategory::PriceList,
                    errors,
                    format!("rule selects unknown price list '{}'", case.result),
                );
            }
        }
        errors
    }
}
