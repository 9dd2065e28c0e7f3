//! Query specifiers: which plan (and phase) a policy question is about.

use serde::{Deserialize, Serialize};

use crate::types::{BillingPeriod, PhaseType};

/// Identifies a plan by product, billing period and price list.
///
/// Any field may be absent; lookups report the absence with the matching
/// error code instead of guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanSpecifier {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub billing_period: Option<BillingPeriod>,
    #[serde(default)]
    pub price_list_name: Option<String>,
}

impl PlanSpecifier {
    pub fn new(
        product_name: impl Into<String>,
        billing_period: BillingPeriod,
        price_list_name: impl Into<String>,
    ) -> Self {
        Self {
            product_name: Some(product_name.into()),
            billing_period: Some(billing_period),
            price_list_name: Some(price_list_name.into()),
        }
    }

    /// Target specifier that leaves the price list to the catalog rules.
    pub fn without_price_list(product_name: impl Into<String>, billing_period: BillingPeriod) -> Self {
        Self {
            product_name: Some(product_name.into()),
            billing_period: Some(billing_period),
            price_list_name: None,
        }
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    pub fn billing_period(&self) -> Option<BillingPeriod> {
        self.billing_period
    }

    pub fn price_list_name(&self) -> Option<&str> {
        self.price_list_name.as_deref()
    }
}

/// A plan specifier narrowed to one phase of the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanPhaseSpecifier {
    #[serde(flatten)]
    pub plan: PlanSpecifier,
    #[serde(default)]
    pub phase_type: Option<PhaseType>,
}

impl PlanPhaseSpecifier {
    pub fn new(
        product_name: impl Into<String>,
        billing_period: BillingPeriod,
        price_list_name: impl Into<String>,
        phase_type: PhaseType,
    ) -> Self {
        Self {
            plan: PlanSpecifier::new(product_name, billing_period, price_list_name),
            phase_type: Some(phase_type),
        }
    }

    pub fn plan_specifier(&self) -> &PlanSpecifier {
        &self.plan
    }

    pub fn product_name(&self) -> Option<&str> {
        self.plan.product_name()
    }

    pub fn billing_period(&self) -> Option<BillingPeriod> {
        self.plan.billing_period()
    }

    pub fn price_list_name(&self) -> Option<&str> {
        self.plan.price_list_name()
    }

    pub fn phase_type(&self) -> Option<PhaseType> {
        self.phase_type
    }
}
