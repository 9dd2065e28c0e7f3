//! Plan phases and the naming convention tying a phase back to its plan.
//!
//! A phase name is `<plan name>-<phase type>`, e.g. `basic-monthly-trial`.
//! Plan names may contain `-`; phase types never do, so the plan name is
//! everything before the last `-`.

use serde::{Deserialize, Serialize};

use billcat_core::{CatalogApiError, CatalogResult, ValidatingConfig, ValidationError, ValidationErrors};

use crate::lookup::CatalogLookup;
use crate::types::{Currency, PhaseType, TimeUnit};

/// Full phase name for `phase_type` within `plan_name`.
pub fn phase_name(plan_name: &str, phase_type: PhaseType) -> String {
    format!("{plan_name}-{}", phase_type.as_str())
}

/// Name of the plan owning the phase called `phase_name`.
pub fn plan_name(phase_name: &str) -> CatalogResult<&str> {
    match phase_name.rsplit_once('-') {
        Some((plan, suffix)) if !plan.is_empty() && !suffix.is_empty() => Ok(plan),
        _ => Err(CatalogApiError::bad_phase_name(phase_name)),
    }
}

/// Phase type encoded in the suffix of `phase_name`.
pub fn phase_type(phase_name: &str) -> CatalogResult<PhaseType> {
    phase_name
        .rsplit_once('-')
        .and_then(|(_, suffix)| suffix.parse().ok())
        .ok_or_else(|| CatalogApiError::bad_phase_name(phase_name))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub unit: TimeUnit,
    #[serde(default)]
    pub number: u32,
}

impl Duration {
    pub fn new(unit: TimeUnit, number: u32) -> Self {
        Self { unit, number }
    }

    pub fn unlimited() -> Self {
        Self::new(TimeUnit::Unlimited, 0)
    }

    pub fn is_unlimited(&self) -> bool {
        self.unit == TimeUnit::Unlimited
    }
}

/// Amount in one currency, in the smallest currency unit (e.g. cents).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub currency: Currency,
    pub value: u64,
}

/// One price per supported currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternationalPrice(Vec<Price>);

impl InternationalPrice {
    pub fn new(prices: Vec<Price>) -> Self {
        Self(prices)
    }

    pub fn prices(&self) -> &[Price] {
        &self.0
    }

    pub fn price(&self, currency: Currency) -> CatalogResult<u64> {
        self.0
            .iter()
            .find(|p| p.currency == currency)
            .map(|p| p.value)
            .ok_or_else(|| CatalogApiError::no_price_for_currency(currency.as_str()))
    }

    fn problems(&self, supported: &[Currency]) -> Vec<String> {
        let mut problems = Vec::new();
        for currency in supported {
            if !self.0.iter().any(|p| p.currency == *currency) {
                problems.push(format!("no price for supported currency {currency}"));
            }
        }
        for price in &self.0 {
            if !supported.contains(&price.currency) {
                problems.push(format!("price in unsupported currency {}", price.currency));
            }
        }
        problems
    }
}

/// A time-bounded stage of a plan with its own pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPlanPhase {
    phase_type: PhaseType,
    duration: Duration,
    #[serde(default)]
    fixed_price: Option<InternationalPrice>,
    #[serde(default)]
    recurring_price: Option<InternationalPrice>,
    /// Back-reference to the owning plan, bound by `DefaultPlan::initialize`.
    #[serde(skip)]
    plan: Option<String>,
}

impl DefaultPlanPhase {
    pub fn new(phase_type: PhaseType, duration: Duration) -> Self {
        Self {
            phase_type,
            duration,
            fixed_price: None,
            recurring_price: None,
            plan: None,
        }
    }

    pub fn with_fixed_price(mut self, price: InternationalPrice) -> Self {
        self.fixed_price = Some(price);
        self
    }

    pub fn with_recurring_price(mut self, price: InternationalPrice) -> Self {
        self.recurring_price = Some(price);
        self
    }

    pub fn phase_type(&self) -> PhaseType {
        self.phase_type
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn fixed_price(&self) -> Option<&InternationalPrice> {
        self.fixed_price.as_ref()
    }

    pub fn recurring_price(&self) -> Option<&InternationalPrice> {
        self.recurring_price.as_ref()
    }

    /// Name of the owning plan; `None` until the document is initialized.
    pub fn plan_name(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    /// Full phase name; `None` until the document is initialized.
    pub fn name(&self) -> Option<String> {
        self.plan.as_deref().map(|plan| phase_name(plan, self.phase_type))
    }

    pub(crate) fn bind(&mut self, plan_name: &str) {
        if self.plan.as_deref() != Some(plan_name) {
            self.plan = Some(plan_name.to_string());
        }
    }

    fn report(
        &self,
        catalog: &dyn CatalogLookup,
        errors: &mut ValidationErrors,
        description: String,
    ) {
        let name = self
            .name()
            .unwrap_or_else(|| self.phase_type.as_str().to_string());
        errors.add(ValidationError::new(
            description,
            catalog.source_location(),
            "PlanPhase",
            name,
        ));
    }
}

impl ValidatingConfig for DefaultPlanPhase {
    type Context = dyn CatalogLookup;

    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors {
        let evergreen = self.phase_type == PhaseType::Evergreen;
        if evergreen && !self.duration.is_unlimited() {
            self.report(catalog, errors, "evergreen phase must have an unlimited duration".into());
        }
        if !self.duration.is_unlimited() && self.duration.number == 0 {
            self.report(catalog, errors, "bounded phase must last at least one time unit".into());
        }
        if self.fixed_price.is_none() && self.recurring_price.is_none() {
            self.report(catalog, errors, "phase has neither a fixed nor a recurring price".into());
        }

        let supported = catalog.supported_currencies();
        for (kind, price) in [("fixed", &self.fixed_price), ("recurring", &self.recurring_price)] {
            let Some(price) = price else { continue };
            for problem in price.problems(supported) {
                self.report(catalog, errors, format!("{kind} price: {problem}"));
            }
        }
        errors
    }
}
