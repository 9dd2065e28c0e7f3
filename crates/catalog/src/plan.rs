use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use billcat_core::{
    CatalogApiError, CatalogEntity, CatalogResult, SourceLocation, ValidatingConfig,
    ValidationError, ValidationErrors, validate_all,
};

use crate::lookup::CatalogLookup;
use crate::phase::{self, DefaultPlanPhase};
use crate::types::BillingPeriod;

/// A sellable combination of a product and a billing period, made of ordered
/// phases. The last phase is the final one; all others are initial phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPlan {
    name: String,
    /// Name of the owning product.
    product: String,
    billing_period: BillingPeriod,
    phases: Vec<DefaultPlanPhase>,
    #[serde(default)]
    retired: bool,
}

impl DefaultPlan {
    pub fn new(
        name: impl Into<String>,
        product: impl Into<String>,
        billing_period: BillingPeriod,
        phases: Vec<DefaultPlanPhase>,
    ) -> Self {
        Self {
            name: name.into(),
            product: product.into(),
            billing_period,
            phases,
            retired: false,
        }
    }

    pub fn with_retired(mut self, retired: bool) -> Self {
        self.retired = retired;
        self
    }

    pub fn product_name(&self) -> &str {
        &self.product
    }

    pub fn billing_period(&self) -> BillingPeriod {
        self.billing_period
    }

    pub fn phases(&self) -> &[DefaultPlanPhase] {
        &self.phases
    }

    pub fn initial_phases(&self) -> &[DefaultPlanPhase] {
        match self.phases.split_last() {
            Some((_, initial)) => initial,
            None => &[],
        }
    }

    pub fn final_phase(&self) -> Option<&DefaultPlanPhase> {
        self.phases.last()
    }

    /// Phase of this plan whose full name is `name`.
    pub fn find_phase(&self, name: &str) -> CatalogResult<&DefaultPlanPhase> {
        self.phases
            .iter()
            .find(|p| phase::phase_name(&self.name, p.phase_type()) == name)
            .ok_or_else(|| CatalogApiError::no_such_phase(Some(name)))
    }

    fn report(&self, source: Option<&SourceLocation>, errors: &mut ValidationErrors, description: String) {
        errors.add(ValidationError::new(description, source, Self::KIND, &self.name));
    }
}

impl CatalogEntity for DefaultPlan {
    const KIND: &'static str = "Plan";

    fn name(&self) -> &str {
        &self.name
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

impl ValidatingConfig for DefaultPlan {
    type Context = dyn CatalogLookup;

    fn validate<'e>(
        &self,
        catalog: &Self::Context,
        errors: &'e mut ValidationErrors,
    ) -> &'e mut ValidationErrors {
        let source = catalog.source_location();

        if self.name.trim().is_empty() {
            self.report(source, errors, "plan name cannot be empty".into());
        }
        if catalog.find_current_product(Some(self.product.as_str())).is_err() {
            self.report(source, errors, format!("product '{}' does not exist", self.product));
        }
        if self.phases.is_empty() {
            self.report(source, errors, "plan has no phases".into());
        }

        let mut seen = HashSet::new();
        let last = self.phases.len().saturating_sub(1);
        for (index, p) in self.phases.iter().enumerate() {
            if !seen.insert(p.phase_type()) {
                self.report(source, errors, format!("duplicate {} phase", p.phase_type()));
            }
            if index != last && p.duration().is_unlimited() {
                self.report(
                    source,
                    errors,
                    format!("only the final phase may be unlimited, not the {} phase", p.phase_type()),
                );
            }

            // The phase name must lead back to this plan.
            let owner = p
                .name()
                .and_then(|name| phase::plan_name(&name).ok().map(str::to_string));
            if owner.as_deref() != Some(self.name.as_str()) {
                self.report(
                    source,
                    errors,
                    format!(
                        "{} phase resolves to plan {:?} instead of '{}'",
                        p.phase_type(),
                        owner,
                        self.name
                    ),
                );
            }
        }

        validate_all(&self.phases, catalog, errors)
    }

    fn initialize(&mut self, _source: &SourceLocation) {
        for p in &mut self.phases {
            p.bind(&self.name);
        }
    }
}
