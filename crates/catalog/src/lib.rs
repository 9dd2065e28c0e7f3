//! Billing catalog: products, plans, price lists and the plan rules that
//! govern subscription changes.
//!
//! Everything here is synchronous and free of IO. A loader builds a
//! [`StandaloneCatalog`], initializes it, validates it, and then shares it
//! read-only.

pub mod catalog;
pub mod lookup;
pub mod phase;
pub mod plan;
pub mod price_list;
pub mod product;
pub mod rules;
pub mod specifier;
pub mod types;

pub use catalog::{Listing, StandaloneCatalog};
pub use lookup::CatalogLookup;
pub use phase::{DefaultPlanPhase, Duration, InternationalPrice, Price};
pub use plan::DefaultPlan;
pub use price_list::{DefaultPriceList, DefaultPriceListSet};
pub use product::DefaultProduct;
pub use rules::{
    CaseChange, CasePhase, CasePlan, PlanChangeResult, PlanPattern, PlanRules, ResolvedSpecifier,
    RuleCategory,
};
pub use specifier::{PlanPhaseSpecifier, PlanSpecifier};
pub use types::{
    ActionPolicy, BillingAlignment, BillingPeriod, Currency, ParseEnumError, PhaseType,
    PlanAlignmentChange, PlanAlignmentCreate, ProductCategory, TimeUnit,
};

pub use billcat_core::{
    CatalogApiError, CatalogEntity, CatalogResult, ErrorCode, SourceLocation, ValidatingConfig,
    ValidationError, ValidationErrors,
};
