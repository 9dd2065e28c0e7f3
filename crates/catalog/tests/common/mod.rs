//! Shared fixture: a small but complete catalog used by the integration tests.
#![allow(dead_code)]

use billcat_catalog::{
    ActionPolicy, BillingAlignment, BillingPeriod, CaseChange, CasePhase, CasePlan, Currency,
    DefaultPlan, DefaultPlanPhase, DefaultPriceList, DefaultPriceListSet, DefaultProduct, Duration,
    InternationalPrice, PhaseType, PlanAlignmentChange, PlanAlignmentCreate, PlanPattern,
    PlanRules, Price, ProductCategory, SourceLocation, StandaloneCatalog, TimeUnit,
    ValidatingConfig, ValidationErrors,
};
use chrono::{TimeZone, Utc};

pub const SOURCE: &str = "file:///fixtures/catalog.json";

pub fn price(usd: u64, eur: u64) -> InternationalPrice {
    InternationalPrice::new(vec![
        Price { currency: Currency::Usd, value: usd },
        Price { currency: Currency::Eur, value: eur },
    ])
}

pub fn trial() -> DefaultPlanPhase {
    DefaultPlanPhase::new(PhaseType::Trial, Duration::new(TimeUnit::Days, 30)).with_fixed_price(price(0, 0))
}

pub fn evergreen(usd: u64, eur: u64) -> DefaultPlanPhase {
    DefaultPlanPhase::new(PhaseType::Evergreen, Duration::unlimited()).with_recurring_price(price(usd, eur))
}

pub fn products() -> Vec<DefaultProduct> {
    vec![
        DefaultProduct::new("Basic", ProductCategory::Base).with_available(["Telescope"]),
        DefaultProduct::new("Pro", ProductCategory::Base).with_available(["Telescope"]),
        DefaultProduct::new("Telescope", ProductCategory::AddOn),
        DefaultProduct::new("Lonely", ProductCategory::Base),
        DefaultProduct::new("Legacy", ProductCategory::Base).with_retired(true),
    ]
}

pub fn plans() -> Vec<DefaultPlan> {
    let monthly = BillingPeriod::Monthly;
    vec![
        DefaultPlan::new("basic-monthly", "Basic", monthly, vec![trial(), evergreen(1000, 900)]),
        DefaultPlan::new(
            "basic-monthly-promo",
            "Basic",
            monthly,
            vec![
                DefaultPlanPhase::new(PhaseType::Discount, Duration::new(TimeUnit::Months, 3))
                    .with_recurring_price(price(500, 450)),
                evergreen(1000, 900),
            ],
        ),
        DefaultPlan::new("pro-monthly", "Pro", monthly, vec![trial(), evergreen(3000, 2700)]),
        DefaultPlan::new("telescope-monthly", "Telescope", monthly, vec![evergreen(200, 180)]),
        DefaultPlan::new("lonely-monthly", "Lonely", monthly, vec![evergreen(100, 90)]),
        DefaultPlan::new("legacy-monthly", "Legacy", monthly, vec![evergreen(100, 90)]),
        DefaultPlan::new("pro-annual", "Pro", BillingPeriod::Annual, vec![evergreen(30000, 27000)])
            .with_retired(true),
    ]
}

pub fn price_lists() -> DefaultPriceListSet {
    DefaultPriceListSet::new(
        DefaultPriceList::new(
            "standard",
            [
                "basic-monthly",
                "pro-monthly",
                "telescope-monthly",
                "lonely-monthly",
                "legacy-monthly",
            ],
        ),
        vec![
            DefaultPriceList::new("promo", ["basic-monthly-promo"]),
            DefaultPriceList::new("archive", ["pro-annual", "basic-monthly"]).with_retired(true),
        ],
    )
}

/// Rules in every category, with a default rule last.
pub fn plan_rules() -> PlanRules {
    PlanRules::new()
        .with_change_policy(vec![
            CaseChange::default_rule(ActionPolicy::Immediate).in_phase(PhaseType::Trial),
            CaseChange::new(
                PlanPattern::any().product("Pro"),
                PlanPattern::any().product("Basic"),
                ActionPolicy::Illegal,
            ),
            CaseChange::default_rule(ActionPolicy::EndOfTerm),
        ])
        .with_change_alignment(vec![
            CaseChange::new(
                PlanPattern::any().price_list("promo"),
                PlanPattern::any(),
                PlanAlignmentChange::ChangeOfPricelist,
            ),
            CaseChange::default_rule(PlanAlignmentChange::StartOfBundle),
        ])
        .with_cancel_policy(vec![
            CasePhase::default_rule(ActionPolicy::Immediate).in_phase(PhaseType::Trial),
            CasePhase::default_rule(ActionPolicy::EndOfTerm),
        ])
        .with_create_alignment(vec![
            CasePlan::new(
                PlanPattern::any().product_category(ProductCategory::AddOn),
                PlanAlignmentCreate::StartOfBundle,
            ),
            CasePlan::default_rule(PlanAlignmentCreate::StartOfSubscription),
        ])
        .with_billing_alignment(vec![
            CasePhase::new(
                PlanPattern::any().product_category(ProductCategory::AddOn),
                BillingAlignment::Bundle,
            ),
            CasePhase::default_rule(BillingAlignment::Account),
        ])
        .with_price_list(vec![CasePlan::new(
            PlanPattern::any().price_list("promo"),
            "promo".to_string(),
        )])
}

/// Document as a loader would hand it over: built but not yet initialized.
pub fn raw_catalog() -> StandaloneCatalog {
    StandaloneCatalog::new(
        "Firearms",
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
    )
    .with_supported_currencies(vec![Currency::Usd, Currency::Eur])
    .with_products(products())
    .with_plans(plans())
    .with_plan_rules(plan_rules())
    .with_price_lists(price_lists())
}

pub fn catalog() -> StandaloneCatalog {
    let mut catalog = raw_catalog();
    catalog.initialize(&SourceLocation::new(SOURCE));
    catalog
}

pub fn validate(catalog: &StandaloneCatalog) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    catalog.validate(catalog, &mut errors);
    errors
}
