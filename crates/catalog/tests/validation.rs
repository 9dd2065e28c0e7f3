mod common;

use billcat_catalog::{
    ActionPolicy, BillingPeriod, CaseChange, CasePhase, CasePlan, Currency, DefaultPlan,
    DefaultPlanPhase, DefaultPriceList, DefaultPriceListSet, DefaultProduct, Duration, PhaseType,
    PlanPattern, PlanRules, ProductCategory, SourceLocation, TimeUnit, ValidatingConfig,
    ValidationErrors,
};
use proptest::prelude::*;

fn descriptions(errors: &ValidationErrors) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

fn has(errors: &ValidationErrors, object_type: &str, fragment: &str) -> bool {
    errors
        .iter()
        .any(|e| e.object_type == object_type && e.description.contains(fragment))
}

#[test]
fn fixture_is_valid() {
    let errors = common::validate(&common::catalog());
    assert!(errors.is_empty(), "unexpected errors: {:#?}", descriptions(&errors));
}

#[test]
fn errors_carry_the_source_location() {
    let catalog = common::catalog().with_supported_currencies(Vec::new());
    let errors = common::validate(&catalog);

    assert!(!errors.is_empty());
    assert!(
        errors
            .iter()
            .all(|e| e.source.as_ref().map(SourceLocation::as_str) == Some(common::SOURCE))
    );
}

#[test]
fn validation_accumulates_every_problem() {
    let mut products = common::products();
    products.push(DefaultProduct::new("Basic", ProductCategory::Base));

    let mut plans = common::plans();
    plans.push(DefaultPlan::new(
        "shotgun-monthly",
        "Shotgun",
        BillingPeriod::Monthly,
        vec![common::evergreen(10, 9)],
    ));

    let mut catalog = common::raw_catalog().with_products(products).with_plans(plans);
    catalog.initialize(&SourceLocation::new(common::SOURCE));
    let errors = common::validate(&catalog);

    assert!(has(&errors, "Product", "duplicate Product name 'Basic'"));
    assert!(has(&errors, "Plan", "product 'Shotgun' does not exist"));
    assert_eq!(errors.len(), 2, "{:#?}", descriptions(&errors));
}

#[test]
fn validate_hands_back_the_same_sink() {
    let first = common::catalog();
    let mut products = common::products();
    products.push(DefaultProduct::new("Telescope", ProductCategory::AddOn));
    let second = common::catalog().with_products(products);

    let mut errors = ValidationErrors::new();
    let count = first.validate(&first, &mut errors).len();
    assert_eq!(count, 0);

    second.validate(&second, &mut errors);
    assert_eq!(errors.len(), 1);
}

#[test]
fn uninitialized_phases_do_not_resolve_to_their_plan() {
    let errors = common::validate(&common::raw_catalog());
    assert!(has(&errors, "Plan", "phase resolves to plan None"));
}

#[test]
fn phase_structure_is_checked() {
    let broken = DefaultPlan::new(
        "broken-monthly",
        "Basic",
        BillingPeriod::Monthly,
        vec![
            common::evergreen(10, 9),
            DefaultPlanPhase::new(PhaseType::Trial, Duration::new(TimeUnit::Days, 0))
                .with_fixed_price(common::price(0, 0)),
            DefaultPlanPhase::new(PhaseType::Discount, Duration::new(TimeUnit::Months, 1)),
        ],
    );
    let mut plans = common::plans();
    plans.push(broken);

    let mut catalog = common::raw_catalog().with_plans(plans);
    catalog.initialize(&SourceLocation::new(common::SOURCE));
    let errors = common::validate(&catalog);

    assert!(has(&errors, "Plan", "only the final phase may be unlimited"));
    assert!(has(&errors, "PlanPhase", "at least one time unit"));
    assert!(has(&errors, "PlanPhase", "neither a fixed nor a recurring price"));
}

#[test]
fn evergreen_phase_must_be_unlimited() {
    let plan = DefaultPlan::new(
        "bounded-monthly",
        "Basic",
        BillingPeriod::Monthly,
        vec![
            DefaultPlanPhase::new(PhaseType::Evergreen, Duration::new(TimeUnit::Years, 1))
                .with_recurring_price(common::price(10, 9)),
        ],
    );
    let mut plans = common::plans();
    plans.push(plan);

    let mut catalog = common::raw_catalog().with_plans(plans);
    catalog.initialize(&SourceLocation::new(common::SOURCE));
    assert!(has(&common::validate(&catalog), "PlanPhase", "unlimited duration"));
}

#[test]
fn prices_must_cover_supported_currencies() {
    let catalog = common::catalog()
        .with_supported_currencies(vec![Currency::Usd, Currency::Eur, Currency::Gbp]);
    let errors = common::validate(&catalog);
    assert!(has(&errors, "PlanPhase", "no price for supported currency GBP"));
}

#[test]
fn price_lists_must_reference_known_plans_once_per_product_and_period() {
    let set = DefaultPriceListSet::new(
        DefaultPriceList::new("standard", ["basic-monthly", "basic-monthly-promo", "ghost"]),
        vec![DefaultPriceList::new("standard", Vec::<String>::new())],
    );
    let catalog = common::catalog().with_price_lists(set);
    let errors = common::validate(&catalog);

    assert!(has(&errors, "PriceList", "plan 'ghost' does not exist"));
    assert!(has(&errors, "PriceList", "more than one plan for product 'Basic'"));
    assert!(has(&errors, "PriceList", "duplicate PriceList name 'standard'"));
}

#[test]
fn each_policy_category_needs_a_default_rule() {
    let rules = PlanRules::new()
        .with_change_policy(vec![CaseChange::default_rule(ActionPolicy::Immediate)])
        .with_cancel_policy(vec![
            CasePhase::default_rule(ActionPolicy::Immediate).in_phase(PhaseType::Trial),
        ]);
    let catalog = common::catalog().with_plan_rules(rules);
    let errors = common::validate(&catalog);

    let missing: Vec<&str> = errors
        .iter()
        .filter(|e| e.object_type == "PlanRules" && e.description == "no default rule")
        .map(|e| e.object_name.as_str())
        .collect();
    assert_eq!(
        missing,
        ["change_alignment", "cancel_policy", "create_alignment", "billing_alignment"]
    );
}

#[test]
fn rules_must_name_known_entities() {
    let rules = common::plan_rules()
        .with_create_alignment(vec![
            CasePlan::new(
                PlanPattern::any().product("Shotgun"),
                billcat_catalog::PlanAlignmentCreate::StartOfBundle,
            ),
            CasePlan::default_rule(billcat_catalog::PlanAlignmentCreate::StartOfSubscription),
        ])
        .with_price_list(vec![CasePlan::new(PlanPattern::any().price_list("gold"), "silver".to_string())]);
    let catalog = common::catalog().with_plan_rules(rules);
    let errors = common::validate(&catalog);

    assert!(has(&errors, "PlanRules", "unknown product 'Shotgun'"));
    assert!(has(&errors, "PlanRules", "unknown price list 'gold'"));
    assert!(has(&errors, "PlanRules", "selects unknown price list 'silver'"));
}

#[test]
fn add_on_lists_must_name_add_ons() {
    let mut products = common::products();
    products[3] = DefaultProduct::new("Lonely", ProductCategory::Base).with_included(["Pro"]);
    let catalog = common::catalog().with_products(products);
    let errors = common::validate(&catalog);
    assert!(has(&errors, "Product", "included product 'Pro' is not an add-on"));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, ..ProptestConfig::default() })]

    #[test]
    fn initialize_is_idempotent(times in 1usize..4) {
        let source = SourceLocation::new(common::SOURCE);
        let once = common::catalog();

        let mut again = common::catalog();
        for _ in 0..times {
            again.initialize(&source);
        }
        prop_assert_eq!(&again, &once);

        for plan in again.current_plans() {
            for phase in plan.phases() {
                prop_assert_eq!(phase.plan_name(), Some(billcat_catalog::CatalogEntity::name(plan)));
            }
        }
    }
}

#[test]
fn valid_document_resolves_every_back_reference() {
    let catalog = common::catalog();
    assert!(common::validate(&catalog).is_empty());

    for plan in catalog.current_plans() {
        assert!(catalog.find_current_product(Some(plan.product_name())).is_ok());
        for phase in plan.phases() {
            let name = phase.name().unwrap();
            let owner = catalog.find_current_phase(Some(name.as_str())).unwrap();
            assert_eq!(owner, phase);
        }
    }
}
