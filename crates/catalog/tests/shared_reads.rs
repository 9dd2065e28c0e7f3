mod common;

use std::sync::Arc;
use std::thread;

use billcat_catalog::{
    ActionPolicy, BillingPeriod, CatalogEntity, PhaseType, PlanPhaseSpecifier, PlanSpecifier,
    StandaloneCatalog,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn catalog_is_send_and_sync() {
    assert_send_sync::<StandaloneCatalog>();
}

#[test]
fn concurrent_readers_see_the_same_answers() {
    let catalog = Arc::new(common::catalog());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                for _ in 0..100 {
                    let plan = catalog
                        .find_current_plan_for(
                            Some("Basic"),
                            Some(BillingPeriod::Monthly),
                            Some("promo"),
                        )
                        .unwrap();
                    assert_eq!(plan.name(), "basic-monthly-promo");

                    let phase = catalog.find_current_phase(Some("pro-monthly-trial")).unwrap();
                    assert_eq!(phase.plan_name(), Some("pro-monthly"));

                    let from = PlanPhaseSpecifier::new(
                        "Basic",
                        BillingPeriod::Monthly,
                        "standard",
                        PhaseType::Evergreen,
                    );
                    let to = PlanSpecifier::new("Pro", BillingPeriod::Monthly, "standard");
                    assert_eq!(catalog.plan_change_policy(&from, &to), Ok(ActionPolicy::EndOfTerm));
                    assert_eq!(catalog.available_addon_listings(Some("Basic")).len(), 1);
                }
            })
        })
        .collect();

    for reader in readers {
        reader.join().unwrap();
    }
}
