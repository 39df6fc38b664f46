//! Integration tests for the feeder controller: plan CRUD, replenishment
//! and the gated dispense path, exercised through the public API only.

use petfeeder::config::FeederConfig;
use petfeeder::feeder::PetFeeder;
use petfeeder::plans::{MealPlan, MEAL_PLAN_CAPACITY};
use petfeeder::stock::Ingredient;
use petfeeder::Error;

fn make_feeder() -> PetFeeder {
    PetFeeder::new(&FeederConfig::default())
}

fn make_plan(kibble: &str, treats: &str, water: &str, wet_food: &str) -> MealPlan {
    let mut plan = MealPlan::new();
    plan.set_name("TestMeal").unwrap();
    plan.set_amount(Ingredient::Kibble, kibble).unwrap();
    plan.set_amount(Ingredient::Treats, treats).unwrap();
    plan.set_amount(Ingredient::Water, water).unwrap();
    plan.set_amount(Ingredient::WetFood, wet_food).unwrap();
    plan
}

// ── Dispense scenarios ────────────────────────────────────────

#[test]
fn dispense_with_sufficient_stock_and_energy_succeeds() {
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("5", "2", "1", "1")));
    feeder.replenish_food("100", "100", "100", "100").unwrap();

    let before = feeder.energy_limit();
    assert_eq!(feeder.dispense(0), Ok(true));
    assert!(feeder.remaining_energy_budget() < before);
}

#[test]
fn dispense_from_fresh_ledger_matches_expected_quantities() {
    // Fresh 15/15/15/15 ledger, plan (5,2,1,1) → kibble drops to 10 and
    // the budget drops by the weighted cost.
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("5", "2", "1", "1")));

    assert_eq!(feeder.dispense(0), Ok(true));

    let stock = feeder.check_stock();
    assert!(stock.contains("Kibble: 10"));
    assert!(stock.contains("Treats: 13"));
    let cost = 5 * 10 + 2 * 5 + 15 + 20;
    assert_eq!(feeder.remaining_energy_budget(), feeder.energy_limit() - cost);
}

#[test]
fn dispense_insufficient_stock_changes_nothing() {
    // 20 kibble required against 15 in stock.
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("20", "0", "0", "0")));

    let energy_before = feeder.remaining_energy_budget();
    assert_eq!(feeder.dispense(0), Ok(false));
    assert!(feeder.check_stock().contains("Kibble: 15"));
    assert_eq!(feeder.remaining_energy_budget(), energy_before);
}

#[test]
fn dispense_insufficient_energy_changes_nothing() {
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("20", "10", "10", "10")));
    feeder.replenish_food("20", "10", "10", "10").unwrap();

    let stock_before = feeder.check_stock();
    assert_eq!(feeder.dispense(0), Ok(false));
    assert_eq!(feeder.remaining_energy_budget(), feeder.energy_limit());
    assert_eq!(feeder.check_stock(), stock_before);
}

#[test]
fn dispense_deleted_slot_is_soft_false() {
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("1", "1", "1", "1")));
    feeder.delete_meal_plan(0).unwrap();

    assert_eq!(feeder.dispense(0), Ok(false));
}

#[test]
fn dispense_out_of_range_fails_fast() {
    let feeder = make_feeder();
    assert!(matches!(
        feeder.dispense(MEAL_PLAN_CAPACITY + 5),
        Err(Error::Bounds(_))
    ));
}

// ── Plan CRUD ─────────────────────────────────────────────────

#[test]
fn added_plan_is_visible_at_slot_zero() {
    let feeder = make_feeder();
    let plan = make_plan("5", "2", "1", "1");
    assert!(feeder.add_meal_plan(plan.clone()));
    assert_eq!(feeder.meal_plan(0).unwrap(), Some(plan));
}

#[test]
fn duplicate_plan_is_rejected_softly() {
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("5", "2", "1", "1")));
    assert!(!feeder.add_meal_plan(make_plan("5", "2", "1", "1")));
}

#[test]
fn edit_replaces_and_returns_old_name() {
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("5", "2", "1", "1")));

    let mut new_plan = make_plan("10", "5", "6", "4");
    new_plan.set_name("Dinner").unwrap();
    let old = feeder.edit_meal_plan(0, new_plan.clone()).unwrap();

    assert_eq!(old.unwrap().as_str(), "TestMeal");
    assert_eq!(feeder.meal_plan(0).unwrap(), Some(new_plan));
}

#[test]
fn edit_empty_slot_reports_none() {
    let feeder = make_feeder();
    assert_eq!(feeder.edit_meal_plan(3, make_plan("1", "1", "1", "1")).unwrap(), None);
    assert_eq!(feeder.meal_plan(3).unwrap(), None);
}

#[test]
fn delete_returns_name_and_clears_slot() {
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("5", "2", "1", "1")));

    let removed = feeder.delete_meal_plan(0).unwrap();
    assert_eq!(removed.unwrap().as_str(), "TestMeal");
    assert_eq!(feeder.meal_plan(0).unwrap(), None);
}

#[test]
fn delete_out_of_range_errors_and_preserves_plans() {
    let feeder = make_feeder();
    assert!(feeder.add_meal_plan(make_plan("5", "2", "1", "1")));

    assert!(matches!(feeder.delete_meal_plan(9), Err(Error::Bounds(_))));
    assert!(feeder.meal_plan(0).unwrap().is_some());
}

#[test]
fn slots_view_preserves_order_and_gaps() {
    let feeder = make_feeder();
    let mut a = make_plan("1", "0", "0", "0");
    a.set_name("A").unwrap();
    let mut b = make_plan("2", "0", "0", "0");
    b.set_name("B").unwrap();
    assert!(feeder.add_meal_plan(a));
    assert!(feeder.add_meal_plan(b));
    feeder.delete_meal_plan(0).unwrap();

    let slots = feeder.meal_plans();
    assert_eq!(slots.len(), MEAL_PLAN_CAPACITY);
    assert!(slots[0].is_none());
    assert_eq!(slots[1].as_ref().unwrap().name(), "B");
}

// ── Replenishment ─────────────────────────────────────────────

#[test]
fn replenish_increases_reported_stock() {
    let feeder = make_feeder();
    feeder.replenish_food("20", "0", "0", "0").unwrap();
    assert!(feeder.check_stock().contains("Kibble: 35"));
}

#[test]
fn replenish_non_numeric_fails_without_mutation() {
    let feeder = make_feeder();
    let before = feeder.check_stock();
    assert!(feeder.replenish_food("abc", "0", "0", "0").is_err());
    assert_eq!(feeder.check_stock(), before);
}

#[test]
fn replenish_negative_fails_without_mutation() {
    let feeder = make_feeder();
    let before = feeder.check_stock();
    assert!(feeder.replenish_food("-5", "0", "0", "0").is_err());
    assert_eq!(feeder.check_stock(), before);
}
