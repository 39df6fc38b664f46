//! Meal plans and the fixed-capacity plan book.
//!
//! A [`MealPlan`] bundles a bounded name with the four required ingredient
//! amounts; its energy cost is the weighted sum of those amounts. The
//! [`MealPlanBook`] stores plans in a fixed slot array addressed by index:
//! an empty slot is `None`, and an index outside the array is a hard
//! [`BoundsError`], never a silent failure.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{BoundsError, StockError};
use crate::stock::{parse_amount, Ingredient};

/// Maximum plan name length (bytes).
pub const PLAN_NAME_CAPACITY: usize = 32;

/// Bounded, allocation-free plan name.
pub type PlanName = heapless::String<PLAN_NAME_CAPACITY>;

/// Maximum number of stored meal plans.
pub const MEAL_PLAN_CAPACITY: usize = 5;

// ═══════════════════════════════════════════════════════════════
//  Meal plan
// ═══════════════════════════════════════════════════════════════

/// A named bundle of required ingredient amounts.
///
/// Equality is structural: two plans are equal iff their names and all
/// four amounts match. Serializable so the embedding application can
/// exchange plans with a companion app.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MealPlan {
    name: PlanName,
    amounts: [u32; Ingredient::COUNT],
}

impl MealPlan {
    /// A plan with an empty name and zero amounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plan name. Rejects names over [`PLAN_NAME_CAPACITY`] bytes
    /// rather than truncating.
    pub fn set_name(&mut self, name: &str) -> Result<(), StockError> {
        let mut bounded = PlanName::new();
        bounded
            .push_str(name)
            .map_err(|()| StockError::NameTooLong)?;
        self.name = bounded;
        Ok(())
    }

    /// Set one required amount from a user-supplied string.
    ///
    /// Validation matches [`StockLedger::replenish`](crate::stock::StockLedger::replenish):
    /// non-numeric or negative input fails without mutating the plan.
    pub fn set_amount(&mut self, ingredient: Ingredient, amount: &str) -> Result<(), StockError> {
        self.amounts[ingredient as usize] = parse_amount(ingredient.field(), amount)?;
        Ok(())
    }

    /// Plan name (empty if never set).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required amount of one ingredient.
    pub fn amount(&self, ingredient: Ingredient) -> u32 {
        self.amounts[ingredient as usize]
    }

    /// Energy drawn from the feeding budget when this plan is dispensed:
    /// the sum of each amount times its ingredient's fixed weight.
    pub fn energy_cost(&self) -> u32 {
        Ingredient::ALL
            .iter()
            .map(|&ing| self.amount(ing) * ing.energy_weight())
            .sum()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Plan book
// ═══════════════════════════════════════════════════════════════

/// Fixed-capacity, index-addressed store of meal plans.
#[derive(Debug, Clone, Default)]
pub struct MealPlanBook {
    slots: [Option<MealPlan>; MEAL_PLAN_CAPACITY],
}

impl MealPlanBook {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None, None],
        }
    }

    /// Store a plan in the first empty slot (ascending index order).
    ///
    /// Soft-fails with `false` when an equal plan is already stored or
    /// every slot is occupied.
    pub fn add(&mut self, plan: MealPlan) -> bool {
        if self.slots.iter().flatten().any(|stored| *stored == plan) {
            return false;
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                info!("Meal plan '{}' added at slot {}", plan.name(), i);
                *slot = Some(plan);
                return true;
            }
        }
        false // All slots full.
    }

    /// Replace the plan at `index`, returning the previous plan's name.
    ///
    /// `Ok(None)` when the slot is empty; `Err` when the index is out of
    /// range.
    pub fn edit(&mut self, index: usize, plan: MealPlan) -> Result<Option<PlanName>, BoundsError> {
        self.check_bounds(index)?;
        match self.slots[index].as_mut() {
            Some(stored) => {
                let previous = stored.name.clone();
                info!("Meal plan at slot {} replaced by '{}'", index, plan.name());
                *stored = plan;
                Ok(Some(previous))
            }
            None => Ok(None),
        }
    }

    /// Clear the slot at `index`, returning the removed plan's name.
    ///
    /// Same bounds/empty contract as [`edit`](Self::edit).
    pub fn remove(&mut self, index: usize) -> Result<Option<PlanName>, BoundsError> {
        self.check_bounds(index)?;
        match self.slots[index].take() {
            Some(removed) => {
                info!("Meal plan '{}' removed from slot {}", removed.name(), index);
                Ok(Some(removed.name))
            }
            None => Ok(None),
        }
    }

    /// The plan at `index`, or `None` for an empty slot.
    pub fn get(&self, index: usize) -> Result<Option<&MealPlan>, BoundsError> {
        self.check_bounds(index)?;
        Ok(self.slots[index].as_ref())
    }

    /// Ordered view of every slot, occupied or not.
    pub fn slots(&self) -> &[Option<MealPlan>] {
        &self.slots
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_bounds(&self, index: usize) -> Result<(), BoundsError> {
        if index < MEAL_PLAN_CAPACITY {
            Ok(())
        } else {
            Err(BoundsError {
                index,
                capacity: MEAL_PLAN_CAPACITY,
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
