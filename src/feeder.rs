//! Feeder controller.
//!
//! [`PetFeeder`] owns the stock ledger, the plan book, and the per-period
//! energy counter, and guards all three behind one mutex. Every public
//! operation takes the lock for its whole check-then-act span, so a
//! scheduled dispense on the background thread and a replenish or plan
//! edit on the caller thread can never interleave mid-mutation.
//!
//! ```text
//!  caller thread ──▶ ┌──────────────────────────┐
//!                    │  PetFeeder (one mutex)   │
//!  tick thread  ──▶  │  stock · plans · energy  │
//!                    └──────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::config::FeederConfig;
use crate::error::Result;
use crate::plans::{MealPlan, MealPlanBook, PlanName};
use crate::stock::StockLedger;

/// Everything the controller mutates, as one lockable unit.
struct FeederInner {
    stock: StockLedger,
    plans: MealPlanBook,
    remaining_energy: u32,
}

/// The feeder controller.
pub struct PetFeeder {
    energy_limit: u32,
    inner: Mutex<FeederInner>,
}

impl PetFeeder {
    /// Build a feeder from configuration: initial stock loaded, empty plan
    /// book, full energy budget.
    pub fn new(config: &FeederConfig) -> Self {
        Self {
            energy_limit: config.energy_limit,
            inner: Mutex::new(FeederInner {
                stock: StockLedger::new(config),
                plans: MealPlanBook::new(),
                remaining_energy: config.energy_limit,
            }),
        }
    }

    // ── Dispensing ────────────────────────────────────────────

    /// Attempt to dispense the plan at `index`.
    ///
    /// Returns `Err` for an out-of-range index (caller misuse), `Ok(false)`
    /// for every expected inability (empty slot, energy cost above the
    /// remaining budget, insufficient stock), and `Ok(true)` once the
    /// stock is consumed and the budget debited.
    ///
    /// All-or-nothing: on any `Ok(false)` the ledger and the energy
    /// counter are exactly as they were before the call.
    pub fn dispense(&self, index: usize) -> Result<bool> {
        let mut inner = self.lock();

        let Some(plan) = inner.plans.get(index)? else {
            debug!("Dispense skipped: slot {} is empty", index);
            return Ok(false);
        };

        let cost = plan.energy_cost();
        if cost > inner.remaining_energy {
            debug!(
                "Dispense skipped: plan {} costs {} but only {} energy remains",
                index, cost, inner.remaining_energy
            );
            return Ok(false);
        }

        // `get` hands back a borrow of `inner`; clone the plan so the
        // ledger can be mutated.
        let plan = plan.clone();
        if !inner.stock.consume(&plan) {
            debug!("Dispense skipped: insufficient stock for plan {}", index);
            return Ok(false);
        }

        inner.remaining_energy -= cost;
        info!(
            "Dispensed plan {} ('{}'): cost {}, {} energy remaining",
            index,
            plan.name(),
            cost,
            inner.remaining_energy
        );
        Ok(true)
    }

    // ── Stock operations ──────────────────────────────────────

    /// Validated stock replenishment; see
    /// [`StockLedger::replenish`](crate::stock::StockLedger::replenish).
    pub fn replenish_food(
        &self,
        kibble: &str,
        treats: &str,
        water: &str,
        wet_food: &str,
    ) -> Result<()> {
        self.lock()
            .stock
            .replenish(kibble, treats, water, wet_food)?;
        Ok(())
    }

    /// Labeled multi-line stock summary.
    pub fn check_stock(&self) -> String {
        self.lock().stock.report()
    }

    // ── Plan operations ───────────────────────────────────────

    /// Store a plan; soft-fails on duplicate or full book.
    pub fn add_meal_plan(&self, plan: MealPlan) -> bool {
        self.lock().plans.add(plan)
    }

    /// Replace the plan at `index`, returning the previous plan's name.
    pub fn edit_meal_plan(&self, index: usize, plan: MealPlan) -> Result<Option<PlanName>> {
        Ok(self.lock().plans.edit(index, plan)?)
    }

    /// Delete the plan at `index`, returning the removed plan's name.
    pub fn delete_meal_plan(&self, index: usize) -> Result<Option<PlanName>> {
        Ok(self.lock().plans.remove(index)?)
    }

    /// Clone of the plan at `index` (`None` for an empty slot).
    pub fn meal_plan(&self, index: usize) -> Result<Option<MealPlan>> {
        Ok(self.lock().plans.get(index)?.cloned())
    }

    /// Cloned ordered view of every plan slot.
    pub fn meal_plans(&self) -> Vec<Option<MealPlan>> {
        self.lock().plans.slots().to_vec()
    }

    // ── Energy budget ─────────────────────────────────────────

    /// The fixed per-period allowance.
    pub fn energy_limit(&self) -> u32 {
        self.energy_limit
    }

    /// Allowance still available this period.
    pub fn remaining_energy_budget(&self) -> u32 {
        self.lock().remaining_energy
    }

    /// Begin a new feeding period: restore the counter to the limit.
    pub fn reset_energy_budget(&self) {
        let mut inner = self.lock();
        inner.remaining_energy = self.energy_limit;
        info!("Energy budget reset to {}", self.energy_limit);
    }

    // ── Internal ──────────────────────────────────────────────

    /// Take the controller lock, recovering from poisoning: a panic
    /// absorbed at the scheduler's tick boundary must not brick every
    /// later operation.
    fn lock(&self) -> MutexGuard<'_, FeederInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
