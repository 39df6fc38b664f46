//! Ingredient stock ledger.
//!
//! Tracks the four hopper quantities and owns every mutation path into
//! them: validated replenishment and check-then-subtract consumption.
//! Quantities are unsigned, so the "never negative" invariant holds by
//! construction; `consume` refuses to subtract unless every required
//! amount is covered.
//!
//! The ledger itself is not synchronized; exclusive access comes from the
//! controller's lock (see [`PetFeeder`](crate::feeder::PetFeeder)).

use core::fmt::Write as _;

use log::info;

use crate::config::FeederConfig;
use crate::error::StockError;
use crate::plans::MealPlan;

// ═══════════════════════════════════════════════════════════════
//  Ingredients
// ═══════════════════════════════════════════════════════════════

/// The four dispensable ingredients.
///
/// Doubles as the index into every per-ingredient array in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Ingredient {
    Kibble = 0,
    Treats = 1,
    Water = 2,
    WetFood = 3,
}

impl Ingredient {
    /// Total number of ingredients, used to size the quantity arrays.
    pub const COUNT: usize = 4;

    /// All ingredients in canonical (index) order.
    pub const ALL: [Self; Self::COUNT] = [Self::Kibble, Self::Treats, Self::Water, Self::WetFood];

    /// Human-readable label used in stock reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kibble => "Kibble",
            Self::Treats => "Treats",
            Self::Water => "Water",
            Self::WetFood => "Wet Food",
        }
    }

    /// Lower-case field name used in validation errors.
    pub const fn field(self) -> &'static str {
        match self {
            Self::Kibble => "kibble",
            Self::Treats => "treats",
            Self::Water => "water",
            Self::WetFood => "wet food",
        }
    }

    /// Energy units drawn from the feeding budget per dispensed unit.
    pub const fn energy_weight(self) -> u32 {
        match self {
            Self::Kibble => 10,
            Self::Treats => 5,
            Self::Water => 15,
            Self::WetFood => 20,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Amount parsing
// ═══════════════════════════════════════════════════════════════

/// Parse a user-supplied amount string as a non-negative integer.
///
/// Rejects anything that is not a decimal integer, anything negative, and
/// anything that does not fit the ledger's unit type.
pub(crate) fn parse_amount(field: &'static str, s: &str) -> Result<u32, StockError> {
    let s = s.trim();
    match s.parse::<u32>() {
        Ok(v) => Ok(v),
        // "-5" is a number, just an illegal one. Report it as such.
        Err(_) if s.parse::<i64>().is_ok_and(|v| v < 0) => Err(StockError::Negative { field }),
        Err(_) => Err(StockError::NotANumber { field }),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Stock ledger
// ═══════════════════════════════════════════════════════════════

/// Current hopper quantities, indexed by [`Ingredient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLedger {
    quantities: [u32; Ingredient::COUNT],
}

impl StockLedger {
    /// Create a ledger holding the configured initial stock.
    pub fn new(config: &FeederConfig) -> Self {
        Self {
            quantities: [
                config.initial_kibble,
                config.initial_treats,
                config.initial_water,
                config.initial_wet_food,
            ],
        }
    }

    /// Add validated amounts to every quantity.
    ///
    /// All four fields are parsed **before** anything is applied: a single
    /// bad field fails the whole call and leaves the ledger untouched.
    /// Additions saturate at the unit type's maximum.
    pub fn replenish(
        &mut self,
        kibble: &str,
        treats: &str,
        water: &str,
        wet_food: &str,
    ) -> Result<(), StockError> {
        let parsed = [
            parse_amount(Ingredient::Kibble.field(), kibble)?,
            parse_amount(Ingredient::Treats.field(), treats)?,
            parse_amount(Ingredient::Water.field(), water)?,
            parse_amount(Ingredient::WetFood.field(), wet_food)?,
        ];

        for (quantity, add) in self.quantities.iter_mut().zip(parsed) {
            *quantity = quantity.saturating_add(add);
        }
        info!(
            "Stock replenished: +{} kibble, +{} treats, +{} water, +{} wet food",
            parsed[0], parsed[1], parsed[2], parsed[3]
        );
        Ok(())
    }

    /// True iff every amount the plan requires is currently in stock.
    pub fn has_enough(&self, plan: &MealPlan) -> bool {
        Ingredient::ALL
            .iter()
            .all(|&ing| plan.amount(ing) <= self.quantity(ing))
    }

    /// Subtract the plan's amounts, but only if all are covered.
    ///
    /// Returns `false` without mutating anything when stock is short.
    /// Check and subtraction are one `&mut self` call, so under the
    /// controller's lock they form a single atomic unit.
    pub fn consume(&mut self, plan: &MealPlan) -> bool {
        if !self.has_enough(plan) {
            return false;
        }
        for ing in Ingredient::ALL {
            self.quantities[ing as usize] -= plan.amount(ing);
        }
        true
    }

    /// Current quantity of one ingredient.
    pub fn quantity(&self, ingredient: Ingredient) -> u32 {
        self.quantities[ingredient as usize]
    }

    /// Labeled multi-line stock summary, one `<Label>: <n>` line per
    /// ingredient.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for ing in Ingredient::ALL {
            let _ = writeln!(out, "{}: {}", ing.label(), self.quantity(ing));
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
