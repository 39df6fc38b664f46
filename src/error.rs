//! Unified error types for the PetFeeder control core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! controller's error handling uniform. All variants are `Copy` so they can
//! be cheaply passed across the scheduler's tick boundary without
//! allocation.
//!
//! Expected domain outcomes (insufficient stock, insufficient energy, an
//! empty plan slot, a duplicate plan) are **not** errors; those are soft
//! failures reported as `false` by the operation concerned.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A stock or meal-plan amount failed validation.
    Stock(StockError),
    /// A plan index was outside the book's valid range.
    Bounds(BoundsError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock(e) => write!(f, "stock: {e}"),
            Self::Bounds(e) => write!(f, "bounds: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Stock / amount validation errors
// ---------------------------------------------------------------------------

/// Validation failures for ingredient amounts and plan names.
///
/// Raised synchronously from `replenish` and the `MealPlan` setters before
/// any mutation; the caller can retry with corrected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockError {
    /// The amount string did not parse as a decimal integer.
    NotANumber { field: &'static str },
    /// The amount parsed but was negative.
    Negative { field: &'static str },
    /// A plan name exceeded the fixed name capacity.
    NameTooLong,
}

impl fmt::Display for StockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber { field } => write!(f, "{field} amount is not a number"),
            Self::Negative { field } => write!(f, "{field} amount is negative"),
            Self::NameTooLong => write!(f, "plan name too long"),
        }
    }
}

impl From<StockError> for Error {
    fn from(e: StockError) -> Self {
        Self::Stock(e)
    }
}

// ---------------------------------------------------------------------------
// Index bounds errors
// ---------------------------------------------------------------------------

/// An index outside `[0, capacity)` on edit/delete/get/dispense.
///
/// Signals caller misuse rather than a domain condition; neither the book
/// nor the controller catches it internally. The scheduler absorbs it at
/// the tick boundary so a stale stored index cannot kill a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsError {
    pub index: usize,
    pub capacity: usize,
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plan index {} out of range (capacity {})",
            self.index, self.capacity
        )
    }
}

impl From<BoundsError> for Error {
    fn from(e: BoundsError) -> Self {
        Self::Bounds(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
