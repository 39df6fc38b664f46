//! Feeder configuration parameters
//!
//! All tunable parameters for the PetFeeder control core. Values are
//! plain data; loading and persisting them is the embedding application's
//! concern.

use serde::{Deserialize, Serialize};

/// Core feeder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeederConfig {
    // --- Initial stock (units) ---
    /// Kibble units loaded at startup
    pub initial_kibble: u32,
    /// Treat units loaded at startup
    pub initial_treats: u32,
    /// Water units loaded at startup
    pub initial_water: u32,
    /// Wet-food units loaded at startup
    pub initial_wet_food: u32,

    // --- Energy budget ---
    /// Dispensing allowance per feeding period (energy units)
    pub energy_limit: u32,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            // Stock: the hopper ships with a small factory load
            initial_kibble: 15,
            initial_treats: 15,
            initial_water: 15,
            initial_wet_food: 15,

            // Energy
            energy_limit: 500,
        }
    }
}
