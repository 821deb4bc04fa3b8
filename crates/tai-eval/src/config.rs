//! Interpreter configuration.
//!
//! Every field has a default, so a partial TOML or JSON document
//! deserializes into a complete configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub bribe: BribeConfig,
    /// Append profile-flavoured commentary to the output log.
    pub commentary: bool,
    /// Maximum iterations of a single loop execution.
    pub loop_iteration_limit: Option<u64>,
}

/// Cost model of the bribe manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BribeConfig {
    pub base_amount: f64,
    pub reference_year: i32,
    pub yearly_growth: f64,
    /// Year used for compounding. `None` means the current UTC year.
    pub current_year: Option<i32>,
    /// Profile name to discount multiplier. Names match case-insensitively.
    pub profiles: BTreeMap<String, f64>,
}

impl Default for BribeConfig {
    fn default() -> Self {
        let profiles = [
            ("JANTA", 1.0),
            ("STUDENT", 0.5),
            ("CHACHA VIDHAYAK HAI", 0.0),
            ("BABU SAHEB", 1.0),
            ("NETA JI", 0.0),
        ]
        .into_iter()
        .map(|(name, discount)| (name.to_string(), discount))
        .collect();
        Self {
            base_amount: 500.0,
            reference_year: 2025,
            yearly_growth: 1.5,
            current_year: None,
            profiles,
        }
    }
}

impl BribeConfig {
    /// The year costs are compounded to.
    pub fn year(&self) -> i32 {
        self.current_year
            .unwrap_or_else(|| time::OffsetDateTime::now_utc().year())
    }

    /// Base cost before any profile discount.
    pub fn undiscounted_base(&self) -> f64 {
        self.base_amount * self.yearly_growth.powi(self.year() - self.reference_year)
    }

    /// Look up a profile by name, ignoring case. Returns the canonical
    /// upper-case name and its discount.
    pub fn profile(&self, name: &str) -> Option<(String, f64)> {
        let wanted = name.to_uppercase();
        self.profiles
            .iter()
            .find(|(key, _)| key.to_uppercase() == wanted)
            .map(|(_, discount)| (wanted, *discount))
    }
}
