//! The bribe manager: gates statements on accumulated payments.
//!
//! Accounting runs in one of two regimes. In [`Regime::Linear`] every gated
//! statement at the top level drains the pending payments and must see a
//! collected total of at least the base cost; nothing is deducted. Entering
//! the first loop switches to [`Regime::Nested`]: pending payments are
//! drained once and every loop entry deducts the base cost. Iterations of a
//! running loop are not charged again, but a loop entered anew (an inner
//! loop on each outer iteration, or a later loop at the same depth) pays
//! again. The first top-level non-loop statement after that switches back
//! to `Linear`, keeping whatever is left of the collected total.

use std::fmt;

use thiserror::Error;

use crate::config::BribeConfig;
use crate::value::format_number;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BribeError {
    #[error("Unknown parichay: {0}")]
    UnknownProfile(String),

    #[error("No parichay given. Declare who you are with 'parichay' before anything else.")]
    ProfileNotDeclared,

    #[error(
        "Your work progress has been halted due to insufficient sweet packets. Short by {}.",
        fmt_amount(.shortfall)
    )]
    Insufficient { shortfall: f64 },

    #[error(
        "Your work progress has been halted due to insufficient sweet packets. The loop needs {} more.",
        fmt_amount(.deficit)
    )]
    Deficit { deficit: f64 },
}

fn fmt_amount(value: &f64) -> String {
    format_number(*value)
}

/// Accounting regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Linear,
    Nested,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Linear => f.write_str("LINEAR"),
            Regime::Nested => f.write_str("NESTED"),
        }
    }
}

#[derive(Debug, Clone)]
struct Profile {
    name: String,
    discount: f64,
}

#[derive(Debug, Clone)]
pub struct BribeManager {
    config: BribeConfig,
    profile: Option<Profile>,
    base_cost: f64,
    cost_factor: u64,
    required: f64,
    collected: f64,
    /// Payments not yet applied. Drained from the tail.
    pending: Vec<f64>,
    regime: Regime,
    depth: u32,
    commentary_due: bool,
}

impl BribeManager {
    pub fn new(config: BribeConfig) -> Self {
        let base_cost = config.undiscounted_base();
        Self {
            config,
            profile: None,
            base_cost,
            cost_factor: 0,
            required: 0.0,
            collected: 0.0,
            pending: Vec::new(),
            regime: Regime::Linear,
            depth: 0,
            commentary_due: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Per-statement cost, including the profile discount once declared.
    pub fn base_cost(&self) -> f64 {
        self.base_cost
    }

    /// Base cost times the program's cost factor.
    pub fn required_total(&self) -> f64 {
        self.required
    }

    pub fn collected(&self) -> f64 {
        self.collected
    }

    pub fn pending(&self) -> &[f64] {
        &self.pending
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Current loop nesting depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.name.as_str())
    }

    // ── Setup ────────────────────────────────────────────────────────────

    /// Record the program's cost factor and compute the required total.
    pub fn assess(&mut self, cost_factor: u64) {
        self.cost_factor = cost_factor;
        self.required = self.base_cost * cost_factor as f64;
        tracing::info!(
            cost_factor,
            base_cost = self.base_cost,
            required = self.required,
            "assessed program"
        );
    }

    /// Declare the caller's profile. Recomputes the base cost with its discount.
    pub fn set_profile(&mut self, name: &str) -> Result<(), BribeError> {
        let (name, discount) = self
            .config
            .profile(name)
            .ok_or_else(|| BribeError::UnknownProfile(name.to_string()))?;
        self.base_cost = self.config.undiscounted_base() * discount;
        self.required = self.base_cost * self.cost_factor as f64;
        tracing::info!(
            profile = %name,
            discount,
            base_cost = self.base_cost,
            required = self.required,
            "profile declared"
        );
        self.profile = Some(Profile { name, discount });
        self.commentary_due = true;
        Ok(())
    }

    /// Queue a payment. Returns everything paid so far, applied or not.
    pub fn collect(&mut self, amount: f64) -> f64 {
        self.pending.push(amount);
        let total = self.collected + self.pending.iter().sum::<f64>();
        tracing::debug!(amount, total, "payment queued");
        total
    }

    // ── Authorization ────────────────────────────────────────────────────

    /// Authorize entering a loop and charge for it. On success the loop
    /// counts towards [`depth`](Self::depth) until [`exit_loop`](Self::exit_loop);
    /// a rejected entry leaves the depth unchanged.
    pub fn enter_loop(&mut self) -> Result<(), BribeError> {
        self.require_profile()?;
        if self.depth == 0 && self.regime == Regime::Linear {
            self.drain_pending();
            self.regime = Regime::Nested;
            tracing::debug!(collected = self.collected, "switched to NESTED");
        }
        self.collected -= self.base_cost;
        tracing::debug!(
            depth = self.depth + 1,
            charge = self.base_cost,
            collected = self.collected,
            "charged loop entry"
        );
        if self.collected < 0.0 {
            return Err(BribeError::Deficit {
                deficit: -self.collected,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave the innermost loop. Called on every exit path, including
    /// break and return.
    pub fn exit_loop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Authorize a gated statement that is not a loop.
    pub fn authorize_statement(&mut self) -> Result<(), BribeError> {
        self.require_profile()?;
        if self.depth > 0 {
            return Ok(());
        }
        if self.regime == Regime::Nested {
            self.regime = Regime::Linear;
            tracing::debug!(collected = self.collected, "switched to LINEAR");
        }
        self.drain_pending();
        if self.collected < self.base_cost {
            let shortfall = self.base_cost - self.collected;
            tracing::debug!(shortfall, "statement rejected");
            return Err(BribeError::Insufficient { shortfall });
        }
        Ok(())
    }

    /// Commentary for the declared profile, once per declaration.
    pub fn take_commentary(&mut self) -> Option<String> {
        if !self.commentary_due {
            return None;
        }
        let profile = self.profile.as_ref()?;
        self.commentary_due = false;
        let line = match profile.name.as_str() {
            "JANTA" => {
                "Aam aadmi ki ghoos seedhi seedhi hai. Bas files clear hone ka wait kijiye!".into()
            }
            "STUDENT" => "Discount laga diya hai! Ghoos student-friendly bana di gayi hai!".into(),
            "CHACHA VIDHAYAK HAI" => {
                "Sir aapka kaam already ho chuka hai. Koi chinta nahi, aap toh apne hai!".into()
            }
            "NETA JI" => {
                "Neta Ji, Chinta mat kijiye, case register ho gaya hai. Aapse kya ghoos lena".into()
            }
            "BABU SAHEB" => format!(
                "Aapka kaam bhi hoga, aur aapko {} bhi wapis mil gaye hai. Babu ji ka style hi alag hai!",
                format_number(self.collected)
            ),
            other => format!(
                "Parichay '{other}' darj ho gaya. Chhoot: {}%",
                format_number((1.0 - profile.discount) * 100.0)
            ),
        };
        Some(line)
    }

    fn require_profile(&self) -> Result<(), BribeError> {
        if self.profile.is_none() {
            return Err(BribeError::ProfileNotDeclared);
        }
        Ok(())
    }

    fn drain_pending(&mut self) {
        while let Some(amount) = self.pending.pop() {
            self.collected += amount;
        }
    }
}
