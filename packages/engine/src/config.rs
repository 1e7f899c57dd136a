use std::collections::HashMap;

use common::Role;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Declarative scoring rules.
///
/// The role→weight table is the single source of truth for final-phase vote
/// weighting; the aggregator never hard-codes per-role literals.
#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Minimum `approval_percentage` (0-100) for a screening evaluation to
    /// approve a submission.
    pub approval_threshold: u8,
    /// Per-role multiplier applied to final-phase votes at aggregation time.
    pub final_vote_weights: HashMap<Role, u32>,
    /// Multiplier for roles absent from the table.
    pub default_final_weight: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            approval_threshold: 50,
            final_vote_weights: HashMap::from([(Role::Professor, 3), (Role::Admin, 3)]),
            default_final_weight: 1,
        }
    }
}

impl ScoringConfig {
    /// Weight of one final-phase vote cast by `role`.
    pub fn final_weight(&self, role: Role) -> u32 {
        self.final_vote_weights
            .get(&role)
            .copied()
            .unwrap_or(self.default_final_weight)
    }

    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("approval_threshold", 50)?
            .set_default("default_final_weight", 1)?
            .set_default("final_vote_weights.professor", 3)?
            .set_default("final_vote_weights.admin", 3)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., DEMODAY__APPROVAL_THRESHOLD)
            .add_source(Environment::with_prefix("DEMODAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
