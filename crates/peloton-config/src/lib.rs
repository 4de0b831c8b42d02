//! Configuration system for the peloton selection pipeline.
//!
//! Load selection settings from TOML files to control constraints,
//! the scoring policy, the solver time limit, and the race calendar
//! without code changes.
//!
//! # Examples
//!
//! Load settings from a TOML string:
//!
//! ```
//! use peloton_config::SelectionSettings;
//! use std::time::Duration;
//!
//! let settings = SelectionSettings::from_toml_str(r#"
//!     [selection]
//!     roster_size = 20
//!     budget_max = 45_000_000
//!     budget_min = 43_000_000
//!     min_starters_per_race = 3
//!
//!     [scoring]
//!     policy = "power_curve"
//!     exponent = 4.0
//!
//!     [solver]
//!     time_limit_seconds = 15
//!
//!     [[races]]
//!     id = "RVV"
//!     phase = "early"
//!     primary_skill = "cobbles"
//! "#).unwrap();
//!
//! assert_eq!(settings.solver.time_limit(), Duration::from_secs(15));
//! assert_eq!(settings.races.len(), 1);
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use peloton_config::SelectionSettings;
//!
//! let settings = SelectionSettings::load("selection.toml").unwrap_or_default();
//! // Proceeds with the game's stock numbers if the file doesn't exist.
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use peloton_core::{
    ConstraintSet, PhaseSplit, RaceCalendar, RaceDefinition, RacePhase, RiderId, TransferRules,
};
use peloton_scoring::{ScoreEngine, ScoringPolicy};


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main selection settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectionSettings {
    /// Constraint section: budget, roster size, forced picks.
    #[serde(default)]
    pub selection: SelectionSection,

    /// Scoring policy selection.
    #[serde(default)]
    pub scoring: ScoringSection,

    /// Solver bounds.
    #[serde(default)]
    pub solver: SolverSection,

    /// The race calendar.
    #[serde(default)]
    pub races: Vec<RaceEntry>,
}

impl SelectionSettings {
    /// Creates settings with the game's stock numbers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or contains invalid
    /// TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses settings from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Builds the typed constraint set, checking structural validity.
    pub fn constraint_set(&self) -> Result<ConstraintSet, ConfigError> {
        let section = &self.selection;
        let mut constraints = ConstraintSet::new(section.roster_size, section.budget_max)
            .with_budget_min(section.budget_min)
            .with_min_starters_per_race(section.min_starters_per_race)
            .with_must_include(section.must_include.iter().map(String::as_str))
            .with_must_exclude(section.must_exclude.iter().map(String::as_str));
        if let Some(transfer) = &section.transfer {
            let mut rules = TransferRules::new(PhaseSplit::new(
                transfer.base,
                transfer.early_only,
                transfer.late_only,
            ));
            rules.frozen_base = ids(&transfer.frozen_base);
            rules.frozen_early_only = ids(&transfer.frozen_early_only);
            rules.frozen_late_only = ids(&transfer.frozen_late_only);
            constraints = constraints.with_transfer(rules);
        }
        constraints
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(constraints)
    }

    /// Builds the configured score engine.
    pub fn score_engine(&self) -> Result<ScoreEngine, ConfigError> {
        Ok(ScoreEngine::new(self.scoring.policy()?)
            .with_tiebreak(self.scoring.tiebreak_skill.as_str()))
    }

    /// Builds the typed race calendar.
    pub fn calendar(&self) -> Result<RaceCalendar, ConfigError> {
        RaceCalendar::new(self.races.iter().map(|race| {
            RaceDefinition::new(
                race.id.as_str(),
                match race.phase {
                    PhaseEntry::Early => RacePhase::Early,
                    PhaseEntry::Late => RacePhase::Late,
                },
                race.primary_skill.as_str(),
            )
        }))
        .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn ids(names: &[String]) -> std::collections::BTreeSet<RiderId> {
    names.iter().map(|n| RiderId::new(n.as_str())).collect()
}

/// Constraint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectionSection {
    #[serde(default = "default_roster_size")]
    pub roster_size: usize,
    #[serde(default = "default_budget_max")]
    pub budget_max: u64,
    #[serde(default)]
    pub budget_min: u64,
    #[serde(default = "default_min_starters")]
    pub min_starters_per_race: usize,
    #[serde(default)]
    pub must_include: Vec<String>,
    #[serde(default)]
    pub must_exclude: Vec<String>,
    /// Present switches the solve into transfer-window mode.
    #[serde(default)]
    pub transfer: Option<TransferSection>,
}

impl Default for SelectionSection {
    fn default() -> Self {
        SelectionSection {
            roster_size: default_roster_size(),
            budget_max: default_budget_max(),
            budget_min: 0,
            min_starters_per_race: default_min_starters(),
            must_include: Vec::new(),
            must_exclude: Vec::new(),
            transfer: None,
        }
    }
}

fn default_roster_size() -> usize {
    20
}

fn default_budget_max() -> u64 {
    45_000_000
}

fn default_min_starters() -> usize {
    3
}

/// Transfer-window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferSection {
    #[serde(default = "default_base_slots")]
    pub base: usize,
    #[serde(default = "default_swap_slots")]
    pub early_only: usize,
    #[serde(default = "default_swap_slots")]
    pub late_only: usize,
    #[serde(default)]
    pub frozen_base: Vec<String>,
    #[serde(default)]
    pub frozen_early_only: Vec<String>,
    #[serde(default)]
    pub frozen_late_only: Vec<String>,
}

impl Default for TransferSection {
    fn default() -> Self {
        TransferSection {
            base: default_base_slots(),
            early_only: default_swap_slots(),
            late_only: default_swap_slots(),
            frozen_base: Vec::new(),
            frozen_early_only: Vec::new(),
            frozen_late_only: Vec::new(),
        }
    }
}

fn default_base_slots() -> usize {
    17
}

fn default_swap_slots() -> usize {
    3
}

/// Scoring policy selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringSection {
    #[serde(default)]
    pub policy: PolicyKind,
    /// Power-curve exponent; 4 is the smooth curve, 10 the extreme
    /// one.
    #[serde(default = "default_exponent")]
    pub exponent: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_tiebreak")]
    pub tiebreak_skill: String,
}

impl ScoringSection {
    pub fn policy(&self) -> Result<ScoringPolicy, ConfigError> {
        match self.policy {
            PolicyKind::RankTable => Ok(ScoringPolicy::rank_table()),
            PolicyKind::PowerCurve => {
                if self.exponent <= 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "power-curve exponent must be positive, got {}",
                        self.exponent
                    )));
                }
                Ok(ScoringPolicy::PowerCurve {
                    exponent: self.exponent,
                    scale: self.scale,
                })
            }
            PolicyKind::Tiered => Ok(ScoringPolicy::tiered()),
        }
    }
}

impl Default for ScoringSection {
    fn default() -> Self {
        ScoringSection {
            policy: PolicyKind::default(),
            exponent: default_exponent(),
            scale: default_scale(),
            tiebreak_skill: default_tiebreak(),
        }
    }
}

fn default_exponent() -> f64 {
    4.0
}

fn default_scale() -> f64 {
    100.0
}

fn default_tiebreak() -> String {
    "overall".to_string()
}

/// Which scoring policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    RankTable,
    PowerCurve,
    Tiered,
}

/// Solver bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverSection {
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: u64,
}

impl SolverSection {
    /// The wall-clock budget per solve call.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_seconds)
    }
}

impl Default for SolverSection {
    fn default() -> Self {
        SolverSection {
            time_limit_seconds: default_time_limit(),
        }
    }
}

fn default_time_limit() -> u64 {
    15
}

/// One race on the configured calendar.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RaceEntry {
    pub id: String,
    pub phase: PhaseEntry,
    pub primary_skill: String,
}

/// Calendar phase of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseEntry {
    Early,
    Late,
}
