//! Peloton - fantasy-cycling team selection
//!
//! Combines rider prices, skill ratings, and race start-lists into a
//! scored table, then selects the roster that maximizes projected
//! fantasy points under budget, roster-size, and per-race-coverage
//! constraints - including the mid-season transfer window that splits
//! the roster into base, early-only, and late-only roles.
//!
//! # Example
//!
//! ```rust
//! use peloton::prelude::*;
//!
//! let catalog = RiderCatalog::from_riders([
//!     Rider::new("a", "A", 2_000_000)
//!         .with_skill("cobbles", 92)
//!         .with_skill("overall", 88)
//!         .with_start("RVV"),
//!     Rider::new("b", "B", 1_000_000)
//!         .with_skill("cobbles", 80)
//!         .with_skill("overall", 75)
//!         .with_start("RVV"),
//! ])
//! .unwrap();
//!
//! let settings = SelectionSettings::from_toml_str(r#"
//!     [selection]
//!     roster_size = 2
//!     budget_max = 3_000_000
//!     min_starters_per_race = 1
//!
//!     [[races]]
//!     id = "RVV"
//!     phase = "early"
//!     primary_skill = "cobbles"
//! "#)
//! .unwrap();
//!
//! let outcome = select_team(&catalog, &settings).unwrap();
//! assert!(outcome.is_optimal());
//! ```

// Domain types
pub use peloton_core::{
    ConstraintConflictError, ConstraintSet, DataQualityError, Incumbent, PhaseSplit,
    RaceCalendar, RaceDefinition, RaceId, RacePhase, Rider, RiderCatalog, RiderId, Roster,
    RosterDiff, RosterRole, SelectionError, SkillId, SolveOutcome, TransferRules,
};

// Scoring
pub use peloton_scoring::{
    ScoreEngine, ScoredCatalog, ScoredRider, ScoringPolicy, Specialty, Tier,
};

// Solver and reports
pub use peloton_solver::{
    budget_report, captain_advice, finetune, BudgetReport, FinetuneOutcome, FinetuneRequest,
    RaceAdvice, RosterSolver, TimeBudget, Weakness,
};

// Configuration
pub use peloton_config::{ConfigError, SelectionSettings};

mod select;
pub use select::{select_team, PipelineError};

pub mod prelude {
    pub use super::{
        select_team, ConstraintSet, PhaseSplit, RaceCalendar, RaceDefinition, RacePhase, Rider,
        RiderCatalog, RiderId, Roster, RosterRole, ScoreEngine, ScoringPolicy,
        SelectionSettings, SolveOutcome, TimeBudget, TransferRules,
    };
    pub use super::{finetune, FinetuneRequest, RosterSolver};
}
