//! Error taxonomy for the selection pipeline.
//!
//! Two fatal classes are distinguished so callers can give different
//! guidance: [`DataQualityError`] means "fix your data" (bad upstream
//! ingestion), [`ConstraintConflictError`] means "fix your request"
//! (a selection request that contradicts itself). Both stop a solve
//! before the search starts. An empty feasible region is *not* an
//! error: it is the `Infeasible` variant of
//! [`SolveOutcome`](crate::outcome::SolveOutcome).

use thiserror::Error;

use crate::race::{RaceId, SkillId};
use crate::rider::RiderId;

/// Bad upstream data, surfaced before any solve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataQualityError {
    /// A price of zero would make value-per-cost undefined.
    #[error("rider {0} has a zero price")]
    ZeroPrice(RiderId),

    /// Skill ratings live in 0..=100; anything else is never clamped.
    #[error("rider {rider} has {skill} rating {value}, outside 0..=100")]
    SkillOutOfRange {
        rider: RiderId,
        skill: SkillId,
        value: u8,
    },

    /// A rating the calendar needs is absent; no default is substituted.
    #[error("rider {rider} has no {skill} rating, which the calendar requires")]
    MissingSkill { rider: RiderId, skill: SkillId },

    /// A start-list entry references a race the calendar does not know.
    #[error("rider {rider} starts {race}, which is not on the calendar")]
    UnknownRace { rider: RiderId, race: RaceId },

    /// Rider ids must be unique; deduplication is the ingestion layer's job.
    #[error("duplicate rider id {0}")]
    DuplicateRider(RiderId),

    /// Race ids must be unique on the calendar.
    #[error("duplicate race id {0}")]
    DuplicateRace(RaceId),
}

/// A selection request that contradicts itself.
///
/// These are caller errors on the request side, detected before the
/// search runs, each with an explicit reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintConflictError {
    #[error("roster size must be positive")]
    EmptyRoster,

    #[error("budget_min {min} exceeds budget_max {max}")]
    BudgetBandInverted { min: u64, max: u64 },

    #[error("rider {0} is both must-include and must-exclude")]
    IncludeExcludeOverlap(RiderId),

    #[error("must-include lists {count} riders for {roster_size} roster slots")]
    IncludeOverSize { count: usize, roster_size: usize },

    #[error("must-include riders cost {cost} together, over the budget cap {budget_max}")]
    IncludeOverBudget { cost: u64, budget_max: u64 },

    #[error("phase split {base}+{early_only}+{late_only} does not sum to roster size {roster_size}")]
    PhaseSplitMismatch {
        base: usize,
        early_only: usize,
        late_only: usize,
        roster_size: usize,
    },

    #[error("rider {0} is frozen into more than one role")]
    FrozenRoleOverlap(RiderId),

    #[error("rider {0} is frozen into a role but also must-excluded")]
    FrozenExcluded(RiderId),

    #[error("{count} riders are frozen as {role}, but the split allows only {limit}")]
    FrozenOverSplit {
        role: &'static str,
        count: usize,
        limit: usize,
    },

    #[error("constraint list references unknown rider id {0}")]
    UnknownRider(RiderId),
}

/// Fatal pre-solve errors; see the module docs for the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("data quality: {0}")]
    DataQuality(#[from] DataQualityError),

    #[error("constraint conflict: {0}")]
    ConstraintConflict(#[from] ConstraintConflictError),
}

/// Result type alias for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;
