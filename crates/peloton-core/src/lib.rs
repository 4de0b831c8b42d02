//! Peloton Core - Domain types for fantasy-cycling team selection
//!
//! This crate provides the shared vocabulary of the selection pipeline:
//! - Riders and the reconciled rider catalog
//! - The race calendar with phases and primary skills
//! - Constraint sets describing a selection request
//! - Rosters and tagged solve outcomes
//! - The error taxonomy (data quality vs. constraint conflicts)

pub mod constraint;
pub mod error;
pub mod outcome;
pub mod race;
pub mod rider;
pub mod roster;

pub use constraint::{ConstraintSet, PhaseSplit, TransferRules};
pub use error::{ConstraintConflictError, DataQualityError, Result, SelectionError};
pub use outcome::{Incumbent, SolveOutcome};
pub use race::{RaceCalendar, RaceDefinition, RaceId, RacePhase, SkillId};
pub use rider::{Rider, RiderCatalog, RiderId};
pub use roster::{Roster, RosterDiff, RosterRole};
