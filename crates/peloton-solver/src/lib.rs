//! Peloton Solver - Exact roster optimization
//!
//! This crate provides the optimizer at the heart of the selection
//! pipeline:
//! - [`RosterSolver`]: certified-optimal team selection under budget,
//!   cardinality, coverage, and forced-pick constraints, in
//!   single-phase or transfer-window mode
//! - [`TimeBudget`]: the explicit wall-clock budget every solve runs
//!   under
//! - [`finetune`]: incremental re-solve around an accepted roster
//! - advisor report projections over a solved roster
//!
//! The solver is a depth-first branch-and-bound over a binary
//! rider-role model: one decision per rider and role, a linear
//! objective, and linear constraint rows. It returns a certified
//! optimum, a certified infeasibility, or an explicitly unproven
//! incumbent on deadline - never a silent partial answer.

mod model;
mod search;

pub mod finetune;
pub mod reports;
pub mod solve;
pub mod termination;

pub use finetune::{finetune, FinetuneOutcome, FinetuneRequest};
pub use reports::{budget_report, captain_advice, BudgetReport, RaceAdvice, Weakness};
pub use solve::RosterSolver;
pub use termination::TimeBudget;
