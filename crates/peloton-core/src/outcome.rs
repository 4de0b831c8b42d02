//! Tagged solve outcomes.
//!
//! Every solve call returns exactly one of these; the optimizer never
//! substitutes a default or partial roster for a failed solve. Fatal
//! pre-solve problems travel separately as
//! [`SelectionError`](crate::error::SelectionError).

use serde::{Deserialize, Serialize};

use crate::roster::Roster;

/// A feasible roster found before the deadline, not proven optimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incumbent {
    pub roster: Roster,
    pub objective: f64,
}

/// The result of one solve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// A certified optimum.
    Optimal { roster: Roster, objective: f64 },
    /// Certified empty feasible region, with the reason.
    Infeasible { reason: String },
    /// Deadline hit; the best found so far (if any) is not proven optimal.
    TimedOut { best: Option<Incumbent> },
}

impl SolveOutcome {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal { .. })
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveOutcome::Infeasible { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, SolveOutcome::TimedOut { .. })
    }

    /// The roster, when one exists (optimal, or best-found on timeout).
    pub fn roster(&self) -> Option<&Roster> {
        match self {
            SolveOutcome::Optimal { roster, .. } => Some(roster),
            SolveOutcome::TimedOut { best: Some(inc) } => Some(&inc.roster),
            _ => None,
        }
    }

    /// The objective value, when a roster exists.
    pub fn objective(&self) -> Option<f64> {
        match self {
            SolveOutcome::Optimal { objective, .. } => Some(*objective),
            SolveOutcome::TimedOut { best: Some(inc) } => Some(inc.objective),
            _ => None,
        }
    }
}
