//! The public solve entry point.
//!
//! Logging levels:
//! - **INFO**: solve start/end with problem scale and outcome
//! - **DEBUG**: incumbent improvements during the search

use std::collections::BTreeSet;

use tracing::info;

use peloton_core::{
    ConstraintSet, Incumbent, RaceCalendar, RiderId, Roster, SelectionError, SolveOutcome,
};
use peloton_scoring::ScoredCatalog;

use crate::model::{ModelBuild, Role, SelectionModel};
use crate::search::branch_and_bound;
use crate::termination::TimeBudget;

/// The roster optimizer.
///
/// Stateless across calls: each solve takes the scored catalog and a
/// constraint set as immutable inputs and returns a fresh outcome.
/// The caller owns session state such as "the current team".
///
/// # Example
///
/// ```
/// use peloton_core::{ConstraintSet, RaceCalendar, RaceDefinition, RacePhase, Rider};
/// use peloton_scoring::{ScoredCatalog, ScoredRider};
/// use peloton_solver::{RosterSolver, TimeBudget};
///
/// let scored = ScoredCatalog::from_riders([
///     ScoredRider::with_projection(Rider::new("a", "A", 6_000_000), 1000.0, 0.0),
///     ScoredRider::with_projection(Rider::new("b", "B", 5_000_000), 950.0, 0.0),
/// ])
/// .unwrap();
/// let calendar = RaceCalendar::default();
/// let constraints = ConstraintSet::new(1, 6_000_000);
///
/// let outcome = RosterSolver::new(TimeBudget::seconds(5))
///     .solve(&scored, &calendar, &constraints)
///     .unwrap();
/// assert_eq!(outcome.objective(), Some(1000.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterSolver {
    budget: TimeBudget,
}

impl RosterSolver {
    pub fn new(budget: TimeBudget) -> Self {
        RosterSolver { budget }
    }

    pub fn budget(&self) -> TimeBudget {
        self.budget
    }

    /// Solves one selection request.
    ///
    /// Returns `Err` only for fatal pre-solve problems (bad data, a
    /// self-contradicting request). An empty feasible region or a
    /// deadline hit is an `Ok` outcome the caller inspects.
    pub fn solve(
        &self,
        scored: &ScoredCatalog,
        calendar: &RaceCalendar,
        constraints: &ConstraintSet,
    ) -> Result<SolveOutcome, SelectionError> {
        info!(
            event = "solve_start",
            riders = scored.len(),
            races = calendar.len(),
            roster_size = constraints.roster_size,
            mode = if constraints.is_transfer() {
                "transfer"
            } else {
                "single"
            },
        );

        let model = match SelectionModel::build(scored, calendar, constraints)? {
            ModelBuild::Ready(model) => model,
            ModelBuild::Infeasible(reason) => {
                info!(event = "solve_end", outcome = "infeasible", reason = %reason);
                return Ok(SolveOutcome::Infeasible { reason });
            }
        };

        let result = branch_and_bound(&model, self.budget.start());
        let outcome = match (result.proven, result.best) {
            (true, Some((assignment, objective))) => SolveOutcome::Optimal {
                roster: roster_from(&model, &assignment),
                objective,
            },
            (true, None) => SolveOutcome::Infeasible {
                reason: "no roster satisfies the budget, coverage, and role constraints"
                    .to_string(),
            },
            (false, best) => SolveOutcome::TimedOut {
                best: best.map(|(assignment, objective)| Incumbent {
                    roster: roster_from(&model, &assignment),
                    objective,
                }),
            },
        };

        let label = match &outcome {
            SolveOutcome::Optimal { .. } => "optimal",
            SolveOutcome::Infeasible { .. } => "infeasible",
            SolveOutcome::TimedOut { .. } => "timed_out",
        };
        info!(event = "solve_end", outcome = label, nodes = result.nodes);
        Ok(outcome)
    }
}

fn roster_from(model: &SelectionModel, assignment: &[Option<Role>]) -> Roster {
    let ids_with = |role: Role| -> BTreeSet<RiderId> {
        assignment
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == Some(role))
            .map(|(i, _)| model.candidates[i].id.clone())
            .collect()
    };
    if model.transfer {
        Roster::Transfer {
            base: ids_with(Role::Base),
            early_only: ids_with(Role::EarlyOnly),
            late_only: ids_with(Role::LateOnly),
        }
    } else {
        Roster::Single(ids_with(Role::Base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peloton_core::Rider;
    use peloton_scoring::ScoredRider;

    fn scored(prices_evs: &[(&str, u64, f64)]) -> ScoredCatalog {
        ScoredCatalog::from_riders(prices_evs.iter().map(|&(id, price, ev)| {
            ScoredRider::with_projection(Rider::new(id, id.to_uppercase(), price), ev, 0.0)
        }))
        .unwrap()
    }

    #[test]
    fn picks_the_best_affordable_pair() {
        let scored = scored(&[
            ("a", 3_000, 100.0),
            ("b", 3_000, 90.0),
            ("c", 1_000, 80.0),
        ]);
        let constraints = ConstraintSet::new(2, 4_500);
        let outcome = RosterSolver::new(TimeBudget::seconds(5))
            .solve(&scored, &RaceCalendar::default(), &constraints)
            .unwrap();
        // a+b busts the cap; a+c is the best feasible pair.
        let SolveOutcome::Optimal { roster, objective } = outcome else {
            panic!("expected optimal");
        };
        assert_eq!(objective, 180.0);
        assert!(roster.contains(&"a".into()));
        assert!(roster.contains(&"c".into()));
    }

    #[test]
    fn zero_budget_times_out_without_an_answer() {
        let scored = scored(&[("a", 1_000, 10.0)]);
        let constraints = ConstraintSet::new(1, 2_000);
        let outcome = RosterSolver::new(TimeBudget::millis(0))
            .solve(&scored, &RaceCalendar::default(), &constraints)
            .unwrap();
        assert_eq!(outcome, SolveOutcome::TimedOut { best: None });
    }
}
