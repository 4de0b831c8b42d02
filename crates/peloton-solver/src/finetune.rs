//! Incremental re-solve ("finetune").
//!
//! Not a separate algorithm: the previous roster plus the caller's
//! edits become a new constraint set (kept riders frozen into their
//! roles, removed riders excluded, requested picks forced), and the
//! same solver runs again. The primary workflow is iterative
//! refinement, so the diff between old and new roster is part of the
//! result.

use std::collections::BTreeSet;

use peloton_core::{
    ConstraintSet, RaceCalendar, RiderId, Roster, RosterDiff, RosterRole, SelectionError,
    SolveOutcome,
};
use peloton_scoring::ScoredCatalog;

use crate::solve::RosterSolver;

/// One round of roster edits.
///
/// Role forces apply in transfer mode; in single-phase mode a forced
/// role simply means "must be in the team", since a single roster has
/// only the one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinetuneRequest {
    pub remove: BTreeSet<RiderId>,
    pub add: BTreeSet<RiderId>,
    pub force_base: BTreeSet<RiderId>,
    pub force_early_only: BTreeSet<RiderId>,
    pub force_late_only: BTreeSet<RiderId>,
    /// Pin every kept rider to its current role. Unset, kept riders
    /// stay in the team but may change roles.
    pub freeze_kept: bool,
}

impl Default for FinetuneRequest {
    fn default() -> Self {
        FinetuneRequest {
            remove: BTreeSet::new(),
            add: BTreeSet::new(),
            force_base: BTreeSet::new(),
            force_early_only: BTreeSet::new(),
            force_late_only: BTreeSet::new(),
            freeze_kept: true,
        }
    }
}

impl FinetuneRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove<I, R>(mut self, riders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RiderId>,
    {
        self.remove.extend(riders.into_iter().map(Into::into));
        self
    }

    pub fn with_add<I, R>(mut self, riders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RiderId>,
    {
        self.add.extend(riders.into_iter().map(Into::into));
        self
    }

    pub fn with_force_base<I, R>(mut self, riders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RiderId>,
    {
        self.force_base.extend(riders.into_iter().map(Into::into));
        self
    }

    pub fn with_force_early_only<I, R>(mut self, riders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RiderId>,
    {
        self.force_early_only
            .extend(riders.into_iter().map(Into::into));
        self
    }

    pub fn with_force_late_only<I, R>(mut self, riders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RiderId>,
    {
        self.force_late_only
            .extend(riders.into_iter().map(Into::into));
        self
    }

    pub fn with_freeze_kept(mut self, freeze: bool) -> Self {
        self.freeze_kept = freeze;
        self
    }
}

/// Outcome of a finetune round. The diff is present whenever the
/// solve produced a roster (optimal, or the unproven best on
/// timeout).
#[derive(Debug, Clone, PartialEq)]
pub struct FinetuneOutcome {
    pub outcome: SolveOutcome,
    pub diff: Option<RosterDiff>,
}

/// Re-solves around an accepted roster.
///
/// `constraints` is the baseline request the previous roster was
/// solved under; the returned outcome honors it plus the edits.
pub fn finetune(
    solver: &RosterSolver,
    scored: &ScoredCatalog,
    calendar: &RaceCalendar,
    constraints: &ConstraintSet,
    previous: &Roster,
    request: &FinetuneRequest,
) -> Result<FinetuneOutcome, SelectionError> {
    let adjusted = adjusted_constraints(constraints, previous, request);
    let outcome = solver.solve(scored, calendar, &adjusted)?;
    let diff = outcome
        .roster()
        .map(|roster| RosterDiff::between(previous, roster));
    Ok(FinetuneOutcome { outcome, diff })
}

fn adjusted_constraints(
    constraints: &ConstraintSet,
    previous: &Roster,
    request: &FinetuneRequest,
) -> ConstraintSet {
    let mut adjusted = constraints.clone();
    adjusted.must_exclude.extend(request.remove.iter().cloned());

    let kept: BTreeSet<RiderId> = previous
        .all_riders()
        .difference(&request.remove)
        .cloned()
        .collect();
    let members: BTreeSet<RiderId> = kept.union(&request.add).cloned().collect();

    for id in members {
        let forced = if request.force_base.contains(&id) {
            Some(RosterRole::Base)
        } else if request.force_early_only.contains(&id) {
            Some(RosterRole::EarlyOnly)
        } else if request.force_late_only.contains(&id) {
            Some(RosterRole::LateOnly)
        } else if request.freeze_kept {
            previous.role_of(&id)
        } else {
            None
        };
        match (forced, adjusted.transfer.as_mut()) {
            (Some(role), Some(rules)) => {
                let frozen = match role {
                    RosterRole::Base => &mut rules.frozen_base,
                    RosterRole::EarlyOnly => &mut rules.frozen_early_only,
                    RosterRole::LateOnly => &mut rules.frozen_late_only,
                };
                frozen.insert(id);
            }
            // Single-phase rosters have only the one role; any pin
            // collapses to team membership.
            _ => {
                adjusted.must_include.insert(id);
            }
        }
    }
    adjusted
}
