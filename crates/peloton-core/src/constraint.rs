//! Declarative description of a selection request.
//!
//! A [`ConstraintSet`] is a value object, constructed fresh per solve
//! call; the solver holds nothing across calls. Structural conflicts
//! (overlapping include/exclude lists, a phase split that does not add
//! up) are caller errors caught here, before any search runs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConstraintConflictError;
use crate::rider::RiderId;

/// How the roster slots divide across transfer-window roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSplit {
    /// Riders kept the whole horizon.
    pub base: usize,
    /// Riders sold at the transfer point.
    pub early_only: usize,
    /// Riders bought in at the transfer point.
    pub late_only: usize,
}

impl PhaseSplit {
    pub fn new(base: usize, early_only: usize, late_only: usize) -> Self {
        PhaseSplit {
            base,
            early_only,
            late_only,
        }
    }

    pub fn total(&self) -> usize {
        self.base + self.early_only + self.late_only
    }
}

/// Transfer-window additions to a constraint set.
///
/// The frozen sets pin specific riders to a specific role before
/// solving; the incremental re-solve workflow uses them to keep most
/// of an accepted roster in place while replacing a few riders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRules {
    pub phase_split: PhaseSplit,
    pub frozen_base: BTreeSet<RiderId>,
    pub frozen_early_only: BTreeSet<RiderId>,
    pub frozen_late_only: BTreeSet<RiderId>,
}

impl TransferRules {
    pub fn new(phase_split: PhaseSplit) -> Self {
        TransferRules {
            phase_split,
            frozen_base: BTreeSet::new(),
            frozen_early_only: BTreeSet::new(),
            frozen_late_only: BTreeSet::new(),
        }
    }

    /// All frozen riders, over every role.
    pub fn frozen(&self) -> impl Iterator<Item = &RiderId> {
        self.frozen_base
            .iter()
            .chain(&self.frozen_early_only)
            .chain(&self.frozen_late_only)
    }
}

/// Budget bounds, roster size, coverage minimums, and forced picks.
///
/// # Example
///
/// ```
/// use peloton_core::ConstraintSet;
///
/// let constraints = ConstraintSet::new(20, 45_000_000)
///     .with_budget_min(43_000_000)
///     .with_min_starters_per_race(3)
///     .with_must_include(["t-pogacar"]);
/// assert!(constraints.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    pub roster_size: usize,
    pub budget_max: u64,
    pub budget_min: u64,
    pub min_starters_per_race: usize,
    pub must_include: BTreeSet<RiderId>,
    pub must_exclude: BTreeSet<RiderId>,
    /// `Some` switches the solve into transfer-window mode.
    pub transfer: Option<TransferRules>,
}

impl ConstraintSet {
    pub fn new(roster_size: usize, budget_max: u64) -> Self {
        ConstraintSet {
            roster_size,
            budget_max,
            budget_min: 0,
            min_starters_per_race: 0,
            must_include: BTreeSet::new(),
            must_exclude: BTreeSet::new(),
            transfer: None,
        }
    }

    pub fn with_budget_min(mut self, budget_min: u64) -> Self {
        self.budget_min = budget_min;
        self
    }

    pub fn with_min_starters_per_race(mut self, min: usize) -> Self {
        self.min_starters_per_race = min;
        self
    }

    pub fn with_must_include<I, R>(mut self, riders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RiderId>,
    {
        self.must_include.extend(riders.into_iter().map(Into::into));
        self
    }

    pub fn with_must_exclude<I, R>(mut self, riders: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RiderId>,
    {
        self.must_exclude.extend(riders.into_iter().map(Into::into));
        self
    }

    pub fn with_transfer(mut self, transfer: TransferRules) -> Self {
        self.transfer = Some(transfer);
        self
    }

    pub fn is_transfer(&self) -> bool {
        self.transfer.is_some()
    }

    /// Checks the structural invariants.
    ///
    /// Catalog-dependent conflicts (a must-include list that alone
    /// blows the budget, unknown rider ids) are caught by the solver
    /// once it can see prices; everything checkable from the request
    /// alone is checked here.
    pub fn validate(&self) -> Result<(), ConstraintConflictError> {
        if self.roster_size == 0 {
            return Err(ConstraintConflictError::EmptyRoster);
        }
        if self.budget_min > self.budget_max {
            return Err(ConstraintConflictError::BudgetBandInverted {
                min: self.budget_min,
                max: self.budget_max,
            });
        }
        if let Some(id) = self.must_include.intersection(&self.must_exclude).next() {
            return Err(ConstraintConflictError::IncludeExcludeOverlap(id.clone()));
        }
        if self.must_include.len() > self.roster_size {
            return Err(ConstraintConflictError::IncludeOverSize {
                count: self.must_include.len(),
                roster_size: self.roster_size,
            });
        }
        if let Some(transfer) = &self.transfer {
            self.validate_transfer(transfer)?;
        }
        Ok(())
    }

    fn validate_transfer(
        &self,
        transfer: &TransferRules,
    ) -> Result<(), ConstraintConflictError> {
        let split = transfer.phase_split;
        if split.total() != self.roster_size {
            return Err(ConstraintConflictError::PhaseSplitMismatch {
                base: split.base,
                early_only: split.early_only,
                late_only: split.late_only,
                roster_size: self.roster_size,
            });
        }
        let roles = [
            ("base", &transfer.frozen_base, split.base),
            ("early-only", &transfer.frozen_early_only, split.early_only),
            ("late-only", &transfer.frozen_late_only, split.late_only),
        ];
        for (i, (_, frozen, _)) in roles.iter().enumerate() {
            for (_, other, _) in &roles[i + 1..] {
                if let Some(id) = frozen.intersection(other).next() {
                    return Err(ConstraintConflictError::FrozenRoleOverlap(id.clone()));
                }
            }
        }
        for (role, frozen, limit) in roles {
            if let Some(id) = frozen.intersection(&self.must_exclude).next() {
                return Err(ConstraintConflictError::FrozenExcluded(id.clone()));
            }
            if frozen.len() > limit {
                return Err(ConstraintConflictError::FrozenOverSplit {
                    role,
                    count: frozen.len(),
                    limit,
                });
            }
        }
        Ok(())
    }
}
