//! The binary selection model.
//!
//! One model serves both solve modes. Each candidate rider carries a
//! value and a price per role (base / early-only / late-only); the
//! single-phase request is the degenerate case with every slot in the
//! base role and the whole calendar in the starting window.
//!
//! Building the model runs every pre-solve check: structural
//! constraint validation, unknown ids, must-include lists that cannot
//! fit the budget, and catalog-level coverage shortfalls. Anything
//! the search could only discover by exhausting the tree is caught
//! here with an explicit reason instead.

use std::collections::BTreeSet;

use peloton_core::{
    ConstraintConflictError, ConstraintSet, RaceCalendar, RaceId, RacePhase, RiderId,
    SelectionError,
};
use peloton_scoring::ScoredCatalog;

/// Internal role index: base, early-only, late-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Base = 0,
    EarlyOnly = 1,
    LateOnly = 2,
}

impl Role {
    pub(crate) const ALL: [Role; 3] = [Role::Base, Role::EarlyOnly, Role::LateOnly];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// One race's minimum-starters requirement within a window.
#[derive(Debug, Clone)]
pub(crate) struct CoverageRow {
    pub race: RaceId,
    pub min: usize,
}

/// One selectable rider.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub id: RiderId,
    pub price: u64,
    /// Objective contribution per role.
    pub value: [f64; 3],
    /// Roles this rider may take (pins and slot counts applied).
    pub allowed: [bool; 3],
    /// Must take some role (must-include or frozen).
    pub required: bool,
    /// Indices into the early coverage rows this rider can cover.
    pub early_starts: Vec<usize>,
    /// Indices into the late coverage rows this rider can cover.
    pub late_starts: Vec<usize>,
}

impl Candidate {
    /// Best objective contribution over the allowed roles.
    pub(crate) fn max_value(&self) -> f64 {
        Role::ALL
            .iter()
            .filter(|r| self.allowed[r.index()])
            .map(|r| self.value[r.index()])
            .fold(0.0, f64::max)
    }

    /// Whether some allowed role puts this rider in the starting window.
    pub(crate) fn can_start_early(&self) -> bool {
        self.allowed[Role::Base.index()] || self.allowed[Role::EarlyOnly.index()]
    }

    /// Whether some allowed role puts this rider in the post-transfer window.
    pub(crate) fn can_start_late(&self) -> bool {
        self.allowed[Role::Base.index()] || self.allowed[Role::LateOnly.index()]
    }
}

/// The assembled model, ready for the branch-and-bound search.
#[derive(Debug, Clone)]
pub(crate) struct SelectionModel {
    /// Candidates sorted by best role value, descending (ties by id).
    pub candidates: Vec<Candidate>,
    pub early_races: Vec<CoverageRow>,
    pub late_races: Vec<CoverageRow>,
    /// Exact slot counts per role.
    pub role_slots: [usize; 3],
    pub budget_max: u64,
    /// Lower bound on the starting-window spend.
    pub budget_min: u64,
    pub transfer: bool,
}

/// Model assembly either yields a searchable model or proves the
/// request infeasible outright.
#[derive(Debug)]
pub(crate) enum ModelBuild {
    Ready(SelectionModel),
    Infeasible(String),
}

impl SelectionModel {
    pub(crate) fn build(
        scored: &ScoredCatalog,
        calendar: &RaceCalendar,
        constraints: &ConstraintSet,
    ) -> Result<ModelBuild, SelectionError> {
        constraints.validate()?;
        check_known_ids(scored, constraints)?;

        let role_slots = match &constraints.transfer {
            Some(t) => [
                t.phase_split.base,
                t.phase_split.early_only,
                t.phase_split.late_only,
            ],
            None => [constraints.roster_size, 0, 0],
        };
        let transfer = constraints.transfer.is_some();

        // Coverage rows: in transfer mode each phase is its own
        // window; in single-phase mode every race counts against the
        // one selected set.
        let min = constraints.min_starters_per_race;
        let (early_races, late_races) = if transfer {
            (
                coverage_rows(calendar, RacePhase::Early, min),
                coverage_rows(calendar, RacePhase::Late, min),
            )
        } else {
            let all = calendar
                .iter()
                .map(|race| CoverageRow {
                    race: race.id().clone(),
                    min,
                })
                .collect();
            (all, Vec::new())
        };

        let mut candidates = Vec::new();
        for rider in scored.iter() {
            if constraints.must_exclude.contains(rider.id()) {
                continue;
            }

            let mut allowed = if transfer {
                [true, true, true]
            } else {
                [true, false, false]
            };
            let mut required = constraints.must_include.contains(rider.id());
            if let Some(t) = &constraints.transfer {
                let pin = if t.frozen_base.contains(rider.id()) {
                    Some(Role::Base)
                } else if t.frozen_early_only.contains(rider.id()) {
                    Some(Role::EarlyOnly)
                } else if t.frozen_late_only.contains(rider.id()) {
                    Some(Role::LateOnly)
                } else {
                    None
                };
                if let Some(role) = pin {
                    allowed = [false, false, false];
                    allowed[role.index()] = true;
                    required = true;
                }
            }
            for role in Role::ALL {
                if role_slots[role.index()] == 0 {
                    allowed[role.index()] = false;
                }
            }

            let mut candidate = Candidate {
                id: rider.id().clone(),
                price: rider.price(),
                value: [rider.ev_total(), rider.ev_early(), rider.ev_late()],
                allowed,
                required,
                early_starts: Vec::new(),
                late_starts: Vec::new(),
            };
            if candidate.can_start_early() {
                candidate.early_starts = start_indices(scored, &candidate.id, &early_races);
            }
            if candidate.can_start_late() {
                candidate.late_starts = start_indices(scored, &candidate.id, &late_races);
            }
            candidates.push(candidate);
        }

        let total_slots: usize = role_slots.iter().sum();
        if candidates.len() < total_slots {
            return Ok(ModelBuild::Infeasible(format!(
                "only {} eligible riders for {} roster slots",
                candidates.len(),
                total_slots
            )));
        }

        if let Some(reason) = include_over_budget(&candidates, constraints) {
            return Err(SelectionError::ConstraintConflict(reason));
        }

        // A race the catalog itself cannot cover is infeasible no
        // matter the budget.
        for (rows, is_early, window) in [
            (&early_races, true, "starting"),
            (&late_races, false, "post-transfer"),
        ] {
            for (i, row) in rows.iter().enumerate() {
                let potential = candidates
                    .iter()
                    .filter(|c| {
                        if is_early {
                            c.early_starts.contains(&i)
                        } else {
                            c.late_starts.contains(&i)
                        }
                    })
                    .count();
                if potential < row.min {
                    return Ok(ModelBuild::Infeasible(format!(
                        "race {} has {} potential starters in the {} window, {} required",
                        row.race, potential, window, row.min
                    )));
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.max_value()
                .partial_cmp(&a.max_value())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(ModelBuild::Ready(SelectionModel {
            candidates,
            early_races,
            late_races,
            role_slots,
            budget_max: constraints.budget_max,
            budget_min: constraints.budget_min,
            transfer,
        }))
    }
}

fn coverage_rows(calendar: &RaceCalendar, phase: RacePhase, min: usize) -> Vec<CoverageRow> {
    calendar
        .in_phase(phase)
        .map(|race| CoverageRow {
            race: race.id().clone(),
            min,
        })
        .collect()
}

fn start_indices(scored: &ScoredCatalog, id: &RiderId, rows: &[CoverageRow]) -> Vec<usize> {
    let Some(rider) = scored.get(id) else {
        return Vec::new();
    };
    rows.iter()
        .enumerate()
        .filter(|(_, row)| rider.rider().starts(&row.race))
        .map(|(i, _)| i)
        .collect()
}

fn check_known_ids(
    scored: &ScoredCatalog,
    constraints: &ConstraintSet,
) -> Result<(), SelectionError> {
    let mut referenced: BTreeSet<&RiderId> = BTreeSet::new();
    referenced.extend(&constraints.must_include);
    referenced.extend(&constraints.must_exclude);
    if let Some(t) = &constraints.transfer {
        referenced.extend(t.frozen());
    }
    for id in referenced {
        if !scored.contains(id) {
            return Err(SelectionError::ConstraintConflict(
                ConstraintConflictError::UnknownRider(id.clone()),
            ));
        }
    }
    Ok(())
}

/// Forced picks that certainly blow the starting-window budget.
///
/// Single-phase: the whole must-include list counts. Transfer mode:
/// only riders certain to sit in the starting window (frozen base or
/// early-only) can be summed without guessing roles.
fn include_over_budget(
    candidates: &[Candidate],
    constraints: &ConstraintSet,
) -> Option<ConstraintConflictError> {
    let certain_cost: u64 = candidates
        .iter()
        .filter(|c| {
            if constraints.transfer.is_some() {
                c.required && !c.allowed[Role::LateOnly.index()]
            } else {
                c.required
            }
        })
        .map(|c| c.price)
        .sum();
    (certain_cost > constraints.budget_max).then_some(ConstraintConflictError::IncludeOverBudget {
        cost: certain_cost,
        budget_max: constraints.budget_max,
    })
}
