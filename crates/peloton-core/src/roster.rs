//! Rosters: the solver's output.
//!
//! A roster is produced atomically by one solve call. In transfer
//! mode it is three disjoint role sets; the lineup actually on the
//! road differs before and after the transfer point.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::race::RacePhase;
use crate::rider::RiderId;

/// The role a selected rider holds for the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterRole {
    /// Present the whole horizon.
    Base,
    /// Sold at the transfer point.
    EarlyOnly,
    /// Bought in at the transfer point.
    LateOnly,
}

impl fmt::Display for RosterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterRole::Base => write!(f, "base"),
            RosterRole::EarlyOnly => write!(f, "early-only"),
            RosterRole::LateOnly => write!(f, "late-only"),
        }
    }
}

/// A selected team.
///
/// Role exclusivity is structural: a rider id lives in exactly one of
/// the three transfer sets, never two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Roster {
    /// One roster for the whole horizon.
    Single(BTreeSet<RiderId>),
    /// Three interlocking role sets around the transfer window.
    Transfer {
        base: BTreeSet<RiderId>,
        early_only: BTreeSet<RiderId>,
        late_only: BTreeSet<RiderId>,
    },
}

impl Roster {
    /// Total number of selected riders across all roles.
    pub fn len(&self) -> usize {
        match self {
            Roster::Single(riders) => riders.len(),
            Roster::Transfer {
                base,
                early_only,
                late_only,
            } => base.len() + early_only.len() + late_only.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &RiderId) -> bool {
        self.role_of(id).is_some()
    }

    /// The role a rider holds, if selected.
    pub fn role_of(&self, id: &RiderId) -> Option<RosterRole> {
        match self {
            Roster::Single(riders) => riders.contains(id).then_some(RosterRole::Base),
            Roster::Transfer {
                base,
                early_only,
                late_only,
            } => {
                if base.contains(id) {
                    Some(RosterRole::Base)
                } else if early_only.contains(id) {
                    Some(RosterRole::EarlyOnly)
                } else if late_only.contains(id) {
                    Some(RosterRole::LateOnly)
                } else {
                    None
                }
            }
        }
    }

    /// The lineup on the road before the transfer point.
    pub fn starting_lineup(&self) -> BTreeSet<RiderId> {
        match self {
            Roster::Single(riders) => riders.clone(),
            Roster::Transfer {
                base, early_only, ..
            } => base.union(early_only).cloned().collect(),
        }
    }

    /// The lineup on the road after the transfer point.
    pub fn post_transfer_lineup(&self) -> BTreeSet<RiderId> {
        match self {
            Roster::Single(riders) => riders.clone(),
            Roster::Transfer {
                base, late_only, ..
            } => base.union(late_only).cloned().collect(),
        }
    }

    /// The lineup active for races in the given phase.
    pub fn lineup_for(&self, phase: RacePhase) -> BTreeSet<RiderId> {
        match phase {
            RacePhase::Early => self.starting_lineup(),
            RacePhase::Late => self.post_transfer_lineup(),
        }
    }

    /// Every selected rider, whatever the role.
    pub fn all_riders(&self) -> BTreeSet<RiderId> {
        match self {
            Roster::Single(riders) => riders.clone(),
            Roster::Transfer {
                base,
                early_only,
                late_only,
            } => base
                .iter()
                .chain(early_only)
                .chain(late_only)
                .cloned()
                .collect(),
        }
    }
}

/// Who left and who joined between two rosters.
///
/// The incremental re-solve workflow reports this back so the caller
/// can render "transfer confirmed" feedback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterDiff {
    pub removed: Vec<RiderId>,
    pub added: Vec<RiderId>,
}

impl RosterDiff {
    pub fn between(old: &Roster, new: &Roster) -> Self {
        let before = old.all_riders();
        let after = new.all_riders();
        RosterDiff {
            removed: before.difference(&after).cloned().collect(),
            added: after.difference(&before).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}
