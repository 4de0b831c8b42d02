//! Races, phases, and the season calendar.
//!
//! Each race carries the skill category that decides its ranking
//! (`primary_skill`), set once by configuration. Adding a race or
//! reweighting a skill never touches scoring or solver code.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DataQualityError;

/// Stable race identity (e.g. `RVV`, `PR`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaceId(String);

impl RaceId {
    pub fn new(id: impl Into<String>) -> Self {
        RaceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RaceId {
    fn from(s: &str) -> Self {
        RaceId::new(s)
    }
}

/// Skill-category identity (e.g. `cobbles`, `sprint`, `overall`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        SkillId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        SkillId::new(s)
    }
}

/// Which side of the transfer window a race falls on.
///
/// Irrelevant in single-phase mode, where the whole calendar is in
/// scope of the one roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RacePhase {
    Early,
    Late,
}

impl fmt::Display for RacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RacePhase::Early => write!(f, "early"),
            RacePhase::Late => write!(f, "late"),
        }
    }
}

/// One race on the calendar.
///
/// # Example
///
/// ```
/// use peloton_core::{RaceDefinition, RacePhase};
///
/// let ronde = RaceDefinition::new("RVV", RacePhase::Early, "cobbles");
/// assert_eq!(ronde.primary_skill().as_str(), "cobbles");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDefinition {
    id: RaceId,
    phase: RacePhase,
    primary_skill: SkillId,
}

impl RaceDefinition {
    pub fn new(
        id: impl Into<RaceId>,
        phase: RacePhase,
        primary_skill: impl Into<SkillId>,
    ) -> Self {
        RaceDefinition {
            id: id.into(),
            phase,
            primary_skill: primary_skill.into(),
        }
    }

    pub fn id(&self) -> &RaceId {
        &self.id
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn primary_skill(&self) -> &SkillId {
        &self.primary_skill
    }
}

/// The season calendar: every race in scope, each in exactly one phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RaceCalendar {
    races: Vec<RaceDefinition>,
}

impl RaceCalendar {
    /// Builds a calendar, rejecting duplicate race ids.
    pub fn new(
        races: impl IntoIterator<Item = RaceDefinition>,
    ) -> Result<Self, DataQualityError> {
        let mut calendar = RaceCalendar { races: Vec::new() };
        for race in races {
            if calendar.contains(race.id()) {
                return Err(DataQualityError::DuplicateRace(race.id().clone()));
            }
            calendar.races.push(race);
        }
        Ok(calendar)
    }

    pub fn get(&self, id: &RaceId) -> Option<&RaceDefinition> {
        self.races.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &RaceId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RaceDefinition> {
        self.races.iter()
    }

    pub fn len(&self) -> usize {
        self.races.len()
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }

    /// Races on the given side of the transfer window.
    pub fn in_phase(&self, phase: RacePhase) -> impl Iterator<Item = &RaceDefinition> {
        self.races.iter().filter(move |r| r.phase() == phase)
    }

    /// Every skill category some race ranks on.
    pub fn primary_skills(&self) -> BTreeSet<SkillId> {
        self.races
            .iter()
            .map(|r| r.primary_skill().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring_calendar() -> RaceCalendar {
        RaceCalendar::new([
            RaceDefinition::new("E3", RacePhase::Early, "cobbles"),
            RaceDefinition::new("RVV", RacePhase::Early, "cobbles"),
            RaceDefinition::new("PR", RacePhase::Early, "cobbles"),
            RaceDefinition::new("AGR", RacePhase::Late, "hills"),
            RaceDefinition::new("LBL", RacePhase::Late, "hills"),
        ])
        .unwrap()
    }

    #[test]
    fn phases_partition_the_calendar() {
        let calendar = spring_calendar();
        assert_eq!(calendar.in_phase(RacePhase::Early).count(), 3);
        assert_eq!(calendar.in_phase(RacePhase::Late).count(), 2);
        assert_eq!(calendar.len(), 5);
    }

    #[test]
    fn duplicate_race_is_rejected() {
        let result = RaceCalendar::new([
            RaceDefinition::new("RVV", RacePhase::Early, "cobbles"),
            RaceDefinition::new("RVV", RacePhase::Early, "cobbles"),
        ]);
        assert_eq!(
            result,
            Err(DataQualityError::DuplicateRace(RaceId::new("RVV")))
        );
    }

    #[test]
    fn primary_skills_deduplicate() {
        let skills = spring_calendar().primary_skills();
        assert_eq!(skills.len(), 2);
        assert!(skills.contains(&SkillId::new("cobbles")));
        assert!(skills.contains(&SkillId::new("hills")));
    }
}
