//! Riders and the reconciled rider catalog.
//!
//! The catalog is produced by the (out-of-scope) ingestion and
//! reconciliation layer: exactly one row per real-world competitor,
//! keyed by a stable id. The optimizer consumes it read-only.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DataQualityError;
use crate::race::{RaceCalendar, RaceId, SkillId};

/// Stable rider identity.
///
/// Never the display name: names collide (two riders surnamed
/// "Pedersen" started the same spring classics), ids do not.
///
/// # Example
///
/// ```
/// use peloton_core::RiderId;
///
/// let a = RiderId::new("m-pedersen");
/// let b = RiderId::new("r-pedersen");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderId(String);

impl RiderId {
    pub fn new(id: impl Into<String>) -> Self {
        RiderId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RiderId {
    fn from(s: &str) -> Self {
        RiderId::new(s)
    }
}

impl From<String> for RiderId {
    fn from(s: String) -> Self {
        RiderId::new(s)
    }
}

/// One entry per distinct real-world competitor.
///
/// Immutable after construction; the optimizer never mutates riders,
/// it only reads them. Skill ratings live in 0..=100; a race absent
/// from the start list means the rider does not start it (never
/// null/undefined).
///
/// # Example
///
/// ```
/// use peloton_core::{RaceId, Rider};
///
/// let rider = Rider::new("t-pogacar", "Tadej Pogacar", 5_500_000)
///     .with_team("UAE")
///     .with_skill("cobbles", 88)
///     .with_skill("hills", 98)
///     .with_start("RVV");
///
/// assert!(rider.starts(&RaceId::new("RVV")));
/// assert!(!rider.starts(&RaceId::new("PR")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    id: RiderId,
    name: String,
    team: Option<String>,
    price: u64,
    skills: BTreeMap<SkillId, u8>,
    starts: BTreeSet<RaceId>,
}

impl Rider {
    pub fn new(id: impl Into<RiderId>, name: impl Into<String>, price: u64) -> Self {
        Rider {
            id: id.into(),
            name: name.into(),
            team: None,
            price,
            skills: BTreeMap::new(),
            starts: BTreeSet::new(),
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_skill(mut self, skill: impl Into<SkillId>, rating: u8) -> Self {
        self.skills.insert(skill.into(), rating);
        self
    }

    pub fn with_start(mut self, race: impl Into<RaceId>) -> Self {
        self.starts.insert(race.into());
        self
    }

    pub fn id(&self) -> &RiderId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// Price in the smallest currency unit, fixed for the horizon.
    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn skill(&self, skill: &SkillId) -> Option<u8> {
        self.skills.get(skill).copied()
    }

    pub fn skills(&self) -> &BTreeMap<SkillId, u8> {
        &self.skills
    }

    /// Whether this rider starts the given race. Absent means false.
    pub fn starts(&self, race: &RaceId) -> bool {
        self.starts.contains(race)
    }

    pub fn start_list(&self) -> &BTreeSet<RaceId> {
        &self.starts
    }
}

/// The reconciled table of riders, unique by id.
#[derive(Debug, Clone, Default)]
pub struct RiderCatalog {
    riders: Vec<Rider>,
    index: BTreeMap<RiderId, usize>,
}

impl RiderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from riders, rejecting duplicate ids.
    pub fn from_riders(
        riders: impl IntoIterator<Item = Rider>,
    ) -> Result<Self, DataQualityError> {
        let mut catalog = RiderCatalog::new();
        for rider in riders {
            catalog.push(rider)?;
        }
        Ok(catalog)
    }

    pub fn push(&mut self, rider: Rider) -> Result<(), DataQualityError> {
        if self.index.contains_key(rider.id()) {
            return Err(DataQualityError::DuplicateRider(rider.id().clone()));
        }
        self.index.insert(rider.id().clone(), self.riders.len());
        self.riders.push(rider);
        Ok(())
    }

    pub fn get(&self, id: &RiderId) -> Option<&Rider> {
        self.index.get(id).map(|&i| &self.riders[i])
    }

    pub fn contains(&self, id: &RiderId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rider> {
        self.riders.iter()
    }

    pub fn len(&self) -> usize {
        self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }

    /// Checks the data-quality invariants against a calendar.
    ///
    /// Every violation is bad upstream ingestion: zero prices, skill
    /// ratings outside 0..=100, start-list entries for unknown races,
    /// and missing ratings for any skill the calendar ranks on. The
    /// first violation found is returned; nothing is clamped or
    /// defaulted.
    pub fn validate(&self, calendar: &RaceCalendar) -> Result<(), DataQualityError> {
        let required = calendar.primary_skills();
        for rider in &self.riders {
            if rider.price() == 0 {
                return Err(DataQualityError::ZeroPrice(rider.id().clone()));
            }
            for (skill, &value) in rider.skills() {
                if value > 100 {
                    return Err(DataQualityError::SkillOutOfRange {
                        rider: rider.id().clone(),
                        skill: skill.clone(),
                        value,
                    });
                }
            }
            for race in rider.start_list() {
                if !calendar.contains(race) {
                    return Err(DataQualityError::UnknownRace {
                        rider: rider.id().clone(),
                        race: race.clone(),
                    });
                }
            }
            for skill in &required {
                if rider.skill(skill).is_none() {
                    return Err(DataQualityError::MissingSkill {
                        rider: rider.id().clone(),
                        skill: skill.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
