//! The score engine: EV computation per rider, per race, per phase.
//!
//! Pure function of (catalog, calendar, policy). Races are scored
//! independently and in parallel; a race with zero starters
//! contributes nothing and raises nothing. A rider starting no race
//! at all ends up with an EV of exactly zero, never a missing value,
//! so the solver's objective stays well-defined for every rider.

use std::collections::BTreeMap;

use rayon::prelude::*;

use peloton_core::{
    DataQualityError, RaceCalendar, RaceDefinition, RaceId, RacePhase, Rider, RiderCatalog,
    RiderId, SkillId,
};

use crate::policy::{ScoringPolicy, LEADERSHIP_MULTIPLIERS};

/// A rider with derived EV fields attached.
///
/// Derived purely from the rider, the calendar, and the chosen
/// policy; recomputed whenever the policy changes. The rider itself
/// stays the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRider {
    rider: Rider,
    ev_by_race: BTreeMap<RaceId, f64>,
    ev_early: f64,
    ev_late: f64,
}

impl ScoredRider {
    /// Wraps a rider with externally computed EV figures.
    ///
    /// For callers that bring their own projections instead of one of
    /// the built-in policies. Per-race EVs are left empty; phase and
    /// total sums come from the arguments.
    pub fn with_projection(rider: Rider, ev_early: f64, ev_late: f64) -> Self {
        ScoredRider {
            rider,
            ev_by_race: BTreeMap::new(),
            ev_early,
            ev_late,
        }
    }

    pub fn rider(&self) -> &Rider {
        &self.rider
    }

    pub fn id(&self) -> &RiderId {
        self.rider.id()
    }

    pub fn price(&self) -> u64 {
        self.rider.price()
    }

    /// EV for one race. A race the rider does not start yields 0.
    pub fn ev_for(&self, race: &RaceId) -> f64 {
        self.ev_by_race.get(race).copied().unwrap_or(0.0)
    }

    /// Sum over early-phase races.
    pub fn ev_early(&self) -> f64 {
        self.ev_early
    }

    /// Sum over late-phase races.
    pub fn ev_late(&self) -> f64 {
        self.ev_late
    }

    /// Sum over the whole calendar.
    pub fn ev_total(&self) -> f64 {
        self.ev_early + self.ev_late
    }

    /// Value for money: EV per million of price.
    pub fn value_per_million(&self) -> f64 {
        self.ev_total() / (self.rider.price() as f64 / 1_000_000.0)
    }
}

/// Every rider of the catalog, scored.
#[derive(Debug, Clone, Default)]
pub struct ScoredCatalog {
    riders: Vec<ScoredRider>,
    index: BTreeMap<RiderId, usize>,
}

impl ScoredCatalog {
    /// Builds a scored catalog from already-scored riders, rejecting
    /// duplicate ids.
    pub fn from_riders(
        riders: impl IntoIterator<Item = ScoredRider>,
    ) -> Result<Self, DataQualityError> {
        let mut catalog = ScoredCatalog::default();
        for scored in riders {
            if catalog.index.contains_key(scored.id()) {
                return Err(DataQualityError::DuplicateRider(scored.id().clone()));
            }
            catalog.index.insert(scored.id().clone(), catalog.riders.len());
            catalog.riders.push(scored);
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &RiderId) -> Option<&ScoredRider> {
        self.index.get(id).map(|&i| &self.riders[i])
    }

    pub fn contains(&self, id: &RiderId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredRider> {
        self.riders.iter()
    }

    pub fn len(&self) -> usize {
        self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }
}

/// Computes EV for every rider under one scoring policy.
///
/// # Example
///
/// ```
/// use peloton_core::{RaceCalendar, RaceDefinition, RacePhase, Rider, RiderCatalog};
/// use peloton_scoring::{ScoreEngine, ScoringPolicy};
///
/// let catalog = RiderCatalog::from_riders([
///     Rider::new("a", "A", 2_000_000)
///         .with_skill("cobbles", 90)
///         .with_skill("overall", 85)
///         .with_start("RVV"),
/// ])
/// .unwrap();
/// let calendar = RaceCalendar::new([
///     RaceDefinition::new("RVV", RacePhase::Early, "cobbles"),
/// ])
/// .unwrap();
///
/// let scored = ScoreEngine::new(ScoringPolicy::rank_table())
///     .score(&catalog, &calendar)
///     .unwrap();
/// // Sole starter: first-place payout times the x3 leadership bonus.
/// assert_eq!(scored.get(&"a".into()).unwrap().ev_total(), 300.0);
/// ```
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    policy: ScoringPolicy,
    tiebreak: SkillId,
}

impl ScoreEngine {
    /// Engine with the given policy and the default `overall`
    /// tiebreak skill.
    pub fn new(policy: ScoringPolicy) -> Self {
        ScoreEngine {
            policy,
            tiebreak: SkillId::new("overall"),
        }
    }

    /// Overrides the secondary sort skill used to break primary-skill
    /// ties within a race.
    pub fn with_tiebreak(mut self, skill: impl Into<SkillId>) -> Self {
        self.tiebreak = skill.into();
        self
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Scores the whole catalog against the calendar.
    ///
    /// Validates data quality first (skill ranges, unknown races,
    /// missing ratings); a violation stops the computation before any
    /// EV is produced.
    pub fn score(
        &self,
        catalog: &RiderCatalog,
        calendar: &RaceCalendar,
    ) -> Result<ScoredCatalog, DataQualityError> {
        catalog.validate(calendar)?;
        for rider in catalog.iter() {
            if rider.skill(&self.tiebreak).is_none() {
                return Err(DataQualityError::MissingSkill {
                    rider: rider.id().clone(),
                    skill: self.tiebreak.clone(),
                });
            }
        }

        let riders: Vec<&Rider> = catalog.iter().collect();
        let races: Vec<&RaceDefinition> = calendar.iter().collect();

        // Races are independent: score them in parallel, merge after.
        let per_race: Vec<(RacePhase, RaceId, Vec<f64>)> = races
            .par_iter()
            .map(|&race| {
                (
                    race.phase(),
                    race.id().clone(),
                    self.race_values(&riders, race),
                )
            })
            .collect();

        let mut scored: Vec<ScoredRider> = riders
            .iter()
            .map(|&rider| ScoredRider {
                rider: rider.clone(),
                ev_by_race: BTreeMap::new(),
                ev_early: 0.0,
                ev_late: 0.0,
            })
            .collect();

        for (phase, race_id, values) in per_race {
            for (i, value) in values.into_iter().enumerate() {
                if !scored[i].rider.starts(&race_id) {
                    continue;
                }
                scored[i].ev_by_race.insert(race_id.clone(), value);
                match phase {
                    RacePhase::Early => scored[i].ev_early += value,
                    RacePhase::Late => scored[i].ev_late += value,
                }
            }
        }

        let index = scored
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id().clone(), i))
            .collect();
        Ok(ScoredCatalog {
            riders: scored,
            index,
        })
    }

    /// Per-rider values for one race, aligned with the rider slice.
    ///
    /// Starters are ranked by primary skill, then tiebreak skill,
    /// then id; the top three ranked starters carry the leadership
    /// multiplier.
    fn race_values(&self, riders: &[&Rider], race: &RaceDefinition) -> Vec<f64> {
        let primary = race.primary_skill();
        let mut starters: Vec<usize> = (0..riders.len())
            .filter(|&i| riders[i].starts(race.id()))
            .collect();
        starters.sort_by(|&a, &b| {
            let (ra, rb) = (riders[a], riders[b]);
            rb.skill(primary)
                .cmp(&ra.skill(primary))
                .then(rb.skill(&self.tiebreak).cmp(&ra.skill(&self.tiebreak)))
                .then(ra.id().cmp(rb.id()))
        });

        let mut values = vec![0.0; riders.len()];
        for (rank, &i) in starters.iter().enumerate() {
            let skill = riders[i].skill(primary).unwrap_or(0);
            let mut value = self.policy.raw_value(rank, skill);
            if let Some(&bonus) = LEADERSHIP_MULTIPLIERS.get(rank) {
                value *= bonus;
            }
            values[i] = value;
        }
        values
    }
}
