//! Advisor read projections.
//!
//! Pure reads over (roster, scored catalog, calendar): no new data
//! beyond what the solve already exposes. The calling layer renders
//! these; nothing here formats for humans.

use tracing::debug;

use peloton_core::{ConstraintSet, RaceCalendar, RaceId, RiderId, Roster};
use peloton_scoring::{ScoredCatalog, ScoredRider, ELITE_THRESHOLD};

/// A flagged weak spot in the roster's race program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Weakness {
    /// No selected rider is active at the start of this race.
    NoStarters,
    /// The best active starter rates below the elite threshold on the
    /// race's primary skill.
    NoEliteLeader { best: RiderId, rating: u8 },
}

/// Captain suggestions and start coverage for one race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceAdvice {
    pub race: RaceId,
    /// Top (at most three) active starters by the race's primary
    /// skill, best first.
    pub captains: Vec<RiderId>,
    /// Number of selected riders active at this race's start.
    pub starters: usize,
    pub weakness: Option<Weakness>,
}

/// Per-race captain suggestions over the phase-appropriate lineup.
pub fn captain_advice(
    roster: &Roster,
    scored: &ScoredCatalog,
    calendar: &RaceCalendar,
) -> Vec<RaceAdvice> {
    calendar
        .iter()
        .map(|race| {
            let lineup = roster.lineup_for(race.phase());
            let mut starters: Vec<&ScoredRider> = lineup
                .iter()
                .filter_map(|id| scored.get(id))
                .filter(|s| s.rider().starts(race.id()))
                .collect();
            let primary = race.primary_skill();
            starters.sort_by(|a, b| {
                b.rider()
                    .skill(primary)
                    .cmp(&a.rider().skill(primary))
                    .then(
                        b.ev_for(race.id())
                            .partial_cmp(&a.ev_for(race.id()))
                            .unwrap_or(std::cmp::Ordering::Equal),
                    )
                    .then(a.id().cmp(b.id()))
            });

            let weakness = match starters.first() {
                None => Some(Weakness::NoStarters),
                Some(best) => {
                    let rating = best.rider().skill(primary).unwrap_or(0);
                    (rating < ELITE_THRESHOLD).then(|| Weakness::NoEliteLeader {
                        best: best.id().clone(),
                        rating,
                    })
                }
            };
            if weakness.is_some() {
                debug!(event = "weak_race", race = %race.id());
            }

            RaceAdvice {
                race: race.id().clone(),
                captains: starters.iter().take(3).map(|s| s.id().clone()).collect(),
                starters: starters.len(),
                weakness,
            }
        })
        .collect()
}

/// Spend per window against the budget cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetReport {
    pub starting_spend: u64,
    pub post_transfer_spend: u64,
    pub budget_max: u64,
}

impl BudgetReport {
    pub fn starting_remaining(&self) -> u64 {
        self.budget_max.saturating_sub(self.starting_spend)
    }

    pub fn post_transfer_remaining(&self) -> u64 {
        self.budget_max.saturating_sub(self.post_transfer_spend)
    }
}

/// Sums roster prices per window.
pub fn budget_report(
    roster: &Roster,
    scored: &ScoredCatalog,
    constraints: &ConstraintSet,
) -> BudgetReport {
    let spend = |ids: &std::collections::BTreeSet<RiderId>| -> u64 {
        ids.iter()
            .filter_map(|id| scored.get(id))
            .map(|s| s.price())
            .sum()
    };
    BudgetReport {
        starting_spend: spend(&roster.starting_lineup()),
        post_transfer_spend: spend(&roster.post_transfer_lineup()),
        budget_max: constraints.budget_max,
    }
}
