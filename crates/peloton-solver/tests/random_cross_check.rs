//! Randomized cross-check: the branch-and-bound must agree with
//! brute-force enumeration on every instance a seeded generator
//! produces.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use peloton_core::{
    ConstraintSet, RaceCalendar, RaceDefinition, RacePhase, Rider, SolveOutcome,
};
use peloton_scoring::{ScoredCatalog, ScoredRider};
use peloton_solver::{RosterSolver, TimeBudget};

const RIDERS: usize = 10;
const ROSTER: usize = 4;

struct Instance {
    prices: Vec<u64>,
    evs: Vec<f64>,
    // starts[i][r]: rider i starts race r.
    starts: Vec<[bool; 2]>,
    constraints: ConstraintSet,
}

fn random_instance(seed: u64) -> Instance {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let prices: Vec<u64> = (0..RIDERS).map(|_| rng.random_range(1..=10)).collect();
    let evs: Vec<f64> = (0..RIDERS)
        .map(|_| f64::from(rng.random_range(0..=100u32)))
        .collect();
    let starts: Vec<[bool; 2]> = (0..RIDERS)
        .map(|_| [rng.random_bool(0.6), rng.random_bool(0.6)])
        .collect();
    let budget_max = rng.random_range(10..=25);
    let budget_min = rng.random_range(0..=budget_max / 2);
    let constraints = ConstraintSet::new(ROSTER, budget_max)
        .with_budget_min(budget_min)
        .with_min_starters_per_race(rng.random_range(0..=2));
    Instance {
        prices,
        evs,
        starts,
        constraints,
    }
}

fn scored(instance: &Instance) -> ScoredCatalog {
    ScoredCatalog::from_riders((0..RIDERS).map(|i| {
        let mut rider = Rider::new(format!("r{i}"), format!("R{i}"), instance.prices[i]);
        if instance.starts[i][0] {
            rider = rider.with_start("R1");
        }
        if instance.starts[i][1] {
            rider = rider.with_start("R2");
        }
        ScoredRider::with_projection(rider, instance.evs[i], 0.0)
    }))
    .unwrap()
}

fn brute_force(instance: &Instance) -> Option<f64> {
    let constraints = &instance.constraints;
    let mut best: Option<f64> = None;
    for mask in 0u32..(1 << RIDERS) {
        if mask.count_ones() as usize != ROSTER {
            continue;
        }
        let picked: Vec<usize> = (0..RIDERS).filter(|i| mask & (1 << i) != 0).collect();
        let spend: u64 = picked.iter().map(|&i| instance.prices[i]).sum();
        if spend > constraints.budget_max || spend < constraints.budget_min {
            continue;
        }
        let covered = (0..2).all(|r| {
            picked.iter().filter(|&&i| instance.starts[i][r]).count()
                >= constraints.min_starters_per_race
        });
        if !covered {
            continue;
        }
        let objective: f64 = picked.iter().map(|&i| instance.evs[i]).sum();
        best = Some(best.map_or(objective, |b: f64| b.max(objective)));
    }
    best
}

#[test]
fn solver_matches_brute_force_on_random_instances() {
    let calendar = RaceCalendar::new([
        RaceDefinition::new("R1", RacePhase::Early, "cobbles"),
        RaceDefinition::new("R2", RacePhase::Early, "hills"),
    ])
    .unwrap();
    let solver = RosterSolver::new(TimeBudget::seconds(10));

    for seed in 0..40 {
        let instance = random_instance(seed);
        let outcome = solver
            .solve(&scored(&instance), &calendar, &instance.constraints)
            .unwrap();
        let expected = brute_force(&instance);
        match (&outcome, expected) {
            (SolveOutcome::Optimal { objective, .. }, Some(best)) => {
                assert!(
                    (objective - best).abs() < 1e-9,
                    "seed {seed}: solver {objective} vs enumeration {best}"
                );
            }
            (SolveOutcome::Infeasible { .. }, None) => {}
            (outcome, expected) => {
                panic!("seed {seed}: solver {outcome:?} vs enumeration {expected:?}")
            }
        }
    }
}
