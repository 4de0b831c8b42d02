//! Single-phase solver properties and literal scenarios.

use peloton_core::{
    ConstraintSet, RaceCalendar, RaceDefinition, RacePhase, Rider, RiderId, SelectionError,
    SolveOutcome,
};
use peloton_scoring::{ScoredCatalog, ScoredRider};
use peloton_solver::{RosterSolver, TimeBudget};

fn solver() -> RosterSolver {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    RosterSolver::new(TimeBudget::seconds(10))
}

/// The five-rider pool used across the scenario tests: prices in
/// millions, EVs as given.
fn classic_pool() -> ScoredCatalog {
    let riders = [
        ("vdp", 6_000_000, 1000.0),
        ("pog", 5_500_000, 980.0),
        ("wva", 5_000_000, 950.0),
        ("gan", 4_500_000, 850.0),
        ("ped", 4_000_000, 800.0),
    ];
    ScoredCatalog::from_riders(riders.map(|(id, price, ev)| {
        ScoredRider::with_projection(Rider::new(id, id.to_uppercase(), price), ev, 0.0)
    }))
    .unwrap()
}

fn optimal(outcome: SolveOutcome) -> (peloton_core::Roster, f64) {
    match outcome {
        SolveOutcome::Optimal { roster, objective } => (roster, objective),
        other => panic!("expected optimal, got {other:?}"),
    }
}

#[test]
fn whole_pool_fits_a_generous_budget() {
    let constraints = ConstraintSet::new(5, 46_000_000);
    let outcome = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    let (roster, objective) = optimal(outcome);
    assert_eq!(roster.len(), 5);
    assert_eq!(objective, 4580.0);
}

#[test]
fn tight_budget_forces_the_best_tradeoff() {
    // At 16M the best trio is vdp + pog + gan, costing exactly the
    // cap (the budget bound is boundary-inclusive).
    let constraints = ConstraintSet::new(3, 16_000_000);
    let outcome = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    let (roster, objective) = optimal(outcome);
    assert_eq!(objective, 2830.0);
    assert!(roster.contains(&"vdp".into()));
    assert!(roster.contains(&"pog".into()));
    assert!(roster.contains(&"gan".into()));
}

#[test]
fn budget_window_is_boundary_inclusive() {
    // Both bounds binding at once: spend must equal exactly 10.5M.
    // Two pairs qualify; pog + wva has the higher EV.
    let constraints = ConstraintSet::new(2, 10_500_000).with_budget_min(10_500_000);
    let outcome = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    let (roster, objective) = optimal(outcome);
    assert_eq!(objective, 1930.0);
    assert!(roster.contains(&"pog".into()));
    assert!(roster.contains(&"wva".into()));
}

#[test]
fn unreachable_budget_floor_is_infeasible() {
    // The whole pool costs 25M; demanding 30M+ on a 40M cap can
    // never be met.
    let constraints = ConstraintSet::new(5, 40_000_000).with_budget_min(30_000_000);
    let outcome = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    assert!(outcome.is_infeasible());
}

#[test]
fn include_and_exclude_overlap_is_a_conflict_not_a_pick() {
    let constraints = ConstraintSet::new(3, 46_000_000)
        .with_must_include(["vdp"])
        .with_must_exclude(["vdp"]);
    let result = solver().solve(&classic_pool(), &RaceCalendar::default(), &constraints);
    assert!(matches!(
        result.unwrap_err(),
        SelectionError::ConstraintConflict(_)
    ));
}

#[test]
fn forced_picks_are_always_respected() {
    let constraints = ConstraintSet::new(3, 46_000_000)
        .with_must_include(["ped"])
        .with_must_exclude(["vdp"]);
    let outcome = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    let (roster, _) = optimal(outcome);
    assert!(roster.contains(&"ped".into()));
    assert!(!roster.contains(&"vdp".into()));
    assert_eq!(roster.len(), 3);
}

#[test]
fn catalog_coverage_shortfall_is_infeasible_regardless_of_budget() {
    // Only two riders start the race; three are demanded.
    let calendar = RaceCalendar::new([RaceDefinition::new(
        "RVV",
        RacePhase::Early,
        "cobbles",
    )])
    .unwrap();
    let scored = ScoredCatalog::from_riders([
        ScoredRider::with_projection(
            Rider::new("a", "A", 1_000).with_start("RVV"),
            100.0,
            0.0,
        ),
        ScoredRider::with_projection(
            Rider::new("b", "B", 1_000).with_start("RVV"),
            90.0,
            0.0,
        ),
        ScoredRider::with_projection(Rider::new("c", "C", 1_000), 80.0, 0.0),
        ScoredRider::with_projection(Rider::new("d", "D", 1_000), 70.0, 0.0),
    ])
    .unwrap();
    let constraints = ConstraintSet::new(4, u64::MAX).with_min_starters_per_race(3);
    let outcome = solver().solve(&scored, &calendar, &constraints).unwrap();
    assert!(outcome.is_infeasible());
}

#[test]
fn coverage_minimums_shape_the_selection() {
    // Two races; the high-EV riders all start only one of them. The
    // coverage rule drags in starters of the other.
    let calendar = RaceCalendar::new([
        RaceDefinition::new("R1", RacePhase::Early, "cobbles"),
        RaceDefinition::new("R2", RacePhase::Early, "hills"),
    ])
    .unwrap();
    let scored = ScoredCatalog::from_riders([
        ScoredRider::with_projection(
            Rider::new("a", "A", 1_000).with_start("R1"),
            100.0,
            0.0,
        ),
        ScoredRider::with_projection(
            Rider::new("b", "B", 1_000).with_start("R1"),
            95.0,
            0.0,
        ),
        ScoredRider::with_projection(
            Rider::new("c", "C", 1_000).with_start("R1"),
            90.0,
            0.0,
        ),
        ScoredRider::with_projection(Rider::new("d", "D", 1_000).with_start("R2"), 10.0, 0.0),
        ScoredRider::with_projection(Rider::new("e", "E", 1_000).with_start("R2"), 5.0, 0.0),
    ])
    .unwrap();
    let constraints = ConstraintSet::new(4, 10_000).with_min_starters_per_race(2);
    let outcome = solver().solve(&scored, &calendar, &constraints).unwrap();
    let (roster, objective) = optimal(outcome);
    // Both R2 starters must come along despite their low EV.
    assert!(roster.contains(&"d".into()));
    assert!(roster.contains(&"e".into()));
    assert_eq!(objective, 100.0 + 95.0 + 10.0 + 5.0);
}

#[test]
fn identical_inputs_reproduce_the_optimum() {
    let constraints = ConstraintSet::new(3, 16_000_000);
    let first = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    let second = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    assert_eq!(first.objective(), second.objective());
}

#[test]
fn relaxing_the_budget_never_hurts() {
    let mut previous = f64::MIN;
    for budget in [10_000_000u64, 12_000_000, 16_000_000, 25_000_000] {
        let constraints = ConstraintSet::new(2, budget);
        let outcome = solver()
            .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
            .unwrap();
        let objective = outcome.objective().expect("feasible at every step");
        assert!(objective >= previous);
        previous = objective;
    }
}

#[test]
fn relaxing_coverage_never_hurts() {
    let calendar = RaceCalendar::new([
        RaceDefinition::new("R1", RacePhase::Early, "cobbles"),
        RaceDefinition::new("R2", RacePhase::Early, "hills"),
    ])
    .unwrap();
    let scored = ScoredCatalog::from_riders([
        ScoredRider::with_projection(
            Rider::new("a", "A", 1_000).with_start("R1"),
            100.0,
            0.0,
        ),
        ScoredRider::with_projection(
            Rider::new("b", "B", 1_000).with_start("R1"),
            90.0,
            0.0,
        ),
        ScoredRider::with_projection(Rider::new("c", "C", 1_000).with_start("R2"), 10.0, 0.0),
    ])
    .unwrap();
    let mut previous = f64::MIN;
    for min in [1usize, 0] {
        let constraints = ConstraintSet::new(2, 10_000).with_min_starters_per_race(min);
        let outcome = solver().solve(&scored, &calendar, &constraints).unwrap();
        let objective = outcome.objective().expect("feasible at every step");
        assert!(objective >= previous);
        previous = objective;
    }
}

#[test]
fn overpriced_forced_picks_are_rejected_up_front() {
    let constraints = ConstraintSet::new(3, 10_000_000).with_must_include(["vdp", "pog"]);
    let result = solver().solve(&classic_pool(), &RaceCalendar::default(), &constraints);
    assert!(matches!(
        result.unwrap_err(),
        SelectionError::ConstraintConflict(_)
    ));
}

#[test]
fn exact_roster_size_is_always_returned() {
    for size in 1..=5usize {
        let constraints = ConstraintSet::new(size, 46_000_000);
        let outcome = solver()
            .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
            .unwrap();
        let (roster, _) = optimal(outcome);
        assert_eq!(roster.len(), size);
    }
}

#[test]
fn timed_out_solves_say_so_instead_of_guessing() {
    let constraints = ConstraintSet::new(3, 16_000_000);
    let outcome = RosterSolver::new(TimeBudget::millis(0))
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    assert!(outcome.is_timed_out());
}

#[test]
fn budget_invariant_holds_on_every_optimal_roster() {
    let constraints = ConstraintSet::new(3, 16_000_000).with_budget_min(15_000_000);
    let outcome = solver()
        .solve(&classic_pool(), &RaceCalendar::default(), &constraints)
        .unwrap();
    let (roster, _) = optimal(outcome);
    let pool = classic_pool();
    let spend: u64 = roster
        .all_riders()
        .iter()
        .map(|id| pool.get(id).unwrap().price())
        .sum();
    assert!((15_000_000..=16_000_000).contains(&spend));
    assert_eq!(roster.len(), 3);
}

#[test]
fn rider_identity_is_the_id_not_the_name() {
    // Two Pedersens with the same display name are distinct riders.
    let scored = ScoredCatalog::from_riders([
        ScoredRider::with_projection(Rider::new("m-pedersen", "Pedersen", 4_000_000), 800.0, 0.0),
        ScoredRider::with_projection(Rider::new("r-pedersen", "Pedersen", 1_000_000), 100.0, 0.0),
    ])
    .unwrap();
    let constraints = ConstraintSet::new(2, 10_000_000);
    let outcome = solver()
        .solve(&scored, &RaceCalendar::default(), &constraints)
        .unwrap();
    let (roster, _) = optimal(outcome);
    assert!(roster.contains(&RiderId::new("m-pedersen")));
    assert!(roster.contains(&RiderId::new("r-pedersen")));
}
