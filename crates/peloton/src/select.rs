//! One-call selection pipeline: settings + catalog in, outcome out.

use thiserror::Error;
use tracing::info;

use peloton_config::{ConfigError, SelectionSettings};
use peloton_core::{RiderCatalog, SelectionError, SolveOutcome};
use peloton_solver::{RosterSolver, TimeBudget};

/// Anything that can stop the pipeline before an outcome exists.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Scores the catalog and solves the configured selection request.
///
/// Validation order follows the error taxonomy: configuration first,
/// then data quality during scoring, then constraint conflicts in the
/// solver. Infeasibility and timeouts are `Ok` outcomes.
pub fn select_team(
    catalog: &RiderCatalog,
    settings: &SelectionSettings,
) -> Result<SolveOutcome, PipelineError> {
    let calendar = settings.calendar()?;
    let constraints = settings.constraint_set()?;
    let engine = settings.score_engine()?;

    info!(
        event = "selection_start",
        riders = catalog.len(),
        races = calendar.len(),
        roster_size = constraints.roster_size,
    );

    let scored = engine
        .score(catalog, &calendar)
        .map_err(SelectionError::from)?;
    let solver = RosterSolver::new(TimeBudget::new(settings.solver.time_limit()));
    let outcome = solver.solve(&scored, &calendar, &constraints)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use peloton_core::Rider;

    fn rider(id: &str, cobbles: u8, price: u64) -> Rider {
        Rider::new(id, id.to_uppercase(), price)
            .with_skill("cobbles", cobbles)
            .with_skill("overall", cobbles)
            .with_start("RVV")
            .with_start("PR")
    }

    fn settings(toml: &str) -> SelectionSettings {
        SelectionSettings::from_toml_str(toml).unwrap()
    }

    const CALENDAR: &str = r#"
        [[races]]
        id = "RVV"
        phase = "early"
        primary_skill = "cobbles"

        [[races]]
        id = "PR"
        phase = "early"
        primary_skill = "cobbles"
    "#;

    #[test]
    fn end_to_end_selection() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let catalog = RiderCatalog::from_riders([
            rider("a", 95, 3_000_000),
            rider("b", 90, 2_000_000),
            rider("c", 85, 1_500_000),
            rider("d", 60, 1_000_000),
        ])
        .unwrap();
        let settings = settings(&format!(
            r#"
            [selection]
            roster_size = 3
            budget_max = 6_500_000
            min_starters_per_race = 2
            {CALENDAR}
            "#
        ));

        let outcome = select_team(&catalog, &settings).unwrap();
        let SolveOutcome::Optimal { roster, .. } = outcome else {
            panic!("expected optimal");
        };
        // The three strongest riders fit the cap together.
        assert!(roster.contains(&"a".into()));
        assert!(roster.contains(&"b".into()));
        assert!(roster.contains(&"c".into()));
    }

    #[test]
    fn bad_data_stops_the_pipeline() {
        let catalog =
            RiderCatalog::from_riders([rider("a", 95, 3_000_000).with_skill("cobbles", 150)])
                .unwrap();
        let settings = settings(&format!(
            r#"
            [selection]
            roster_size = 1
            budget_max = 6_000_000
            min_starters_per_race = 0
            {CALENDAR}
            "#
        ));
        let result = select_team(&catalog, &settings);
        assert!(matches!(
            result.unwrap_err(),
            PipelineError::Selection(SelectionError::DataQuality(_))
        ));
    }
}
