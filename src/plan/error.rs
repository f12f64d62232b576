use thiserror::Error;

use super::flows::{ExperimentOption, Scenario};

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("option c requires a scenario (c1, c2a, c2b, c2c or c2d)")]
    MissingScenario,

    #[error("scenario {scenario:?} only applies to option c, not {option:?}")]
    UnexpectedScenario {
        option: ExperimentOption,
        scenario: Scenario,
    },

    #[error("link loss must be within 0..=100 percent, got {0}")]
    LossOutOfRange(f64),
}
