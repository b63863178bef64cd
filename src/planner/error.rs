use thiserror::Error;

/// All errors generated in the tally::planner module.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum PlannerError {
    #[error("invalid planner configuration: {0}")]
    Configuration(String),
}
