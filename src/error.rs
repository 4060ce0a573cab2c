//! Error taxonomy (C9). Grounded on the teacher's `error_handling.rs`
//! per-domain `thiserror` enum style: one variant per distinguishable
//! failure, each carrying the detail a caller needs to act on it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("request body is empty")]
    EmptyBody,

    #[error("request is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("field {field} has an invalid value: {message}")]
    InvalidField { field: &'static str, message: String },
}

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("CP model produced no feasible solution: {status}")]
    Infeasible { status: &'static str },

    #[error("CP solver error: {0}")]
    SolverFailure(String),

    #[error("genetic algorithm failed to produce any individual")]
    GaExhausted,
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}
