//! Reads one scheduling request as JSON from stdin, solves it, and writes
//! one JSON response to stdout. Exits non-zero only on I/O failure reading
//! stdin or writing stdout; a malformed or unsolvable request still produces
//! a JSON error envelope on stdout with exit code 0 (spec.md §6).

use std::io::{self, Read, Write};

use sectionweave::error::InputError;
use sectionweave::model::ScheduleRequest;
use sectionweave::{driver, ScheduleError};

fn main() {
    env_logger::init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        log::error!("failed to read stdin: {e}");
        std::process::exit(1);
    }

    let response = run(&input);

    let body = serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
        log::error!("failed to serialize response: {e}");
        "{\"success\":false,\"message\":\"internal serialization error\"}".to_string()
    });

    if let Err(e) = writeln!(io::stdout(), "{body}") {
        log::error!("failed to write stdout: {e}");
        std::process::exit(1);
    }
}

fn run(input: &str) -> sectionweave::ScheduleResponse {
    if input.trim().is_empty() {
        let err = ScheduleError::Input(InputError::EmptyBody);
        log::warn!("{err}");
        return driver::error_response(&err);
    }

    let request: ScheduleRequest = match serde_json::from_str(input) {
        Ok(request) => request,
        Err(e) => {
            let err = ScheduleError::Input(InputError::MalformedJson(e.to_string()));
            log::warn!("{err}");
            return driver::error_response(&err);
        }
    };

    match driver::solve(request) {
        Ok(response) => response,
        Err(e) => {
            log::warn!("{e}");
            driver::error_response(&e)
        }
    }
}
