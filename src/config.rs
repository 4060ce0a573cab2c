//! Solve configuration (C11). Grounded on the teacher's `AppConfig` /
//! `AppConfigBuilder` pattern (`application/context.rs`), but built
//! exclusively from the parsed request rather than the environment — the
//! scheduler reads no environment variables (spec.md §6).

use std::time::Duration;

/// Default CP wall-time budget when the request omits `timeLimitSec`.
pub const DEFAULT_TIME_LIMIT_SEC: u64 = 60;

/// Number of HiGHs search threads used by the CP path.
pub const DEFAULT_CP_WORKERS: usize = 4;

#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub time_limit: Duration,
    pub cp_workers: usize,
    pub seed: u64,
}

impl SolveConfig {
    pub fn from_request(time_limit_sec: Option<u64>, seed: Option<u64>) -> Self {
        SolveConfig {
            time_limit: Duration::from_secs(time_limit_sec.unwrap_or(DEFAULT_TIME_LIMIT_SEC)),
            cp_workers: DEFAULT_CP_WORKERS,
            seed: seed.unwrap_or_else(|| rand::random()),
        }
    }

    pub fn builder() -> SolveConfigBuilder {
        SolveConfigBuilder::default()
    }
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig::from_request(None, None)
    }
}

#[derive(Default)]
pub struct SolveConfigBuilder {
    time_limit_sec: Option<u64>,
    cp_workers: Option<usize>,
    seed: Option<u64>,
}

impl SolveConfigBuilder {
    pub fn time_limit_sec(mut self, secs: u64) -> Self {
        self.time_limit_sec = Some(secs);
        self
    }

    pub fn cp_workers(mut self, workers: usize) -> Self {
        self.cp_workers = Some(workers);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> SolveConfig {
        SolveConfig {
            time_limit: Duration::from_secs(self.time_limit_sec.unwrap_or(DEFAULT_TIME_LIMIT_SEC)),
            cp_workers: self.cp_workers.unwrap_or(DEFAULT_CP_WORKERS),
            seed: self.seed.unwrap_or_else(|| rand::random()),
        }
    }
}
