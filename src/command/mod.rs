pub mod create_index;
pub mod drop_index;
pub mod optimize;

use std::time::Duration;
use crate::core::error::Result;
use crate::core::progress::Job;
use crate::core::store::Store;

pub use create_index::{create, create_all, CreateIndex};
pub use drop_index::{drop, DropIndex};
pub use optimize::{optimize, Optimize};

/// Outcome of a successful command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandInfo {
    pub message: String,
    pub elapsed: Duration,
}

/// A mutating operation over a store.
///
/// Every command holds the store's update scope for the whole of `run` and
/// releases it on every exit path.
pub trait Command {
    fn run(&mut self, store: &mut Store) -> Result<CommandInfo>;

    /// Progress and stop handle of this command
    fn job(&self) -> &Job;

    /// Whether `stop` is honoured while running. A stop requested before
    /// `run` is always honoured.
    fn stoppable(&self) -> bool {
        true
    }

    fn stop(&self) {
        self.job().stop();
    }

    /// Fraction of the current phase already processed
    fn progress(&self) -> f64 {
        self.job().fraction()
    }

    /// Short description of the running phase
    fn details(&self) -> &str {
        ""
    }
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_milliseconds() {
        assert_eq!(format_elapsed(Duration::from_micros(1234)), "1.23 ms");
        assert_eq!(format_elapsed(Duration::ZERO), "0.00 ms");
    }
}
