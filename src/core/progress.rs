use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use crate::core::error::{Error, ErrorKind, Result};

/// Progress and stop handle shared between a running command and its observers.
/// Cloning yields another handle onto the same counters.
#[derive(Debug, Clone, Default)]
pub struct Job {
    current: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    stopped: Arc<AtomicBool>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new phase over `total` records
    pub fn start(&self, total: usize) {
        self.current.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn advance(&self, position: usize) {
        self.current.store(position, Ordering::Relaxed);
    }

    /// Fraction of the current phase that has been processed
    pub fn fraction(&self) -> f64 {
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.current.load(Ordering::Relaxed) as f64 / total as f64
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn check_stop(&self) -> Result<()> {
        if self.is_stopped() {
            return Err(Error::new(ErrorKind::Interrupted, "Command was stopped".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_fraction_of_phase() {
        let job = Job::new();
        assert_eq!(job.fraction(), 0.0);
        job.start(8);
        job.advance(2);
        let observer = job.clone();
        assert_eq!(observer.fraction(), 0.25);
        job.start(4);
        assert_eq!(observer.fraction(), 0.0);
    }

    #[test]
    fn stop_is_visible_through_clones() {
        let job = Job::new();
        assert!(job.check_stop().is_ok());
        job.clone().stop();
        assert_eq!(job.check_stop().unwrap_err().kind, ErrorKind::Interrupted);
    }
}
