//! Training progress logging.

/// How much trainers report while fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// One summary line per trained model.
    Info,
    /// Per-round metric lines.
    Debug,
}

/// Writes training progress to stderr, leaving stdout for reports.
#[derive(Debug, Clone, Copy)]
pub struct TrainingLogger {
    name: &'static str,
    verbosity: Verbosity,
}

impl TrainingLogger {
    pub fn new(name: &'static str, verbosity: Verbosity) -> Self {
        Self { name, verbosity }
    }

    /// Log one boosting round at `Debug`.
    pub fn round(&self, round: usize, metric: &str, value: f64) {
        if self.verbosity >= Verbosity::Debug {
            eprintln!("[{}] round {:>4}  {}: {:.6}", self.name, round, metric, value);
        }
    }

    /// Log a completed fit at `Info`.
    pub fn summary(&self, rounds: usize, metric: &str, value: f64) {
        if self.verbosity >= Verbosity::Info {
            eprintln!(
                "[{}] finished {} rounds  {}: {:.6}",
                self.name, rounds, metric, value
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_orders() {
        assert!(Verbosity::Silent < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn silent_logger_is_constructible() {
        let logger = TrainingLogger::new("gbdt", Verbosity::Silent);
        logger.round(0, "rmse", 1.0);
        logger.summary(10, "rmse", 0.5);
    }
}
