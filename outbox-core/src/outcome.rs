//! Per-call outcome collection: ordered results, combined failure at the end.

use crate::dispatch::SendResult;
use crate::error::SendError;
use std::fmt;

/// One combined failure for a whole render, wrapping every call that failed in order.
#[derive(Debug)]
pub struct AggregateFailure {
    failures: Vec<(usize, SendError)>,
}

impl std::error::Error for AggregateFailure {}

impl AggregateFailure {
    /// The failed calls as `(call index, error)` pairs, in call order.
    pub fn failures(&self) -> &[(usize, SendError)] {
        &self.failures
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} send call(s) failed:", self.failures.len())?;
        for (index, error) in &self.failures {
            write!(f, " [{}] {};", index, error)?;
        }
        Ok(())
    }
}

/// Ordered log of per-call outcomes for one render. Failures are recorded and the render
/// continues; [`CallLog::finish`] reports them all at once.
#[derive(Debug, Default)]
pub struct CallLog {
    outcomes: Vec<Result<SendResult, SendError>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next recorded call will get.
    pub fn next_index(&self) -> usize {
        self.outcomes.len()
    }

    pub fn record(&mut self, outcome: Result<SendResult, SendError>) {
        self.outcomes.push(outcome);
    }

    /// Returns the ordered successful results, or one [`AggregateFailure`] wrapping every
    /// recorded error.
    pub fn finish(self) -> Result<Vec<SendResult>, AggregateFailure> {
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (index, outcome) in self.outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => results.push(result),
                Err(error) => failures.push((index, error)),
            }
        }
        if failures.is_empty() {
            Ok(results)
        } else {
            Err(AggregateFailure { failures })
        }
    }
}
