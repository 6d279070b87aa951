//! Balanced reranker: orders candidates by average rating while keeping the aggregate
//! relevance deviation from a pure-relevance ordering under an error budget.
//!
//! Each attempt walks rating buckets from highest to lowest and admits an item into the
//! next open slot `k` when `item.relevance / candidates[k].relevance < threshold`. A filled
//! attempt succeeds when the accumulated deviation, relative to the accumulated baseline,
//! is under the budget; otherwise the threshold is lowered by one step and the walk
//! restarts with fresh state.

use crate::buckets::RatingBuckets;
use shop_types::{Candidate, ItemId, SearchError};
use std::time::{Duration, Instant};

/// Tuning for [`BalancedReranker`].
#[derive(Debug, Clone)]
pub struct RerankConfig {
    /// Number of items to select.
    pub result_count: usize,
    /// Maximum tolerated `mean_error / mean_baseline`.
    pub error_budget: f64,
    /// Acceptance multiplier of the first attempt.
    pub initial_threshold: f64,
    /// Amount the threshold drops between attempts.
    pub threshold_step: f64,
    /// No attempt runs with a threshold below this.
    pub min_threshold: f64,
    /// Wall-clock bound on the relaxation loop. At least one attempt always runs.
    pub deadline: Option<Duration>,
    /// Hard cap on attempts, independent of the threshold arithmetic.
    pub max_attempts: usize,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            result_count: 10,
            error_budget: 0.05,
            initial_threshold: 1.1,
            threshold_step: 0.005,
            min_threshold: 0.5,
            deadline: None,
            max_attempts: 200,
        }
    }
}

impl RerankConfig {
    pub fn with_result_count(mut self, result_count: usize) -> Self {
        self.result_count = result_count;
        self
    }

    pub fn with_error_budget(mut self, error_budget: f64) -> Self {
        self.error_budget = error_budget;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Diagnostics of the attempt that produced the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerankStats {
    pub threshold: f64,
    /// Number of attempts run, including the successful one.
    pub attempts: usize,
    pub accumulated_error: f64,
    pub accumulated_baseline: f64,
    pub mean_error: f64,
    pub mean_baseline: f64,
}

impl RerankStats {
    /// `mean_error / mean_baseline`; zero when nothing was selected.
    pub fn relative_error(&self) -> f64 {
        if self.mean_baseline == 0.0 {
            0.0
        } else {
            self.mean_error / self.mean_baseline
        }
    }
}

/// Successful rerank: selected ids in rating order plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Reranked {
    pub ids: Vec<ItemId>,
    pub stats: RerankStats,
}

/// Why a rerank could not produce `result_count` items.
#[derive(Debug, Clone, PartialEq)]
pub enum InsufficientReason {
    /// The candidate set is smaller than the requested count.
    TooFewCandidates { available: usize, required: usize },
    /// A full bucket walk admitted fewer than the requested count.
    PassExhausted {
        admitted: usize,
        required: usize,
        threshold: f64,
    },
    /// The error budget was not met before the threshold reached its floor.
    ThresholdFloor { floor: f64, attempts: usize },
    /// The relaxation loop ran past the configured deadline.
    DeadlineExceeded { attempts: usize },
    /// The attempt cap was reached before the budget was met.
    AttemptLimit { attempts: usize },
    /// The threshold step must be finite and positive or the loop cannot relax.
    InvalidThresholdStep { step: f64 },
}

impl std::fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsufficientReason::TooFewCandidates {
                available,
                required,
            } => write!(f, "{available} candidates available, {required} required"),
            InsufficientReason::PassExhausted {
                admitted,
                required,
                threshold,
            } => write!(
                f,
                "only {admitted} of {required} items admitted at threshold {threshold:.3}"
            ),
            InsufficientReason::ThresholdFloor { floor, attempts } => write!(
                f,
                "error budget not met after {attempts} attempts (threshold floor {floor:.3})"
            ),
            InsufficientReason::DeadlineExceeded { attempts } => {
                write!(f, "deadline exceeded after {attempts} attempts")
            }
            InsufficientReason::AttemptLimit { attempts } => {
                write!(f, "error budget not met within {attempts} attempts")
            }
            InsufficientReason::InvalidThresholdStep { step } => {
                write!(f, "threshold step {step} does not lower the threshold")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RerankError {
    #[error("insufficient candidates: {0}")]
    InsufficientCandidates(InsufficientReason),
}

impl From<RerankError> for SearchError {
    fn from(e: RerankError) -> Self {
        match e {
            RerankError::InsufficientCandidates(reason) => {
                SearchError::InsufficientCandidates(reason.to_string())
            }
        }
    }
}

/// Result of one selection attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(Reranked),
    /// Budget missed; retry with this (lower) threshold.
    Retry(f64),
    Fail(InsufficientReason),
}

/// Per-attempt state, rebuilt from scratch on every attempt.
struct SelectionState {
    accepted: Vec<usize>,
    accumulated_error: f64,
    accumulated_baseline: f64,
}

impl SelectionState {
    fn new(capacity: usize) -> Self {
        Self {
            accepted: Vec::with_capacity(capacity),
            accumulated_error: 0.0,
            accumulated_baseline: 0.0,
        }
    }
}

/// Reranker over one relevance-ordered candidate set.
pub struct BalancedReranker<'a> {
    candidates: &'a [Candidate],
    buckets: RatingBuckets,
    config: &'a RerankConfig,
}

impl<'a> BalancedReranker<'a> {
    /// `candidates` must be ordered by relevance descending; `secondary_key` must be defined
    /// for every candidate id.
    pub fn new<F>(candidates: &'a [Candidate], secondary_key: F, config: &'a RerankConfig) -> Self
    where
        F: Fn(&str) -> f64,
    {
        Self {
            candidates,
            buckets: RatingBuckets::build(candidates, secondary_key),
            config,
        }
    }

    /// Run attempts with decreasing thresholds until one meets the error budget.
    pub fn rerank(&self) -> Result<Reranked, RerankError> {
        let required = self.config.result_count;
        if self.candidates.len() < required {
            return Err(RerankError::InsufficientCandidates(
                InsufficientReason::TooFewCandidates {
                    available: self.candidates.len(),
                    required,
                },
            ));
        }

        let step = self.config.threshold_step;
        if !(step.is_finite() && step > 0.0) {
            return Err(RerankError::InsufficientCandidates(
                InsufficientReason::InvalidThresholdStep { step },
            ));
        }

        let started = Instant::now();
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        let mut threshold = self.config.initial_threshold;
        loop {
            if attempt > 0 {
                if attempt >= max_attempts {
                    return Err(RerankError::InsufficientCandidates(
                        InsufficientReason::AttemptLimit { attempts: attempt },
                    ));
                }
                if let Some(deadline) = self.config.deadline {
                    if started.elapsed() >= deadline {
                        return Err(RerankError::InsufficientCandidates(
                            InsufficientReason::DeadlineExceeded { attempts: attempt },
                        ));
                    }
                }
            }
            match self.attempt(attempt, threshold) {
                AttemptOutcome::Success(reranked) => return Ok(reranked),
                AttemptOutcome::Retry(next) => {
                    threshold = next;
                    attempt += 1;
                }
                AttemptOutcome::Fail(reason) => {
                    return Err(RerankError::InsufficientCandidates(reason))
                }
            }
        }
    }

    /// Run the zero-based `attempt` at `threshold` in isolation.
    pub fn attempt(&self, attempt: usize, threshold: f64) -> AttemptOutcome {
        let floor = self.config.min_threshold;
        if threshold < floor {
            return AttemptOutcome::Fail(InsufficientReason::ThresholdFloor {
                floor,
                attempts: attempt,
            });
        }

        let required = self.config.result_count;
        let mut state = SelectionState::new(required);
        for idx in self.buckets.walk() {
            if state.accepted.len() >= required {
                break;
            }
            let slot = state.accepted.len();
            let expected = self.candidates[slot].relevance;
            // Non-positive baseline: the ratio is meaningless, reject.
            if expected <= 0.0 {
                continue;
            }
            let relevance = self.candidates[idx].relevance;
            if relevance / expected < threshold {
                state.accepted.push(idx);
                state.accumulated_error += relevance - expected;
                state.accumulated_baseline += expected;
            }
        }

        if state.accepted.len() < required {
            return AttemptOutcome::Fail(InsufficientReason::PassExhausted {
                admitted: state.accepted.len(),
                required,
                threshold,
            });
        }

        let slots = required.max(1) as f64;
        let stats = RerankStats {
            threshold,
            attempts: attempt + 1,
            accumulated_error: state.accumulated_error,
            accumulated_baseline: state.accumulated_baseline,
            mean_error: state.accumulated_error / slots,
            mean_baseline: state.accumulated_baseline / slots,
        };
        if required == 0 || stats.relative_error() < self.config.error_budget {
            let ids = state
                .accepted
                .iter()
                .map(|&i| self.candidates[i].id.clone())
                .collect();
            return AttemptOutcome::Success(Reranked { ids, stats });
        }

        let next = threshold - self.config.threshold_step;
        if next < floor {
            AttemptOutcome::Fail(InsufficientReason::ThresholdFloor {
                floor,
                attempts: attempt + 1,
            })
        } else {
            AttemptOutcome::Retry(next)
        }
    }
}

/// Convenience wrapper around [`BalancedReranker`].
pub fn rerank<F>(
    candidates: &[Candidate],
    secondary_key: F,
    config: &RerankConfig,
) -> Result<Reranked, RerankError>
where
    F: Fn(&str) -> f64,
{
    BalancedReranker::new(candidates, secondary_key, config).rerank()
}
