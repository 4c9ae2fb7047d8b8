//! Repeat budget for finite behaviors.
//!
//! A budget is either unlimited or a counter of remaining matches. Taking a
//! match from a counter is a compare-and-swap loop, so under any amount of
//! concurrency each unit is handed out exactly once and exactly one caller
//! sees the transition to zero.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Outcome of trying to take one match from a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// No limit configured.
    Unlimited,
    /// One unit taken, more remain.
    Granted { remaining: usize },
    /// The caller took the final unit and owns removing the behavior.
    Last,
    /// Nothing left; the behavior must be treated as absent.
    Exhausted,
}

impl Grant {
    /// True if the caller may answer the request with this behavior.
    pub fn is_granted(&self) -> bool {
        !matches!(self, Grant::Exhausted)
    }
}

#[derive(Debug)]
pub struct RepeatBudget {
    remaining: Option<AtomicUsize>,
}

impl RepeatBudget {
    pub fn new(repeat: Option<usize>) -> Self {
        Self {
            remaining: repeat.map(AtomicUsize::new),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Take one match.
    pub fn acquire(&self) -> Grant {
        let Some(remaining) = &self.remaining else {
            return Grant::Unlimited;
        };

        let mut current = remaining.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return Grant::Exhausted;
            }
            match remaining.compare_exchange_weak(current, current - 1, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) if current == 1 => return Grant::Last,
                Ok(_) => return Grant::Granted { remaining: current - 1 },
                Err(actual) => current = actual,
            }
        }
    }

    /// Remaining matches, `None` when unlimited.
    pub fn remaining(&self) -> Option<usize> {
        self.remaining.as_ref().map(|r| r.load(Ordering::Acquire))
    }
}
