//! Shared token budget charged once per transmitted request.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenBudgetSnapshot {
    pub remaining: u64,
    /// Tokens successfully charged since the budget was created.
    pub charged: u64,
}

#[derive(Debug)]
struct State {
    remaining: u64,
    charged: u64,
}

/// Remaining paid API credits.
///
/// - Only decreases through [`TokenBudget::charge`]
/// - Only increases through [`TokenBudget::set_remaining`]
/// - Never negative
#[derive(Debug)]
pub struct TokenBudget {
    state: Mutex<State>,
}

impl TokenBudget {
    /// Negative values clamp to zero.
    pub fn new(initial: i64) -> Self {
        Self {
            state: Mutex::new(State {
                remaining: clamp(initial),
                charged: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State is two integers updated together; a panic elsewhere can't leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Charge `n` tokens. Returns false and leaves the counter unchanged when
    /// `n` exceeds what remains.
    pub fn charge(&self, n: u64) -> bool {
        let mut st = self.lock();
        if n > st.remaining {
            return false;
        }
        st.remaining -= n;
        st.charged = st.charged.saturating_add(n);
        true
    }

    /// Like [`charge`](Self::charge) but reports the shortfall.
    pub fn try_charge(&self, n: u64) -> Result<()> {
        let mut st = self.lock();
        if n > st.remaining {
            return Err(Error::InsufficientTokens {
                requested: n,
                remaining: st.remaining,
            });
        }
        st.remaining -= n;
        st.charged = st.charged.saturating_add(n);
        Ok(())
    }

    /// Overwrite the remaining count, clamped to `max(n, 0)`.
    pub fn set_remaining(&self, n: i64) {
        self.lock().remaining = clamp(n);
    }

    pub fn remaining(&self) -> u64 {
        self.lock().remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn snapshot(&self) -> TokenBudgetSnapshot {
        let st = self.lock();
        TokenBudgetSnapshot {
            remaining: st.remaining,
            charged: st.charged,
        }
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self::new(0)
    }
}

fn clamp(n: i64) -> u64 {
    n.max(0) as u64
}
