//! Call-scoped accumulator shared by the workers of one parallel reduction.

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct State {
    sum: f64,
    contributions: usize,
}

/// Final value of an [`Accumulator`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Accumulated {
    pub sum: f64,
    /// How many partial sums were added
    pub contributions: usize,
}

/// Lock-guarded running sum.
///
/// Created at zero for each call, lent to that call's workers and consumed
/// once they are all reaped. Two calls never share one.
#[derive(Debug, Default)]
pub struct Accumulator {
    state: Mutex<State>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one worker's partial sum.
    pub fn add(&self, partial: f64) {
        let mut state = self.state.lock();
        state.sum += partial;
        state.contributions += 1;
    }

    pub fn contributions(&self) -> usize {
        self.state.lock().contributions
    }

    pub fn into_accumulated(self) -> Accumulated {
        let state = self.state.into_inner();
        Accumulated {
            sum: state.sum,
            contributions: state.contributions,
        }
    }
}
