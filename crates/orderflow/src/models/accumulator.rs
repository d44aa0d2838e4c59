use super::Statistics;
use parking_lot::Mutex;
#[cfg(test)]
use parking_lot::MutexGuard;

/// The running aggregate of every reconciled order.
///
/// Holds one [`Statistics`] behind a single mutex. Writers only ever fold a
/// delta in via [`Accumulator::combine`]; readers only ever take a full copy
/// via [`Accumulator::get`], so a partially written value is never observed.
#[derive(Debug, Default)]
pub struct Accumulator {
    latest: Mutex<Statistics>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a point-in-time copy of the aggregate.
    pub fn get(&self) -> Statistics {
        *self.latest.lock()
    }

    /// Atomically folds `delta` into the aggregate.
    pub fn combine(&self, delta: Statistics) {
        let mut latest = self.latest.lock();
        *latest = latest.combine(delta);
    }

    /// Holds the aggregate lock, stalling every writer until the guard drops.
    #[cfg(test)]
    pub(crate) fn hold(&self) -> MutexGuard<'_, Statistics> {
        self.latest.lock()
    }
}
