//! Deferred work measured in frame time.

use std::fmt;

struct Timer<T> {
    remaining_ms: f32,
    item: T,
}

/// Items that come due after a delay, released by [`Timers::update`].
///
/// Items due in the same frame are released in scheduling order.
pub struct Timers<T> {
    pending: Vec<Timer<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Timers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_ms: f32, item: T) {
        self.pending.push(Timer {
            remaining_ms: delay_ms.max(0.0),
            item,
        });
    }

    /// Advance every timer and return the items that came due.
    pub fn update(&mut self, delta_ms: f32) -> Vec<T> {
        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for mut timer in self.pending.drain(..) {
            timer.remaining_ms -= delta_ms;
            if timer.remaining_ms <= 0.0 {
                due.push(timer.item);
            } else {
                waiting.push(timer);
            }
        }
        self.pending = waiting;
        due
    }

    /// Drop pending items matching `predicate`; returns how many were dropped.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|timer| !predicate(&timer.item));
        before - self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
