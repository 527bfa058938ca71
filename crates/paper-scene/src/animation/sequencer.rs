//! Frame-driven runner for animation sequences.
//!
//! ```text
//! start ──► [instant entries applied] ──► update(dt) … update(dt) ──► Finished
//!                                             │
//!                                    stop / token cancelled ──► Stopped
//! ```
//!
//! Entries run strictly in order and a parallel group settles in full before
//! the next entry starts. Frame time left over when an entry settles carries
//! into the next one. The completion callback fires exactly once, from
//! `update` or `stop`, never from `start`.

use std::collections::{HashSet, VecDeque};

use paper_surface::Surface;
use tracing::{debug, error, trace};

use super::easing::EasingFunction;
use super::step::{AnimationSequence, AnimationStep, Completion, SequenceEntry, StyleValue, current_value};
use super::types::{AnimationError, AnimationId, CancelToken, SequenceStatus};

struct Track {
    property: String,
    from: StyleValue,
    to: StyleValue,
}

struct ActiveStep {
    target: String,
    length_ms: f32,
    easing: EasingFunction,
    tracks: Vec<Track>,
    settled: bool,
}

impl ActiveStep {
    fn begin(step: AnimationStep, surface: &dyn Surface) -> Self {
        let length_ms = step.length_ms();
        let tracks = if step.is_wait() {
            Vec::new()
        } else {
            step.properties
                .into_iter()
                .map(|(property, value)| Track {
                    from: current_value(surface, &step.target, &property),
                    to: StyleValue::parse(&value),
                    property,
                })
                .collect()
        };
        Self {
            target: step.target,
            length_ms,
            easing: step.easing,
            tracks,
            settled: false,
        }
    }

    fn apply(&mut self, elapsed_ms: f32, surface: &mut dyn Surface) {
        if self.settled {
            return;
        }
        if elapsed_ms >= self.length_ms {
            for track in &self.tracks {
                surface.set_style(&self.target, &track.property, &track.to.to_css());
            }
            self.settled = true;
            return;
        }
        if elapsed_ms <= 0.0 {
            return;
        }
        let t = self.easing.evaluate(elapsed_ms / self.length_ms);
        for track in &self.tracks {
            if let Some(value) = track.from.interpolate(&track.to, t) {
                surface.set_style(&self.target, &track.property, &value.to_css());
            }
        }
    }
}

struct ActiveEntry {
    steps: Vec<ActiveStep>,
    elapsed_ms: f32,
    length_ms: f32,
}

impl ActiveEntry {
    fn begin(entry: SequenceEntry, surface: &dyn Surface) -> Self {
        let length_ms = entry.length_ms();
        let steps = entry
            .into_steps()
            .into_iter()
            .map(|step| ActiveStep::begin(step, surface))
            .collect();
        Self {
            steps,
            elapsed_ms: 0.0,
            length_ms,
        }
    }

    /// Advance by `budget`; returns the unused time once every step settled.
    fn advance(&mut self, budget: f32, surface: &mut dyn Surface) -> Option<f32> {
        self.elapsed_ms += budget;
        for step in &mut self.steps {
            step.apply(self.elapsed_ms, surface);
        }
        (self.elapsed_ms >= self.length_ms).then(|| self.elapsed_ms - self.length_ms)
    }
}

/// One run of an [`AnimationSequence`] against a surface.
pub struct AnimationSequencer {
    id: AnimationId,
    pending: VecDeque<SequenceEntry>,
    current: Option<ActiveEntry>,
    entries_started: usize,
    token: CancelToken,
    status: SequenceStatus,
    on_complete: Option<Completion>,
}

impl std::fmt::Debug for AnimationSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSequencer")
            .field("id", &self.id)
            .field("pending", &self.pending.len())
            .field("entries_started", &self.entries_started)
            .field("status", &self.status)
            .finish()
    }
}

impl AnimationSequencer {
    /// Validate `sequence` and start running it with a fresh cancel token.
    pub fn start(
        sequence: AnimationSequence,
        surface: &mut dyn Surface,
    ) -> Result<Self, AnimationError> {
        Self::start_with_token(sequence, CancelToken::new(), surface)
    }

    /// Validate `sequence` and start running it under an externally held token.
    ///
    /// Nothing is applied when validation fails. Leading zero-length entries
    /// are applied before this returns.
    pub fn start_with_token(
        sequence: AnimationSequence,
        token: CancelToken,
        surface: &mut dyn Surface,
    ) -> Result<Self, AnimationError> {
        if let Err(err) = validate(&sequence.entries, surface) {
            error!(error = %err, "animation: rejected sequence");
            return Err(err);
        }

        let mut sequencer = Self {
            id: AnimationId::new(),
            pending: sequence.entries.into(),
            current: None,
            entries_started: 0,
            token,
            status: SequenceStatus::Running,
            on_complete: sequence.on_complete,
        };
        debug!(id = sequencer.id.0, entries = sequencer.pending.len(), "animation: start");
        sequencer.begin_next(surface);
        Ok(sequencer)
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn status(&self) -> SequenceStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        !self.status.is_done()
    }

    /// A clone of the run's cancel token.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Advance the run by `delta_ms` of frame time.
    pub fn update(&mut self, delta_ms: f32, surface: &mut dyn Surface) -> SequenceStatus {
        if self.status.is_done() {
            return self.status;
        }
        if self.token.is_cancelled() {
            self.finish(SequenceStatus::Stopped, surface);
            return self.status;
        }

        let mut budget = delta_ms.max(0.0);
        loop {
            let Some(entry) = self.current.as_mut() else {
                self.finish(SequenceStatus::Finished, surface);
                return self.status;
            };
            match entry.advance(budget, surface) {
                None => return self.status,
                Some(leftover) => {
                    budget = leftover;
                    self.current = None;
                    if self.token.is_cancelled() {
                        self.finish(SequenceStatus::Stopped, surface);
                        return self.status;
                    }
                    self.begin_next(surface);
                }
            }
        }
    }

    /// Halt in place. Safe to call at any point and any number of times.
    pub fn stop(&mut self, surface: &mut dyn Surface) {
        self.token.cancel();
        if self.status.is_done() {
            return;
        }
        self.finish(SequenceStatus::Stopped, surface);
    }

    /// Start entries until one needs frame time, settling zero-length ones.
    fn begin_next(&mut self, surface: &mut dyn Surface) {
        while let Some(entry) = self.pending.pop_front() {
            if self.token.is_cancelled() {
                return;
            }
            self.entries_started += 1;
            let mut active = ActiveEntry::begin(entry, surface);
            trace!(
                id = self.id.0,
                entry = self.entries_started,
                length_ms = active.length_ms,
                "animation: entry"
            );
            if active.advance(0.0, surface).is_none() {
                self.current = Some(active);
                return;
            }
        }
    }

    fn finish(&mut self, status: SequenceStatus, surface: &mut dyn Surface) {
        self.status = status;
        self.pending.clear();
        self.current = None;
        debug!(id = self.id.0, ?status, "animation: done");
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(surface, status);
        }
    }
}

fn validate(entries: &[SequenceEntry], surface: &dyn Surface) -> Result<(), AnimationError> {
    for (entry, item) in entries.iter().enumerate() {
        let mut seen = HashSet::new();
        for step in item.steps() {
            if step.is_wait() {
                continue;
            }
            if step.target.is_empty() {
                return Err(AnimationError::MissingTarget { entry });
            }
            if !surface.contains(&step.target) {
                return Err(AnimationError::UnknownTarget {
                    entry,
                    target: step.target.clone(),
                });
            }
            if matches!(item, SequenceEntry::Parallel(_)) && !seen.insert(step.target.as_str()) {
                return Err(AnimationError::OverlappingTargets {
                    entry,
                    target: step.target.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use paper_surface::{BoxMetrics, ElementState, HeadlessSurface};

    fn surface() -> HeadlessSurface {
        let mut surface = HeadlessSurface::new();
        for id in ["a", "b", "c"] {
            surface.insert(id, ElementState::with_metrics(BoxMetrics::new(40.0, 4.0, 8.0)));
        }
        surface
    }

    fn linear(target: &str, duration_ms: f32) -> AnimationStep {
        AnimationStep::new(target, duration_ms).with_easing(EasingFunction::Linear)
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce(&mut dyn Surface, SequenceStatus) + 'static) {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        (calls, move |_: &mut dyn Surface, _: SequenceStatus| seen.set(seen.get() + 1))
    }

    #[test]
    fn entries_run_in_order() {
        let mut surface = surface();
        let (calls, done) = counter();
        let sequence = AnimationSequence::new()
            .then(linear("a", 100.0).with_property("height", "0"))
            .then(linear("b", 100.0).with_property("opacity", "0"))
            .on_complete(done);
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();

        assert_eq!(run.update(50.0, &mut surface), SequenceStatus::Running);
        assert_eq!(surface.style("a", "height").as_deref(), Some("20px"));
        assert_eq!(surface.style("b", "opacity"), None);

        run.update(50.0, &mut surface);
        assert_eq!(surface.style("a", "height").as_deref(), Some("0"));
        assert_eq!(surface.style("b", "opacity"), None);

        assert_eq!(run.update(100.0, &mut surface), SequenceStatus::Finished);
        assert_eq!(surface.style("b", "opacity").as_deref(), Some("0"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn parallel_group_is_awaited_in_full() {
        let mut surface = surface();
        let sequence = AnimationSequence::new()
            .then_parallel(vec![
                linear("a", 100.0).with_property("opacity", "0"),
                linear("b", 200.0).with_property("opacity", "0"),
            ])
            .then(linear("c", 50.0).with_property("opacity", "0"));
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();

        run.update(150.0, &mut surface);
        assert_eq!(surface.style("a", "opacity").as_deref(), Some("0"));
        assert_eq!(surface.style("b", "opacity").as_deref(), Some("0.25"));
        assert_eq!(surface.style("c", "opacity"), None);

        run.update(75.0, &mut surface);
        assert_eq!(surface.style("b", "opacity").as_deref(), Some("0"));
        assert_eq!(surface.style("c", "opacity").as_deref(), Some("0.5"));

        assert_eq!(run.update(25.0, &mut surface), SequenceStatus::Finished);
    }

    #[test]
    fn leading_instant_entries_apply_at_start() {
        let mut surface = surface();
        let (calls, done) = counter();
        let sequence = AnimationSequence::new()
            .then(AnimationStep::new("a", 0.0).with_property("display", "block"))
            .then(AnimationStep::new("b", 0.0).with_property("height", "12px"))
            .on_complete(done);
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();

        assert_eq!(surface.style("a", "display").as_deref(), Some("block"));
        assert_eq!(surface.style("b", "height").as_deref(), Some("12px"));
        assert_eq!(calls.get(), 0);

        assert_eq!(run.update(0.0, &mut surface), SequenceStatus::Finished);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn waits_delay_following_entries() {
        let mut surface = surface();
        let sequence = AnimationSequence::new()
            .then(AnimationStep::wait(300.0))
            .then(AnimationStep::new("a", 0.0).with_property("display", "none"));
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();

        run.update(299.0, &mut surface);
        assert!(surface.is_displayed("a"));
        assert_eq!(run.update(1.0, &mut surface), SequenceStatus::Finished);
        assert!(!surface.is_displayed("a"));
    }

    #[test]
    fn empty_sequence_completes_on_first_update() {
        let mut surface = surface();
        let statuses = Rc::new(RefCell::new(Vec::new()));
        let seen = statuses.clone();
        let sequence = AnimationSequence::new()
            .on_complete(move |_: &mut dyn Surface, status| seen.borrow_mut().push(status));
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();

        assert!(statuses.borrow().is_empty());
        run.update(16.0, &mut surface);
        run.update(16.0, &mut surface);
        assert_eq!(*statuses.borrow(), vec![SequenceStatus::Finished]);
    }

    #[test]
    fn stop_completes_exactly_once_in_every_phase() {
        // before the first update
        let mut surface = surface();
        let (calls, done) = counter();
        let sequence = AnimationSequence::new()
            .then(linear("a", 100.0).with_property("height", "0"))
            .on_complete(done);
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();
        run.stop(&mut surface);
        run.stop(&mut surface);
        assert_eq!(run.update(100.0, &mut surface), SequenceStatus::Stopped);
        assert_eq!(calls.get(), 1);
        assert_eq!(surface.style("a", "height"), None);

        // mid-step: halts in place
        let (calls, done) = counter();
        let sequence = AnimationSequence::new()
            .then(linear("a", 100.0).with_property("height", "0"))
            .then(linear("b", 100.0).with_property("height", "0"))
            .on_complete(done);
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();
        run.update(25.0, &mut surface);
        run.stop(&mut surface);
        run.update(500.0, &mut surface);
        assert_eq!(surface.style("a", "height").as_deref(), Some("30px"));
        assert_eq!(surface.style("b", "height"), None);
        assert_eq!(calls.get(), 1);

        // after natural completion
        let (calls, done) = counter();
        let sequence = AnimationSequence::new()
            .then(linear("c", 10.0).with_property("opacity", "0"))
            .on_complete(done);
        let mut run = AnimationSequencer::start(sequence, &mut surface).unwrap();
        assert_eq!(run.update(10.0, &mut surface), SequenceStatus::Finished);
        run.stop(&mut surface);
        assert_eq!(run.status(), SequenceStatus::Finished);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn external_token_cancels_the_run() {
        let mut surface = surface();
        let (calls, done) = counter();
        let token = CancelToken::new();
        let sequence = AnimationSequence::new()
            .then(linear("a", 100.0).with_property("opacity", "0"))
            .on_complete(done);
        let mut run =
            AnimationSequencer::start_with_token(sequence, token.clone(), &mut surface).unwrap();

        token.cancel();
        assert_eq!(run.update(16.0, &mut surface), SequenceStatus::Stopped);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn invalid_sequences_fail_before_applying_anything() {
        let mut surface = surface();
        let missing = AnimationSequence::new()
            .then(AnimationStep::new("a", 0.0).with_property("display", "none"))
            .then(AnimationStep::new("", 100.0).with_property("opacity", "0"));
        assert_eq!(
            AnimationSequencer::start(missing, &mut surface).unwrap_err(),
            AnimationError::MissingTarget { entry: 1 }
        );
        assert!(surface.is_displayed("a"));

        let unknown = AnimationSequence::new().then(AnimationStep::new("zz", 10.0));
        assert!(matches!(
            AnimationSequencer::start(unknown, &mut surface),
            Err(AnimationError::UnknownTarget { .. })
        ));

        let overlapping = AnimationSequence::new().then_parallel(vec![
            AnimationStep::new("a", 10.0),
            AnimationStep::new("a", 20.0),
        ]);
        assert_eq!(
            AnimationSequencer::start(overlapping, &mut surface).unwrap_err(),
            AnimationError::OverlappingTargets {
                entry: 0,
                target: "a".to_string()
            }
        );
    }
}
