//! Hooks for watching the simulation from outside.

use crate::collision::Contact;
use crate::float::Float;

/// Trait for observing simulation steps.
///
/// Implement this to trace solver progress, count contacts for debugging
/// overlays, or trigger presentation effects (a landing sound, a leaf burst)
/// without the core knowing about them. All methods have default no-op
/// implementations.
pub trait StepObserver<F: Float> {
    /// Called after every node in a branch has been integrated for a substep.
    fn on_integrate(&mut self) {}

    /// Called after each constraint relaxation pass.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called when the player overlaps a branch segment, before it is resolved.
    fn on_contact(&mut self, _contact: &Contact<F>) {}

    /// Called when the player goes from airborne to grounded.
    fn on_landing(&mut self) {}

    /// Called when a branch is rebuilt with a new segment count.
    fn on_rebuild(&mut self, _segment_count: usize) {}

    /// Called when a branch update (all substeps) is complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer. Use as default when no observation is needed.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}

/// Counts every hook invocation and keeps the deepest contact seen.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver<F: Float> {
    pub integrations: usize,
    pub constraint_iterations: usize,
    pub contacts: usize,
    pub landings: usize,
    pub rebuilds: usize,
    pub steps: usize,
    pub deepest_overlap: F,
}

impl<F: Float> RecordingObserver<F> {
    pub fn new() -> Self {
        RecordingObserver {
            integrations: 0,
            constraint_iterations: 0,
            contacts: 0,
            landings: 0,
            rebuilds: 0,
            steps: 0,
            deepest_overlap: F::zero(),
        }
    }
}

impl<F: Float> StepObserver<F> for RecordingObserver<F> {
    fn on_integrate(&mut self) {
        self.integrations += 1;
    }

    fn on_constraint_iteration(&mut self, _iteration: usize) {
        self.constraint_iterations += 1;
    }

    fn on_contact(&mut self, contact: &Contact<F>) {
        self.contacts += 1;
        self.deepest_overlap = self.deepest_overlap.max(contact.overlap);
    }

    fn on_landing(&mut self) {
        self.landings += 1;
    }

    fn on_rebuild(&mut self, _segment_count: usize) {
        self.rebuilds += 1;
    }

    fn on_step_complete(&mut self) {
        self.steps += 1;
    }
}
