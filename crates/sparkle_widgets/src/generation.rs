//! Generation controller
//!
//! Tracks whether a generation request is in flight and turns the host
//! callback's outcome into the value (if any) the widget should adopt.
//!
//! The busy check in [`GenerationController::begin`] is synchronous. A widget
//! runs it when the trigger is pressed, before anything is awaited, so two
//! triggers on the same turn cannot both start a request. Nothing cancels a
//! request once started.
//!
//! Entering the busy state and calling the host generator are separate
//! steps: [`PendingGeneration::start`] runs host code, so a widget calls it
//! only after releasing its own lock.

use sparkle_core::{GenerateFuture, GenerationError, GenerationResult, Generator};

/// Busy/idle state for one widget's generation requests
#[derive(Debug, Default)]
pub struct GenerationController {
    generator: Option<Generator>,
    busy: bool,
    started: u64,
    failed: u64,
}

impl GenerationController {
    pub fn new(generator: Option<Generator>) -> Self {
        Self {
            generator,
            ..Self::default()
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_generator(&mut self, generator: Option<Generator>) {
        self.generator = generator;
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Enter the busy state for a new request
    ///
    /// Returns `None` without side effects if a request is already in flight.
    /// The generator is not called until [`PendingGeneration::start`].
    pub fn begin(&mut self, action: Option<String>) -> Option<PendingGeneration> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.started += 1;
        Some(PendingGeneration {
            generator: self.generator.clone(),
            action,
        })
    }

    /// Leave the busy state, returning the text to adopt (if any)
    ///
    /// Failures are logged and swallowed; the widget keeps its value.
    pub fn finish(&mut self, result: GenerationResult) -> Option<String> {
        self.busy = false;
        match result {
            Ok(text) => text,
            Err(err) => {
                self.failed += 1;
                tracing::warn!("Generation failed, keeping current value: {}", err);
                None
            }
        }
    }

    /// Number of requests started over the widget's lifetime
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Number of requests that ended in failure
    pub fn failed(&self) -> u64 {
        self.failed
    }
}

/// A request that has entered the busy state but not yet called the host
pub struct PendingGeneration {
    generator: Option<Generator>,
    action: Option<String>,
}

impl PendingGeneration {
    /// The action identifier passed to the generator
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Call the host generator; a widget without one produces nothing
    ///
    /// Runs host code synchronously, so it must not be called while the
    /// widget lock is held.
    pub fn start(self) -> GenerateFuture {
        match self.generator {
            Some(generator) => generator.generate(self.action),
            None => Box::pin(async { Ok(None) }),
        }
    }
}

impl std::fmt::Debug for PendingGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingGeneration")
            .field("action", &self.action)
            .field("has_generator", &self.generator.is_some())
            .finish()
    }
}

/// Result used when a pending request is dropped before it settles
pub(crate) fn abandoned() -> GenerationResult {
    Err(GenerationError::Abandoned)
}
