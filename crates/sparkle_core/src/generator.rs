//! Generation callbacks
//!
//! A [`Generator`] wraps the host's asynchronous content-generation function.
//! Widgets call it with an optional action identifier (the multi-action
//! textbox passes the chosen action's value through unchanged) and await a
//! [`GenerationResult`]:
//!
//! - `Ok(Some(text))` - adopt `text` as the new value
//! - `Ok(None)` - nothing was produced; the value stays as it was
//! - `Err(_)` - the generation failed; logged, value unchanged

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::GenerationError;

/// Outcome of one generation request
pub type GenerationResult = Result<Option<String>, GenerationError>;

/// Boxed future returned by a generator
pub type GenerateFuture = Pin<Box<dyn Future<Output = GenerationResult> + Send + 'static>>;

type GenerateFn = dyn Fn(Option<String>) -> GenerateFuture + Send + Sync;

/// Host-supplied asynchronous generation callback (cheap to clone)
#[derive(Clone)]
pub struct Generator {
    call: Arc<GenerateFn>,
}

impl Generator {
    /// Wrap a parameterless async callback
    ///
    /// ```rust
    /// use sparkle_core::Generator;
    ///
    /// let generator = Generator::new(|| async { Ok(Some("Quantum Flux Capacitor".to_string())) });
    /// # let _ = generator;
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GenerationResult> + Send + 'static,
    {
        Self {
            call: Arc::new(move |_action: Option<String>| -> GenerateFuture { Box::pin(f()) }),
        }
    }

    /// Wrap a callback that receives the chosen action identifier
    pub fn with_action<F, Fut>(f: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GenerationResult> + Send + 'static,
    {
        Self {
            call: Arc::new(move |action: Option<String>| -> GenerateFuture { Box::pin(f(action)) }),
        }
    }

    /// Start a generation request
    pub fn generate(&self, action: Option<String>) -> GenerateFuture {
        (self.call)(action)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}
