//! Frame scheduler
//!
//! Drives per-frame callbacks and one-shot timers for widgets. The host owns
//! a [`FrameScheduler`] and calls [`FrameScheduler::tick`] once per rendered
//! frame with the time since the previous frame. Widgets hold a weak
//! [`SchedulerHandle`] and register work through it:
//!
//! - **Frame callbacks** run on every tick until removed
//! - **Timers** run once, on the first tick at which their delay has elapsed
//!
//! Callbacks run outside the scheduler lock, so they may register or remove
//! other callbacks. A callback removed earlier in the same tick does not run.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};
use sparkle_core::sync::lock;

// ============================================================================
// Global Scheduler State
// ============================================================================

/// Global scheduler handle for widgets built without an explicit one
static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Install the global frame scheduler handle
///
/// Should be called once at app startup after creating the [`FrameScheduler`].
/// Returns `false` (and keeps the existing handle) if one was already set.
pub fn set_global_scheduler(handle: SchedulerHandle) -> bool {
    let installed = GLOBAL_SCHEDULER.set(handle).is_ok();
    if !installed {
        tracing::warn!("set_global_scheduler() called more than once; keeping the first handle");
    }
    installed
}

/// Try to get the global scheduler (returns None if not initialized)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().cloned()
}

/// Check if the global scheduler has been initialized
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

new_key_type! {
    /// Handle to a registered frame callback
    pub struct FrameCallbackId;
    /// Handle to a pending timer
    pub struct TimerId;
}

/// Callback invoked on every frame with the frame's delta time
pub type FrameCallback = Arc<dyn Fn(Duration) + Send + Sync>;

type TimerCallback = Box<dyn FnOnce() + Send>;

struct Timer {
    remaining: Duration,
    callback: TimerCallback,
}

/// Internal state of the frame scheduler
struct SchedulerInner {
    frame_callbacks: SlotMap<FrameCallbackId, FrameCallback>,
    timers: SlotMap<TimerId, Timer>,
    frame: u64,
    elapsed: Duration,
}

impl SchedulerInner {
    fn has_pending_work(&self) -> bool {
        !self.frame_callbacks.is_empty() || !self.timers.is_empty()
    }
}

/// The scheduler that ticks frame callbacks and timers
///
/// Typically held by the host's event loop and shared with widgets via
/// [`SchedulerHandle`].
///
/// ```rust
/// use sparkle_animation::FrameScheduler;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = FrameScheduler::new();
/// let frames = Arc::new(AtomicU32::new(0));
/// let counter = frames.clone();
/// let id = scheduler
///     .handle()
///     .add_frame_callback(move |_| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     })
///     .unwrap();
///
/// scheduler.tick(Duration::from_millis(16));
/// scheduler.tick(Duration::from_millis(16));
/// scheduler.handle().remove_frame_callback(id);
/// scheduler.tick(Duration::from_millis(16));
/// assert_eq!(frames.load(Ordering::SeqCst), 2);
/// ```
pub struct FrameScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                frame_callbacks: SlotMap::with_key(),
                timers: SlotMap::with_key(),
                frame: 0,
                elapsed: Duration::ZERO,
            })),
        }
    }

    /// Get a weak handle for registering work
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance one frame
    ///
    /// Runs every frame callback registered at the start of the tick, then
    /// every timer whose delay has elapsed. Returns true if work remains
    /// scheduled (the host should keep producing frames).
    pub fn tick(&self, dt: Duration) -> bool {
        let (callbacks, due) = {
            let mut inner = lock(&self.inner);
            inner.frame += 1;
            inner.elapsed += dt;

            let callbacks: Vec<(FrameCallbackId, FrameCallback)> = inner
                .frame_callbacks
                .iter()
                .map(|(id, cb)| (id, Arc::clone(cb)))
                .collect();

            let mut due = Vec::new();
            for (id, timer) in inner.timers.iter_mut() {
                timer.remaining = timer.remaining.saturating_sub(dt);
                if timer.remaining.is_zero() {
                    due.push(id);
                }
            }
            (callbacks, due)
        };

        for (id, callback) in callbacks {
            let still_registered = lock(&self.inner).frame_callbacks.contains_key(id);
            if still_registered {
                callback(dt);
            }
        }

        for id in due {
            let timer = lock(&self.inner).timers.remove(id);
            if let Some(timer) = timer {
                (timer.callback)();
            }
        }

        lock(&self.inner).has_pending_work()
    }

    /// Check if any frame callbacks or timers are scheduled
    pub fn has_pending_work(&self) -> bool {
        lock(&self.inner).has_pending_work()
    }

    pub fn frame_callback_count(&self) -> usize {
        lock(&self.inner).frame_callbacks.len()
    }

    pub fn timer_count(&self) -> usize {
        lock(&self.inner).timers.len()
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        lock(&self.inner).frame
    }

    /// Sum of all tick deltas so far
    pub fn elapsed(&self) -> Duration {
        lock(&self.inner).elapsed
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("FrameScheduler")
            .field("frame", &inner.frame)
            .field("frame_callbacks", &inner.frame_callbacks.len())
            .field("timers", &inner.timers.len())
            .finish()
    }
}

/// A weak handle to the frame scheduler
///
/// Won't keep the scheduler alive. Every operation on a handle whose
/// scheduler has been dropped is a no-op returning `None`/`false`.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    // =========================================================================
    // Frame Callbacks
    // =========================================================================

    /// Register a callback to run on every frame until removed
    pub fn add_frame_callback<F>(&self, callback: F) -> Option<FrameCallbackId>
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).frame_callbacks.insert(Arc::new(callback)))
    }

    /// Remove a frame callback; returns true if it was registered
    pub fn remove_frame_callback(&self, id: FrameCallbackId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).frame_callbacks.remove(id).is_some())
            .unwrap_or(false)
    }

    pub fn has_frame_callback(&self, id: FrameCallbackId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).frame_callbacks.contains_key(id))
            .unwrap_or(false)
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Run `callback` once after `delay` has elapsed
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> Option<TimerId>
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.upgrade().map(|inner| {
            lock(&inner).timers.insert(Timer {
                remaining: delay,
                callback: Box::new(callback),
            })
        })
    }

    /// Cancel a pending timer; returns true if it had not fired yet
    pub fn cancel_timer(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).timers.remove(id).is_some())
            .unwrap_or(false)
    }

    pub fn has_timer(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).timers.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
