//! Controlled value bindings
//!
//! Sparkle widgets never own the value they display. The host hands each
//! widget a [`ValueBinding`]: a reader the widget consults every time it needs
//! the current value, and a change handler it calls whenever it wants that
//! value to change. Typing, a completed generation, an undo and an option
//! selection all go through the same handler with the same [`ChangeEvent`]
//! shape, so the host cannot tell where a change came from.
//!
//! ```rust
//! use sparkle_core::ValueBinding;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! let binding = ValueBinding::new(
//!     || "draft".to_string(),
//!     move |event| sink.lock().unwrap().push(event.value().to_string()),
//! );
//!
//! binding.emit("final");
//! assert_eq!(binding.value(), "draft"); // the host chose not to apply it
//! assert_eq!(*seen.lock().unwrap(), vec!["final".to_string()]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::sync::lock;

/// A field-change event carrying the proposed new text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    value: String,
}

impl ChangeEvent {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The new text
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

/// Host callback receiving change events
pub type ChangeHandler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Host callback returning the current value
pub type ValueReader = Arc<dyn Fn() -> String + Send + Sync>;

/// The host side of a controlled widget value
#[derive(Clone)]
pub struct ValueBinding {
    read: ValueReader,
    on_change: Option<ChangeHandler>,
}

impl ValueBinding {
    /// Bind a value reader and a change handler
    pub fn new<R, C>(read: R, on_change: C) -> Self
    where
        R: Fn() -> String + Send + Sync + 'static,
        C: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            on_change: Some(Arc::new(on_change)),
        }
    }

    /// Bind a value without a change handler
    ///
    /// Change requests are dropped; the widget keeps showing whatever the
    /// reader returns.
    pub fn read_only<R>(read: R) -> Self
    where
        R: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            on_change: None,
        }
    }

    /// Read the host's current value
    pub fn value(&self) -> String {
        (self.read)()
    }

    pub fn has_change_handler(&self) -> bool {
        self.on_change.is_some()
    }

    /// Prepare a change notification without delivering it yet
    ///
    /// Widgets build notifications while holding their own state lock and
    /// deliver them after releasing it, so a handler may call back into the
    /// widget.
    pub fn change(&self, value: impl Into<String>) -> Option<Notification> {
        self.on_change.as_ref().map(|handler| Notification {
            handler: Arc::clone(handler),
            event: ChangeEvent::new(value),
        })
    }

    /// Deliver a change notification immediately
    pub fn emit(&self, value: impl Into<String>) {
        if let Some(notification) = self.change(value) {
            notification.deliver();
        }
    }
}

impl fmt::Debug for ValueBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBinding")
            .field("value", &self.value())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// A change event bound to the handler that will receive it
#[must_use = "a notification does nothing until delivered"]
pub struct Notification {
    handler: ChangeHandler,
    event: ChangeEvent,
}

impl Notification {
    pub fn event(&self) -> &ChangeEvent {
        &self.event
    }

    /// Hand the event to the host
    pub fn deliver(self) {
        (self.handler)(&self.event)
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("event", &self.event)
            .finish()
    }
}

/// A host-side value cell
///
/// The equivalent of a host keeping the value in its own state and writing
/// every change event straight back into it.
#[derive(Clone, Default)]
pub struct SharedValue {
    value: Arc<Mutex<String>>,
    changes: Arc<AtomicUsize>,
}

impl SharedValue {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial.into())),
            changes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn get(&self) -> String {
        lock(&self.value).clone()
    }

    /// Replace the value from the host side (does not count as a change event)
    pub fn set(&self, value: impl Into<String>) {
        *lock(&self.value) = value.into();
    }

    /// Number of change events applied through bindings
    pub fn change_count(&self) -> usize {
        self.changes.load(Ordering::SeqCst)
    }

    /// Create a binding that reads this cell and applies every change to it
    pub fn binding(&self) -> ValueBinding {
        let reader = Arc::clone(&self.value);
        let writer = Arc::clone(&self.value);
        let changes = Arc::clone(&self.changes);
        ValueBinding::new(
            move || lock(&reader).clone(),
            move |event| {
                *lock(&writer) = event.value().to_string();
                changes.fetch_add(1, Ordering::SeqCst);
            },
        )
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue")
            .field("value", &self.get())
            .field("changes", &self.change_count())
            .finish()
    }
}
