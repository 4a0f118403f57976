//! Single-slot undo ledger
//!
//! Holds the value a widget had immediately before its most recent
//! generation. The slot is captured when a generation starts, becomes
//! restorable when it finishes, and is consumed by exactly one undo.

use std::mem;

/// One-step undo target
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndoLedger {
    slot: String,
    available: bool,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the pre-generation value, discarding any previous target
    ///
    /// The captured value is not restorable until [`arm`](Self::arm) is called.
    pub fn capture(&mut self, value: String) {
        self.slot = value;
        self.available = false;
    }

    /// Make the captured value restorable
    pub fn arm(&mut self) {
        self.available = true;
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// The value an undo would restore, if any
    pub fn peek(&self) -> Option<&str> {
        self.available.then_some(self.slot.as_str())
    }

    /// Consume the undo target
    pub fn take(&mut self) -> Option<String> {
        if !self.available {
            return None;
        }
        self.available = false;
        Some(mem::take(&mut self.slot))
    }
}
