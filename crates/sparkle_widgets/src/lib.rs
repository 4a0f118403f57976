//! Sparkle Widget Library
//!
//! Headless input widgets with an AI generation affordance.
//!
//! # Architecture
//!
//! Each widget composes the same pieces:
//!
//! 1. **Generation Controller**: Guards against re-entrant triggering, awaits
//!    the host's generator and applies what it produces.
//!
//! 2. **Undo Ledger**: Remembers the value from before the last generation
//!    and restores it once.
//!
//! 3. **Accent Driver**: Rotates a gradient sweep around the border on every
//!    frame while a generation is in flight.
//!
//! The combobox adds an **Option Filter** for searching and selecting.
//!
//! Widgets are controlled: the host owns the value, the widget reads it
//! through a [`ValueBinding`](sparkle_core::ValueBinding) and proposes
//! changes through the binding's change handler. Typing, generation, undo
//! and selection all produce the same kind of change event.
//!
//! # Example
//!
//! ```ignore
//! use sparkle_widgets::prelude::*;
//!
//! let scheduler = FrameScheduler::new();
//! let name = SharedValue::new("");
//!
//! let textbox = ai_textbox(name.binding())
//!     .placeholder("Enter a product name...")
//!     .generator(Generator::new(|| async {
//!         Ok(Some("Quantum Flux Capacitor".to_string()))
//!     }))
//!     .scheduler(scheduler.handle())
//!     .build();
//!
//! // The busy check runs now; awaiting applies the result
//! let generation = textbox.trigger_generation();
//!
//! // Drive the accent from the host's frame loop
//! scheduler.tick(Duration::from_millis(16));
//! assert_eq!(textbox.accent_angle(), 2);
//!
//! generation.await;
//! assert_eq!(name.get(), "Quantum Flux Capacitor");
//!
//! textbox.undo();
//! assert_eq!(name.get(), "");
//! ```

mod field;

pub mod combobox;
pub mod filter;
pub mod generation;
pub mod textarea;
pub mod textbox;
pub mod undo;
pub mod view;

pub use combobox::{ai_combobox, AiCombobox, AiComboboxBuilder};
pub use filter::{OptionFilter, SelectOption};
pub use generation::{GenerationController, PendingGeneration};
pub use textarea::{ai_textarea, AiTextarea, AiTextareaBuilder};
pub use textbox::{ai_textbox, AiAction, AiTextbox, AiTextboxBuilder};
pub use undo::UndoLedger;
pub use view::{
    ActionRow, ButtonIcon, ComboboxView, FieldView, GenerateButton, OptionRow, TextareaView,
    TextboxView,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::combobox::{ai_combobox, AiCombobox, AiComboboxBuilder};
    pub use crate::filter::SelectOption;
    pub use crate::textarea::{ai_textarea, AiTextarea, AiTextareaBuilder};
    pub use crate::textbox::{ai_textbox, AiAction, AiTextbox, AiTextboxBuilder};
    pub use crate::view::{ButtonIcon, ComboboxView, TextareaView, TextboxView};
    pub use sparkle_animation::{set_global_scheduler, FrameScheduler, SchedulerHandle};
    pub use sparkle_core::{
        ChangeEvent, GenerationError, Generator, SharedValue, SparkleConfig, ValueBinding,
    };
}
