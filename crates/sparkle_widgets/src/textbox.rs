//! AiTextbox: single-line input with AI generation
//!
//! A text field with a generate button, an undo button shown after a
//! generation, and a rotating accent border while a request is in flight.
//!
//! With [`AiAction`]s configured the button opens an action menu instead of
//! generating directly, and the chosen action's value is passed to the
//! generator.
//!
//! ```ignore
//! let title = SharedValue::new("");
//! let textbox = ai_textbox(title.binding())
//!     .placeholder("Enter a title...")
//!     .action("Generate title", "generate")
//!     .action("Make shorter", "shorten")
//!     .generator(Generator::with_action(|action| async move {
//!         Ok(action.map(|a| format!("{a}d title")))
//!     }))
//!     .build();
//!
//! textbox.toggle_action_menu();
//! textbox.choose_action("shorten").await;
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex};

use sparkle_animation::SchedulerHandle;
use sparkle_core::sync::lock;
use sparkle_core::{Generator, SparkleConfig, ValueBinding};

use crate::field::{trigger, FieldCore, FieldOptions, GenerativeWidget};
use crate::view::{ActionRow, TextboxView};

/// An entry in the textbox's action menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiAction {
    pub label: String,
    /// Passed to the generator when chosen
    pub value: String,
}

impl AiAction {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

struct TextboxState {
    field: FieldCore,
    actions: Vec<AiAction>,
    menu_open: bool,
}

impl GenerativeWidget for TextboxState {
    fn field(&mut self) -> &mut FieldCore {
        &mut self.field
    }

    fn on_generation_start(&mut self) {
        self.menu_open = false;
    }
}

/// Single-line AI input
pub struct AiTextbox {
    inner: Arc<Mutex<TextboxState>>,
}

impl AiTextbox {
    /// The host's current value
    pub fn value(&self) -> String {
        lock(&self.inner).field.value()
    }

    /// User typed; forwards the new text to the host
    pub fn input(&self, text: impl Into<String>) {
        let notification = lock(&self.inner).field.edit(text);
        if let Some(notification) = notification {
            notification.deliver();
        }
    }

    /// Start a generation with no action
    ///
    /// The busy and disabled checks run immediately; the returned future
    /// awaits the generator and applies its result.
    pub fn trigger_generation(&self) -> impl Future<Output = ()> + Send + 'static {
        trigger(&self.inner, None)
    }

    /// Close the action menu and generate with the chosen action
    pub fn choose_action(&self, value: &str) -> impl Future<Output = ()> + Send + 'static {
        lock(&self.inner).menu_open = false;
        trigger(&self.inner, Some(value.to_string()))
    }

    /// Open or close the action menu
    ///
    /// Ignored without actions, while busy, or while disabled.
    pub fn toggle_action_menu(&self) {
        let mut state = lock(&self.inner);
        if state.actions.is_empty() || state.field.is_busy() || state.field.is_disabled() {
            tracing::trace!("AiTextbox: action menu unavailable");
            return;
        }
        state.menu_open = !state.menu_open;
    }

    pub fn close_action_menu(&self) {
        lock(&self.inner).menu_open = false;
    }

    pub fn is_action_menu_open(&self) -> bool {
        lock(&self.inner).menu_open
    }

    pub fn actions(&self) -> Vec<AiAction> {
        lock(&self.inner).actions.clone()
    }

    /// Restore the value from before the last generation
    pub fn undo(&self) {
        let notification = lock(&self.inner).field.undo();
        if let Some(notification) = notification {
            notification.deliver();
        }
    }

    pub fn set_disabled(&self, disabled: bool) {
        let mut state = lock(&self.inner);
        state.field.set_disabled(disabled);
        if disabled {
            state.menu_open = false;
        }
    }

    pub fn set_generator(&self, generator: Option<Generator>) {
        lock(&self.inner).field.set_generator(generator);
    }

    pub fn is_disabled(&self) -> bool {
        lock(&self.inner).field.is_disabled()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.inner).field.is_busy()
    }

    pub fn is_accented(&self) -> bool {
        lock(&self.inner).field.is_accented()
    }

    pub fn accent_angle(&self) -> u16 {
        lock(&self.inner).field.accent_angle()
    }

    pub fn has_undo(&self) -> bool {
        lock(&self.inner).field.has_undo()
    }

    pub fn undo_value(&self) -> Option<String> {
        lock(&self.inner).field.undo_value().map(str::to_string)
    }

    /// Generations started over the widget's lifetime
    pub fn generation_count(&self) -> u64 {
        lock(&self.inner).field.generation_count()
    }

    pub fn view(&self) -> TextboxView {
        let state = lock(&self.inner);
        let action_menu = state.menu_open.then(|| {
            state
                .actions
                .iter()
                .map(|action| ActionRow {
                    label: action.label.clone(),
                    value: action.value.clone(),
                })
                .collect()
        });
        TextboxView {
            field: state
                .field
                .view(state.field.value(), !state.actions.is_empty()),
            action_menu,
        }
    }
}

impl std::fmt::Debug for AiTextbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner);
        f.debug_struct("AiTextbox")
            .field("field", &state.field)
            .field("actions", &state.actions.len())
            .field("menu_open", &state.menu_open)
            .finish()
    }
}

/// Create an AI textbox bound to a host value
pub fn ai_textbox(binding: ValueBinding) -> AiTextboxBuilder {
    AiTextboxBuilder {
        options: FieldOptions::new(binding),
        actions: Vec::new(),
    }
}

/// Builder for [`AiTextbox`]
pub struct AiTextboxBuilder {
    options: FieldOptions,
    actions: Vec<AiAction>,
}

impl AiTextboxBuilder {
    /// Set the placeholder text
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.options.placeholder = text.into();
        self
    }

    /// Set disabled state
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.options.disabled = disabled;
        self
    }

    /// Set the generation callback
    pub fn generator(mut self, generator: Generator) -> Self {
        self.options.generator = Some(generator);
        self
    }

    /// Add an entry to the action menu
    pub fn action(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.actions.push(AiAction::new(label, value));
        self
    }

    /// Replace the action menu entries
    pub fn actions(mut self, actions: impl IntoIterator<Item = AiAction>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    /// Drive the accent from this scheduler instead of the global one
    pub fn scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.options.scheduler = Some(scheduler);
        self
    }

    pub fn config(mut self, config: SparkleConfig) -> Self {
        self.options.config = config;
        self
    }

    pub fn build(self) -> AiTextbox {
        let field = self.options.into_core("AiTextbox");
        tracing::debug!("AiTextbox: built with {} actions", self.actions.len());
        AiTextbox {
            inner: Arc::new(Mutex::new(TextboxState {
                field,
                actions: self.actions,
                menu_open: false,
            })),
        }
    }
}
