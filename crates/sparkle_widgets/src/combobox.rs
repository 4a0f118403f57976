//! AiCombobox: searchable selector with AI generation
//!
//! The input shows the selected option's label while closed and the raw
//! search query while open. Typing filters the host's options by label; a
//! selection stores the option's value in the host.
//!
//! Blurring clears the query immediately but closes the dropdown only after
//! a short delay, so a pointer selection that registers after the input
//! loses focus still lands. The delay runs on the widget's frame scheduler
//! and is cancelled when the widget is dropped or refocused.
//!
//! A generation closes the dropdown, and it cannot be reopened until the
//! request settles. The generator is expected to return an option value.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sparkle_animation::{SchedulerHandle, TimerId};
use sparkle_core::sync::lock;
use sparkle_core::{Generator, Notification, SparkleConfig, ValueBinding};

use crate::field::{trigger, FieldCore, FieldOptions, GenerativeWidget};
use crate::filter::{OptionFilter, SelectOption};
use crate::view::{ComboboxView, OptionRow};

struct ComboboxState {
    field: FieldCore,
    filter: OptionFilter,
    blur_delay: Duration,
    blur_timer: Option<TimerId>,
}

impl ComboboxState {
    fn cancel_blur_timer(&mut self) {
        if let Some(id) = self.blur_timer.take() {
            if let Some(scheduler) = self.field.scheduler() {
                scheduler.cancel_timer(id);
            }
        }
    }

    /// Open the dropdown unless a generation is in flight
    fn open(&mut self) {
        if self.field.is_busy() {
            tracing::trace!("AiCombobox: stays closed while generating");
            return;
        }
        self.filter.open();
    }

    fn select(&mut self, value: String) -> Option<Notification> {
        self.cancel_blur_timer();
        self.filter.close();
        self.filter.clear_search();
        tracing::debug!("AiCombobox: selected {:?}", value);
        self.field.binding().change(value)
    }
}

impl GenerativeWidget for ComboboxState {
    fn field(&mut self) -> &mut FieldCore {
        &mut self.field
    }

    fn on_generation_start(&mut self) {
        self.filter.close();
    }
}

impl Drop for ComboboxState {
    fn drop(&mut self) {
        self.cancel_blur_timer();
    }
}

/// Searchable AI selector
pub struct AiCombobox {
    inner: Arc<Mutex<ComboboxState>>,
}

impl AiCombobox {
    /// The host's current value
    pub fn value(&self) -> String {
        lock(&self.inner).field.value()
    }

    pub fn options(&self) -> Vec<SelectOption> {
        lock(&self.inner).filter.options().to_vec()
    }

    /// Replace the option set
    pub fn set_options(&self, options: impl Into<Arc<[SelectOption]>>) {
        lock(&self.inner).filter.set_options(options);
    }

    pub fn search_text(&self) -> String {
        lock(&self.inner).filter.search_text().to_string()
    }

    /// User typed into the input: update the query and open the dropdown
    pub fn set_search_text(&self, text: impl Into<String>) {
        let mut state = lock(&self.inner);
        if state.field.is_disabled() {
            tracing::trace!("AiCombobox: search ignored while disabled");
            return;
        }
        state.filter.set_search_text(text);
        state.open();
    }

    /// Input gained focus: clear the query and open
    pub fn focus(&self) {
        let mut state = lock(&self.inner);
        if state.field.is_disabled() {
            return;
        }
        state.cancel_blur_timer();
        state.filter.clear_search();
        state.open();
    }

    /// Input lost focus: clear the query now, close after the blur delay
    pub fn blur(&self) {
        let mut state = lock(&self.inner);
        state.cancel_blur_timer();
        state.filter.clear_search();

        let weak = Arc::downgrade(&self.inner);
        let timer = state.field.scheduler().and_then(|scheduler| {
            scheduler.set_timeout(state.blur_delay, move || {
                if let Some(inner) = weak.upgrade() {
                    let mut state = lock(&inner);
                    state.blur_timer = None;
                    state.filter.close();
                    tracing::trace!("AiCombobox: closed after blur");
                }
            })
        });

        match timer {
            Some(id) => state.blur_timer = Some(id),
            None => state.filter.close(),
        }
    }

    /// Flip the dropdown open state, keeping the query
    pub fn toggle(&self) {
        let mut state = lock(&self.inner);
        if state.field.is_disabled() {
            return;
        }
        if state.filter.is_open() {
            state.filter.close();
        } else {
            state.open();
        }
    }

    pub fn is_open(&self) -> bool {
        lock(&self.inner).filter.is_open()
    }

    /// Options matching the current query, in host order
    pub fn visible_options(&self) -> Vec<SelectOption> {
        lock(&self.inner)
            .filter
            .visible_options()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Text the input currently shows
    pub fn display_text(&self) -> String {
        let state = lock(&self.inner);
        state.filter.display_text(&state.field.value())
    }

    /// Commit an option: store its value, close, and clear the query
    ///
    /// Returns false (and notifies nothing) while disabled.
    pub fn select_option(&self, option: &SelectOption) -> bool {
        let notification = {
            let mut state = lock(&self.inner);
            if state.field.is_disabled() {
                tracing::trace!("AiCombobox: selection ignored while disabled");
                return false;
            }
            state.select(option.value.clone())
        };
        if let Some(notification) = notification {
            notification.deliver();
        }
        true
    }

    /// Select the option with the given value
    ///
    /// Returns true if a selection was committed.
    pub fn select_value(&self, value: &str) -> bool {
        let option = lock(&self.inner).filter.selected(value).cloned();
        match option {
            Some(option) => self.select_option(&option),
            None => {
                tracing::trace!("AiCombobox: no option with value {:?}", value);
                false
            }
        }
    }

    /// Start a generation; closes the dropdown
    pub fn trigger_generation(&self) -> impl Future<Output = ()> + Send + 'static {
        trigger(&self.inner, None)
    }

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
            state.cancel_blur_timer();
            state.filter.close();
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

    pub fn generation_count(&self) -> u64 {
        lock(&self.inner).field.generation_count()
    }

    /// True while the blur-close delay is pending
    pub fn is_closing(&self) -> bool {
        lock(&self.inner).blur_timer.is_some()
    }

    pub fn view(&self) -> ComboboxView {
        let state = lock(&self.inner);
        let value = state.field.value();

        let dropdown = if state.filter.is_open() {
            let rows: Vec<OptionRow> = state
                .filter
                .visible_options()
                .into_iter()
                .map(|option| OptionRow {
                    value: option.value.clone(),
                    label: option.label.clone(),
                    selected: option.value == value,
                })
                .collect();
            (!rows.is_empty()).then_some(rows)
        } else {
            None
        };

        ComboboxView {
            field: state.field.view(state.filter.display_text(&value), false),
            dropdown,
        }
    }
}

impl std::fmt::Debug for AiCombobox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner);
        f.debug_struct("AiCombobox")
            .field("field", &state.field)
            .field("filter", &state.filter)
            .field("closing", &state.blur_timer.is_some())
            .finish()
    }
}

/// Create an AI combobox over `options`, bound to a host value
pub fn ai_combobox(
    binding: ValueBinding,
    options: impl Into<Arc<[SelectOption]>>,
) -> AiComboboxBuilder {
    AiComboboxBuilder {
        options: FieldOptions::new(binding),
        choices: options.into(),
    }
}

/// Builder for [`AiCombobox`]
pub struct AiComboboxBuilder {
    options: FieldOptions,
    choices: Arc<[SelectOption]>,
}

impl AiComboboxBuilder {
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.options.placeholder = text.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.options.disabled = disabled;
        self
    }

    pub fn generator(mut self, generator: Generator) -> Self {
        self.options.generator = Some(generator);
        self
    }

    pub fn scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.options.scheduler = Some(scheduler);
        self
    }

    /// Accent and blur-delay settings
    pub fn config(mut self, config: SparkleConfig) -> Self {
        self.options.config = config;
        self
    }

    pub fn build(self) -> AiCombobox {
        let blur_delay = self.options.config.selector.blur_close_delay();
        tracing::debug!("AiCombobox: built with {} options", self.choices.len());
        AiCombobox {
            inner: Arc::new(Mutex::new(ComboboxState {
                field: self.options.into_core("AiCombobox"),
                filter: OptionFilter::new(self.choices),
                blur_delay,
                blur_timer: None,
            })),
        }
    }
}
