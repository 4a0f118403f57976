//! AiTextarea: multi-line input with AI generation
//!
//! Same generation, undo and accent behavior as
//! [`AiTextbox`](crate::AiTextbox), with the buttons placed in a footer row
//! under the text.

use std::future::Future;
use std::sync::{Arc, Mutex};

use sparkle_animation::SchedulerHandle;
use sparkle_core::sync::lock;
use sparkle_core::{Generator, SparkleConfig, ValueBinding};

use crate::field::{trigger, FieldCore, FieldOptions, GenerativeWidget};
use crate::view::TextareaView;

/// Default minimum height in logical pixels
pub const DEFAULT_MIN_HEIGHT: f32 = 120.0;

struct TextareaState {
    field: FieldCore,
    min_height: f32,
}

impl GenerativeWidget for TextareaState {
    fn field(&mut self) -> &mut FieldCore {
        &mut self.field
    }
}

/// Multi-line AI input
pub struct AiTextarea {
    inner: Arc<Mutex<TextareaState>>,
}

impl AiTextarea {
    pub fn value(&self) -> String {
        lock(&self.inner).field.value()
    }

    pub fn input(&self, text: impl Into<String>) {
        let notification = lock(&self.inner).field.edit(text);
        if let Some(notification) = notification {
            notification.deliver();
        }
    }

    /// Start a generation; see [`AiTextbox::trigger_generation`](crate::AiTextbox::trigger_generation)
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
        lock(&self.inner).field.set_disabled(disabled);
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

    pub fn view(&self) -> TextareaView {
        let state = lock(&self.inner);
        let text = state.field.value();
        let line_count = text.split('\n').count();
        TextareaView {
            field: state.field.view(text, false),
            line_count,
            min_height: state.min_height,
        }
    }
}

impl std::fmt::Debug for AiTextarea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiTextarea")
            .field("field", &lock(&self.inner).field)
            .finish()
    }
}

/// Create an AI textarea bound to a host value
pub fn ai_textarea(binding: ValueBinding) -> AiTextareaBuilder {
    AiTextareaBuilder {
        options: FieldOptions::new(binding),
        min_height: DEFAULT_MIN_HEIGHT,
    }
}

/// Builder for [`AiTextarea`]
pub struct AiTextareaBuilder {
    options: FieldOptions,
    min_height: f32,
}

impl AiTextareaBuilder {
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

    /// Set the minimum height
    pub fn min_height(mut self, height: f32) -> Self {
        self.min_height = height.max(0.0);
        self
    }

    pub fn scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.options.scheduler = Some(scheduler);
        self
    }

    pub fn config(mut self, config: SparkleConfig) -> Self {
        self.options.config = config;
        self
    }

    pub fn build(self) -> AiTextarea {
        AiTextarea {
            inner: Arc::new(Mutex::new(TextareaState {
                field: self.options.into_core("AiTextarea"),
                min_height: self.min_height,
            })),
        }
    }
}
