//! Shared state and generation plumbing for the AI input variants
//!
//! Every variant wraps a [`FieldCore`] behind an `Arc<Mutex<_>>`. The core
//! composes the generation controller, undo ledger and accent driver, and
//! reads the host value through its [`ValueBinding`] on every operation.
//!
//! Operations build their [`Notification`]s while the widget lock is held and
//! deliver them after it is released, so a host change handler may call back
//! into the widget.

use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use sparkle_animation::{
    try_get_scheduler, AccentDriver, AccentFrame, AccentStyle, SchedulerHandle,
    DEFAULT_STEP_DEGREES,
};
use sparkle_core::sync::lock;
use sparkle_core::{GenerationResult, Generator, Notification, SparkleConfig, ValueBinding};

use crate::generation::{abandoned, GenerationController, PendingGeneration};
use crate::undo::UndoLedger;
use crate::view::{ButtonIcon, FieldView, GenerateButton};

/// Construction options shared by all variant builders
pub(crate) struct FieldOptions {
    pub binding: ValueBinding,
    pub placeholder: String,
    pub disabled: bool,
    pub generator: Option<Generator>,
    pub scheduler: Option<SchedulerHandle>,
    pub config: SparkleConfig,
}

impl FieldOptions {
    pub fn new(binding: ValueBinding) -> Self {
        Self {
            binding,
            placeholder: String::new(),
            disabled: false,
            generator: None,
            scheduler: None,
            config: SparkleConfig::default(),
        }
    }

    /// Build the core, falling back to the global scheduler and to the
    /// default accent when the configured one is invalid
    pub fn into_core(self, kind: &'static str) -> FieldCore {
        let scheduler = self.scheduler.or_else(try_get_scheduler);

        let (style, step) = match AccentStyle::from_config(&self.config.accent) {
            Ok(style) => (style, self.config.accent.step_degrees),
            Err(err) => {
                tracing::warn!("{}: invalid accent config, using defaults: {}", kind, err);
                (AccentStyle::default(), DEFAULT_STEP_DEGREES)
            }
        };

        if scheduler.is_none() {
            tracing::debug!("{}: created without a frame scheduler", kind);
        }

        FieldCore {
            kind,
            binding: self.binding,
            placeholder: self.placeholder,
            disabled: self.disabled,
            generation: GenerationController::new(self.generator),
            undo: UndoLedger::new(),
            accent: AccentDriver::new(scheduler.clone(), step),
            style,
            scheduler,
        }
    }
}

/// State common to every AI input variant
pub(crate) struct FieldCore {
    kind: &'static str,
    binding: ValueBinding,
    placeholder: String,
    disabled: bool,
    generation: GenerationController,
    undo: UndoLedger,
    accent: AccentDriver,
    style: AccentStyle,
    scheduler: Option<SchedulerHandle>,
}

impl FieldCore {
    pub fn value(&self) -> String {
        self.binding.value()
    }

    pub fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    pub fn scheduler(&self) -> Option<&SchedulerHandle> {
        self.scheduler.as_ref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_busy(&self) -> bool {
        self.generation.is_busy()
    }

    pub fn is_accented(&self) -> bool {
        self.accent.is_accented()
    }

    pub fn accent_angle(&self) -> u16 {
        self.accent.angle()
    }

    pub fn has_undo(&self) -> bool {
        self.undo.is_available()
    }

    pub fn undo_value(&self) -> Option<&str> {
        self.undo.peek()
    }

    pub fn generation_count(&self) -> u64 {
        self.generation.started()
    }

    pub fn set_generator(&mut self, generator: Option<Generator>) {
        self.generation.set_generator(generator);
    }

    /// Start a generation unless disabled or already busy
    pub fn begin_generation(&mut self, action: Option<String>) -> Option<PendingGeneration> {
        if self.disabled {
            tracing::trace!("{}: generation ignored while disabled", self.kind);
            return None;
        }
        if self.generation.is_busy() {
            tracing::trace!("{}: generation already in flight", self.kind);
            return None;
        }

        self.undo.capture(self.binding.value());
        let pending = self.generation.begin(action)?;
        self.accent.start();

        tracing::debug!(
            "{}: generation started (action: {:?})",
            self.kind,
            pending.action()
        );
        Some(pending)
    }

    /// Settle the in-flight generation
    ///
    /// The undo target becomes available whether or not the request produced
    /// text.
    pub fn finish_generation(&mut self, result: GenerationResult) -> Option<Notification> {
        let text = self.generation.finish(result);
        self.accent.stop();
        self.undo.arm();

        tracing::debug!(
            "{}: generation finished (produced text: {})",
            self.kind,
            text.is_some()
        );
        text.and_then(|text| self.binding.change(text))
    }

    /// Restore the pre-generation value
    pub fn undo(&mut self) -> Option<Notification> {
        if self.disabled {
            tracing::trace!("{}: undo ignored while disabled", self.kind);
            return None;
        }
        let previous = self.undo.take()?;
        tracing::debug!("{}: restoring pre-generation value", self.kind);
        self.binding.change(previous)
    }

    /// A user edit of the text
    pub fn edit(&self, text: impl Into<String>) -> Option<Notification> {
        if self.disabled {
            tracing::trace!("{}: edit ignored while disabled", self.kind);
            return None;
        }
        self.binding.change(text)
    }

    pub fn button(&self, opens_menu: bool) -> GenerateButton {
        let busy = self.is_busy();
        GenerateButton {
            icon: if busy {
                ButtonIcon::Spinner
            } else {
                ButtonIcon::Sparkles
            },
            enabled: !busy && !self.disabled,
            highlighted: self.is_accented(),
            opens_menu,
        }
    }

    pub fn accent_frame(&self) -> Option<AccentFrame> {
        self.is_accented()
            .then(|| self.style.frame(self.accent.angle()))
    }

    /// Render model for the shared parts, showing `text` in the input
    pub fn view(&self, text: String, opens_menu: bool) -> FieldView {
        FieldView {
            text,
            placeholder: self.placeholder.clone(),
            disabled: self.disabled,
            button: self.button(opens_menu),
            undo_visible: self.has_undo() && !self.disabled,
            accent: self.accent_frame(),
        }
    }
}

impl std::fmt::Debug for FieldCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.kind)
            .field("busy", &self.is_busy())
            .field("accent", &self.accent)
            .field("has_undo", &self.has_undo())
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// A widget state record that embeds a [`FieldCore`]
pub(crate) trait GenerativeWidget: Send + 'static {
    fn field(&mut self) -> &mut FieldCore;

    /// Called under the widget lock right after a generation starts
    fn on_generation_start(&mut self) {}
}

/// Start a generation on `widget` and return the future that completes it
///
/// The busy check and the state transition happen before this returns. The
/// host generator is called after the widget lock is released, so it may
/// read the widget; if it panics, the widget is returned to idle before the
/// panic propagates. The returned future awaits the host callback and
/// applies its result. It holds the widget weakly, so dropping the widget
/// while a request is in flight only skips the state update. If the future
/// itself is dropped before it settles, the widget is returned to idle as if
/// the request had failed.
pub(crate) fn trigger<W: GenerativeWidget>(
    widget: &Arc<Mutex<W>>,
    action: Option<String>,
) -> impl Future<Output = ()> + Send + 'static {
    let started = {
        let mut state = lock(widget);
        let pending = state.field().begin_generation(action);
        if pending.is_some() {
            state.on_generation_start();
        }
        let binding = state.field().binding().clone();
        pending.map(|pending| {
            let completion = Completion {
                widget: Arc::downgrade(widget),
                binding,
                settled: false,
            };
            (pending, completion)
        })
    };

    // The completion is live before host code runs; unwinding out of
    // `start` drops it and settles the widget as abandoned.
    let running = started.map(|(pending, completion)| (pending.start(), completion));

    async move {
        if let Some((future, completion)) = running {
            let result = future.await;
            completion.settle(result);
        }
    }
}

/// Applies a generation's outcome exactly once
struct Completion<W: GenerativeWidget> {
    widget: Weak<Mutex<W>>,
    binding: ValueBinding,
    settled: bool,
}

impl<W: GenerativeWidget> Completion<W> {
    fn settle(mut self, result: GenerationResult) {
        self.settled = true;
        self.apply(result);
    }

    fn apply(&self, result: GenerationResult) {
        let notification = match self.widget.upgrade() {
            Some(widget) => {
                let mut state = lock(&widget);
                state.field().finish_generation(result)
            }
            None => {
                // The request cannot be cancelled, so its text still reaches
                // the host.
                tracing::debug!("Generation completed after the widget was dropped");
                match result {
                    Ok(Some(text)) => self.binding.change(text),
                    _ => None,
                }
            }
        };

        if let Some(notification) = notification {
            notification.deliver();
        }
    }
}

impl<W: GenerativeWidget> Drop for Completion<W> {
    fn drop(&mut self) {
        if !self.settled {
            self.apply(abandoned());
        }
    }
}
