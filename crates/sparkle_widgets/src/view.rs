//! Render models
//!
//! Widgets are headless. Each `view()` call returns a snapshot of what a
//! renderer should draw, computed from the widget state and the host's
//! current value at the time of the call.

use sparkle_animation::AccentFrame;

/// Icon shown on the generate button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonIcon {
    /// Idle
    #[default]
    Sparkles,
    /// Generation in flight
    Spinner,
}

/// The AI generate button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerateButton {
    pub icon: ButtonIcon,
    /// False while busy or disabled
    pub enabled: bool,
    /// True while the accent is shown
    pub highlighted: bool,
    /// Clicking opens the action menu instead of generating directly
    pub opens_menu: bool,
}

/// Parts every variant renders
#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    /// Text shown in the input
    pub text: String,
    pub placeholder: String,
    pub disabled: bool,
    pub button: GenerateButton,
    pub undo_visible: bool,
    /// Present while a generation is in flight
    pub accent: Option<AccentFrame>,
}

impl FieldView {
    pub fn is_accented(&self) -> bool {
        self.accent.is_some()
    }

    /// The regular border is hidden while the accent is drawn in its place
    pub fn border_visible(&self) -> bool {
        !self.is_accented()
    }

    /// Show the placeholder instead of the text
    pub fn shows_placeholder(&self) -> bool {
        self.text.is_empty()
    }
}

/// A row in the textbox's action menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRow {
    pub label: String,
    pub value: String,
}

/// A row in the selector's dropdown
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRow {
    pub value: String,
    pub label: String,
    /// Check mark: the row's value equals the host value
    pub selected: bool,
}

/// Render model for [`AiTextbox`](crate::AiTextbox)
#[derive(Clone, Debug, PartialEq)]
pub struct TextboxView {
    pub field: FieldView,
    /// Present while the action menu is open
    pub action_menu: Option<Vec<ActionRow>>,
}

/// Render model for [`AiTextarea`](crate::AiTextarea)
#[derive(Clone, Debug, PartialEq)]
pub struct TextareaView {
    pub field: FieldView,
    /// Lines in the current text (at least 1)
    pub line_count: usize,
    /// Minimum visible height in logical pixels
    pub min_height: f32,
}

/// Render model for [`AiCombobox`](crate::AiCombobox)
#[derive(Clone, Debug, PartialEq)]
pub struct ComboboxView {
    pub field: FieldView,
    /// Present only while open with at least one visible option
    pub dropdown: Option<Vec<OptionRow>>,
}
