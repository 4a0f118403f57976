//! Option filtering and selection state for the searchable selector
//!
//! The filter keeps the free-text query and the open flag. The visible
//! options are derived on every call from the query and the host's option
//! set: a case-insensitive substring match on labels, in host order, with no
//! result limit.

use std::sync::Arc;

/// A selectable option
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Stored in the host value when selected
    pub value: String,
    /// Shown in the dropdown and in the closed input; used for filtering
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Check if this option matches a search query (case-insensitive, label only)
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.label.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Query and open state for a selector
#[derive(Clone, Debug)]
pub struct OptionFilter {
    options: Arc<[SelectOption]>,
    search: String,
    open: bool,
}

impl OptionFilter {
    pub fn new(options: impl Into<Arc<[SelectOption]>>) -> Self {
        Self {
            options: options.into(),
            search: String::new(),
            open: false,
        }
    }

    /// Replace the host's option set
    pub fn set_options(&mut self, options: impl Into<Arc<[SelectOption]>>) {
        self.options = options.into();
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Options matching the current query, in host order
    pub fn visible_options(&self) -> Vec<&SelectOption> {
        self.options
            .iter()
            .filter(|option| option.matches(&self.search))
            .collect()
    }

    /// The option whose value equals `value`
    pub fn selected<'a>(&'a self, value: &str) -> Option<&'a SelectOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Text shown in the input: the raw query while open, otherwise the
    /// selected option's label (empty when nothing matches)
    pub fn display_text(&self, value: &str) -> String {
        if self.open {
            self.search.clone()
        } else {
            self.selected(value)
                .map(|option| option.label.clone())
                .unwrap_or_default()
        }
    }
}
