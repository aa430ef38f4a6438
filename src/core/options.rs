//! Widget options and their inheritance chain.
//!
//! A widget looks options up along its ownership chain (widget, parent view,
//! ...). The chain is flattened once at construction into [`ResolvedOptions`].

use crate::core::column::ColumnMetadata;
use crate::core::value::BasicValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Edit,
    #[default]
    Normal,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Normal => "normal",
        }
    }
}

/// One link of the option chain. Unset fields inherit from the next link.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IoOptions {
    pub required: Option<bool>,
    pub label: Option<String>,
    pub column: Option<ColumnMetadata>,
    pub size: Option<u32>,
    pub maxlength: Option<u32>,
    pub disabled: Option<bool>,
    pub mode: Option<Mode>,
}

impl IoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, column: ColumnMetadata) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_maxlength(mut self, maxlength: u32) -> Self {
        self.maxlength = Some(maxlength);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Read-only ownership chain, nearest scope first.
#[derive(Debug, Clone, Copy)]
pub struct OptionsChain<'a> {
    scopes: &'a [IoOptions],
}

impl<'a> OptionsChain<'a> {
    pub fn new(scopes: &'a [IoOptions]) -> Self {
        Self { scopes }
    }

    pub fn scopes(&self) -> &'a [IoOptions] {
        self.scopes
    }

    fn first<T>(&self, pick: impl Fn(&'a IoOptions) -> Option<T>) -> Option<T> {
        self.scopes.iter().find_map(pick)
    }

    /// Inherited scalar option by key; `column` is not a scalar and is never
    /// returned here.
    pub fn lookup(&self, key: &str) -> Option<BasicValue> {
        match key {
            "required" => self.first(|o| o.required).map(BasicValue::Bool),
            "label" => self.first(|o| o.label.clone()).map(BasicValue::Text),
            "size" => self.first(|o| o.size).map(|n| BasicValue::Number(n.into())),
            "maxlength" => self
                .first(|o| o.maxlength)
                .map(|n| BasicValue::Number(n.into())),
            "disabled" => self.first(|o| o.disabled).map(BasicValue::Bool),
            "mode" => self
                .first(|o| o.mode)
                .map(|mode| BasicValue::from(mode.as_str())),
            _ => None,
        }
    }

    pub fn resolve(&self) -> ResolvedOptions {
        ResolvedOptions {
            required: self.first(|o| o.required).unwrap_or(true),
            label: self.first(|o| o.label.clone()),
            column: self.first(|o| o.column.clone()),
            size: self.first(|o| o.size),
            maxlength: self.first(|o| o.maxlength),
            disabled: self.first(|o| o.disabled).unwrap_or(false),
            mode: self.first(|o| o.mode).unwrap_or_default(),
        }
    }
}

/// Snapshot of the chain taken at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Fields are mandatory unless explicitly opted out.
    pub required: bool,
    pub label: Option<String>,
    pub column: Option<ColumnMetadata>,
    pub size: Option<u32>,
    pub maxlength: Option<u32>,
    pub disabled: bool,
    pub mode: Mode,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        OptionsChain::new(&[]).resolve()
    }
}

impl ResolvedOptions {
    /// Label to show: explicit label, else the column name.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.column.as_ref().map(|c| c.name.as_str()))
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::{IoOptions, Mode, OptionsChain};
    use crate::core::column::ColumnMetadata;
    use crate::core::value::BasicValue;

    #[test]
    fn nearest_scope_wins_and_unset_inherits() {
        let scopes = vec![
            IoOptions::new().with_label("Price"),
            IoOptions::new()
                .with_label("View label")
                .with_required(false)
                .with_mode(Mode::Edit),
        ];
        let resolved = OptionsChain::new(&scopes).resolve();
        assert_eq!(resolved.label.as_deref(), Some("Price"));
        assert!(!resolved.required);
        assert_eq!(resolved.mode, Mode::Edit);
    }

    #[test]
    fn required_defaults_to_true() {
        let resolved = OptionsChain::new(&[IoOptions::new()]).resolve();
        assert!(resolved.required);
        assert!(!resolved.disabled);
        assert_eq!(resolved.mode, Mode::Normal);
    }

    #[test]
    fn lookup_walks_the_chain_without_mutating_it() {
        let scopes = vec![IoOptions::new(), IoOptions::new().with_maxlength(12)];
        let chain = OptionsChain::new(&scopes);
        assert_eq!(chain.lookup("maxlength"), Some(BasicValue::Number(12.0)));
        assert_eq!(chain.lookup("size"), None);
        assert_eq!(chain.lookup("column"), None);
        assert_eq!(scopes[0], IoOptions::new());
    }

    #[test]
    fn display_label_falls_back_to_column_name() {
        let scopes = vec![IoOptions::new().with_column(ColumnMetadata::new("price", "decimal", 10))];
        assert_eq!(OptionsChain::new(&scopes).resolve().display_label(), "price");
    }
}
