use serde::Serialize;

use crate::core::NodeId;
use crate::core::deduce::{IoSpec, deduce};
use crate::core::error::IoError;
use crate::core::options::{Mode, OptionsChain, ResolvedOptions};
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::IoBase;
use crate::widgets::components::choice_set::ChoiceSetIo;
use crate::widgets::components::file::FileIo;
use crate::widgets::components::foreign_key::{ForeignKeyIo, encode_reference};
use crate::widgets::components::picker::RecordPicker;
use crate::widgets::inputs::checkbox::CheckboxIo;
use crate::widgets::inputs::input::InputIo;
use crate::widgets::inputs::radio::RadioIo;
use crate::widgets::inputs::readonly::{PrimaryKeyIo, ReadOnlyIo};
use crate::widgets::inputs::select::SelectIo;
use crate::widgets::inputs::textarea::TextareaIo;
use crate::widgets::inputs::url::UrlIo;
use crate::widgets::traits::{
    CheckResult, DomEvent, EscalatingText, InteractionResult, IoVariant, SourceToggle,
};
use crate::widgets::validators::required_message;

pub const EDITED_ATTR: &str = "data-edited";
pub const EDITED_CLASS: &str = "edited";
const MESSAGE_CLASS: &str = "message";
const NO_SELECTION_MESSAGE: &str = "No record was selected";

pub enum Variant {
    Input(InputIo),
    Checkbox(CheckboxIo),
    Radio(RadioIo),
    ReadOnly(ReadOnlyIo),
    PrimaryKey(PrimaryKeyIo),
    Select(SelectIo),
    Textarea(TextareaIo),
    Url(UrlIo),
    File(FileIo),
    ForeignKey(ForeignKeyIo),
    Choice(ChoiceSetIo),
}

impl Variant {
    pub fn as_dyn(&self) -> &dyn IoVariant {
        match self {
            Self::Input(w) => w,
            Self::Checkbox(w) => w,
            Self::Radio(w) => w,
            Self::ReadOnly(w) => w,
            Self::PrimaryKey(w) => w,
            Self::Select(w) => w,
            Self::Textarea(w) => w,
            Self::Url(w) => w,
            Self::File(w) => w,
            Self::ForeignKey(w) => w,
            Self::Choice(w) => w,
        }
    }

    pub fn as_dyn_mut(&mut self) -> &mut dyn IoVariant {
        match self {
            Self::Input(w) => w,
            Self::Checkbox(w) => w,
            Self::Radio(w) => w,
            Self::ReadOnly(w) => w,
            Self::PrimaryKey(w) => w,
            Self::Select(w) => w,
            Self::Textarea(w) => w,
            Self::Url(w) => w,
            Self::File(w) => w,
            Self::ForeignKey(w) => w,
            Self::Choice(w) => w,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Checkbox(_) => "checkbox",
            Self::Radio(_) => "radio",
            Self::ReadOnly(_) => "read_only",
            Self::PrimaryKey(_) => "primary_key",
            Self::Select(_) => "select",
            Self::Textarea(_) => "textarea",
            Self::Url(_) => "url",
            Self::File(_) => "file",
            Self::ForeignKey(_) => "foreign_key",
            Self::Choice(_) => "choice",
        }
    }
}

/// `[value, entity, column, aliases, database]` row used by label views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLayout(
    pub BasicValue,
    pub String,
    pub String,
    pub Vec<String>,
    pub String,
);

/// A data-entry widget bound to one proxy element.
pub struct Io {
    base: IoBase,
    spec: IoSpec,
    variant: Variant,
}

impl Io {
    /// Build the widget for `proxy`, deducing the variant from the column in
    /// `chain` unless `explicit` names one.
    pub fn build(
        doc: &mut Document,
        proxy: NodeId,
        explicit: Option<IoSpec>,
        chain: OptionsChain<'_>,
    ) -> Result<Self, IoError> {
        let options = chain.resolve();
        let spec = deduce(options.column.as_ref(), explicit)?;
        let base = IoBase::attach(doc, proxy, spec.name(), options)?;

        let variant = match &spec {
            IoSpec::ReadOnly => Variant::ReadOnly(ReadOnlyIo::build(doc, &base)?),
            IoSpec::PrimaryKey => Variant::PrimaryKey(PrimaryKeyIo::build(doc, &base)?),
            IoSpec::ForeignKey { referenced_entity } => Variant::ForeignKey(ForeignKeyIo::build(
                doc,
                &base,
                referenced_entity.clone(),
            )?),
            IoSpec::Checkbox => Variant::Checkbox(CheckboxIo::build(doc, &base)?),
            IoSpec::Textarea => Variant::Textarea(TextareaIo::build(doc, &base)?),
            IoSpec::Input { kind } => Variant::Input(InputIo::build(doc, &base, *kind)?),
            IoSpec::File { kind } => Variant::File(FileIo::build(doc, &base, *kind)?),
            IoSpec::Url => Variant::Url(UrlIo::build(doc, &base)?),
            IoSpec::Select { choices } => {
                Variant::Select(SelectIo::build(doc, &base, choices.clone())?)
            }
            IoSpec::Radio { group, literal } => {
                Variant::Radio(RadioIo::build(doc, &base, group, literal)?)
            }
            IoSpec::Choice { mode, choices } => {
                Variant::Choice(ChoiceSetIo::build(doc, &base, *mode, choices.clone())?)
            }
        };
        base.ensure_error_anchor(doc)?;
        tracing::debug!(proxy = %proxy, io = spec.name(), "widget built");

        Ok(Self {
            base,
            spec,
            variant,
        })
    }

    /// Give an input widget a second field that must repeat the first.
    pub fn with_confirmation(mut self, doc: &mut Document) -> Result<Self, IoError> {
        self.variant = match self.variant {
            Variant::Input(input) => Variant::Input(input.with_confirmation(doc, &self.base)?),
            other => {
                return Err(IoError::Unsupported {
                    operation: "confirmation",
                    variant: other.name(),
                });
            }
        };
        Ok(self)
    }

    pub fn proxy(&self) -> NodeId {
        self.base.proxy()
    }

    pub fn spec(&self) -> &IoSpec {
        &self.spec
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn variant_mut(&mut self) -> &mut Variant {
        &mut self.variant
    }

    pub fn field_name(&self) -> String {
        self.base.field_name()
    }

    pub fn options(&self) -> &ResolvedOptions {
        self.base.options()
    }

    pub fn original_value(&self) -> Option<&BasicValue> {
        self.base.original_value()
    }

    pub fn error_anchor(&self, doc: &Document) -> Option<NodeId> {
        self.base.error_anchor(doc)
    }

    pub fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        self.variant.as_dyn().input_value(doc)
    }

    pub fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        self.variant.as_dyn_mut().set_input_value(doc, value)
    }

    /// Current value with empty text read as null.
    pub fn value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(self.input_value(doc)?.normalized())
    }

    /// Place `value` in the widget and remember it as the value to restore.
    /// A value the variant rejects leaves the widget untouched.
    pub fn commit_value(&mut self, doc: &mut Document, value: BasicValue) -> Result<(), IoError> {
        self.variant.as_dyn_mut().set_input_value(doc, &value)?;
        self.base.set_original_value(value);
        self.update_outputs(doc)
    }

    pub fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        self.variant.as_dyn().update_outputs(doc)
    }

    pub fn restore(&mut self, doc: &mut Document) -> Result<(), IoError> {
        let original = self
            .base
            .original_value()
            .cloned()
            .ok_or(IoError::NothingToRestore(self.proxy()))?;
        self.commit_value(doc, original)
    }

    /// Flag this widget, and the primary key of its record, as edited.
    pub fn mark_as_edited(
        &self,
        doc: &mut Document,
        primary_key: Option<NodeId>,
    ) -> Result<(), IoError> {
        for proxy in std::iter::once(self.proxy()).chain(primary_key) {
            doc.require(proxy, "proxy")?;
            doc.set_attr(proxy, EDITED_ATTR, "true");
            doc.add_class(proxy, EDITED_CLASS);
        }
        self.update_outputs(doc)
    }

    pub fn is_edited(&self, doc: &Document) -> bool {
        doc.attr(self.proxy(), EDITED_ATTR).is_some()
    }

    /// Validate the current value, writing any message into the error node.
    pub fn check_input(&self, doc: &mut Document) -> Result<CheckResult, IoError> {
        let result = match self.value(doc) {
            Ok(value) if value.is_null() => {
                if self.base.is_required() {
                    CheckResult::Invalid(required_message(self.base.label()))
                } else {
                    CheckResult::Valid(value)
                }
            }
            Ok(value) => match self.variant.as_dyn().validate(doc, &value) {
                Ok(()) => CheckResult::Valid(value),
                Err(message) => CheckResult::Invalid(message),
            },
            Err(IoError::AmbiguousChoice(count)) => {
                CheckResult::Invalid(format!("Only one choice may be selected, {count} are"))
            }
            Err(error) => return Err(error),
        };
        self.report(doc, result.message())?;
        Ok(result)
    }

    fn report(&self, doc: &mut Document, message: Option<&str>) -> Result<(), IoError> {
        let anchor = self.base.ensure_error_anchor(doc)?;
        let stale = doc.children(anchor).to_vec();
        for child in stale {
            doc.remove(child);
        }
        if let Some(message) = message {
            let span = doc.create_element(anchor, "span", &[("class", MESSAGE_CLASS)])?;
            doc.set_text(span, message);
        }
        Ok(())
    }

    pub fn label_layout(&self, doc: &Document, aliases: &[String]) -> Result<LabelLayout, IoError> {
        let column = self.base.column().ok_or(IoError::UnboundColumn)?;
        Ok(LabelLayout(
            self.value(doc)?,
            column.entity.name.clone(),
            column.name.clone(),
            aliases.to_vec(),
            column.entity.dbase.name.clone(),
        ))
    }

    pub fn mode(&self) -> Mode {
        self.base.options().mode
    }

    pub fn set_mode(&mut self, doc: &mut Document, mode: Mode) {
        doc.set_attr(self.proxy(), "data-mode", mode.as_str());
        self.base.options_mut().mode = mode;
    }

    pub fn on_event(&mut self, doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        self.variant.as_dyn_mut().on_event(doc, event)
    }

    /// Let the user choose a record for a foreign-key widget.
    ///
    /// Without a selection the picker stays open and the message lands in the
    /// error node; a selection is committed and the picker is closed.
    pub async fn pick<P: RecordPicker>(
        &mut self,
        doc: &mut Document,
        picker: &mut P,
    ) -> Result<CheckResult, IoError> {
        if !matches!(self.variant, Variant::ForeignKey(_)) {
            return Err(IoError::Unsupported {
                operation: "pick",
                variant: self.variant.name(),
            });
        }

        picker.show().await;
        let Some((pk, friendly)) = picker.selection() else {
            tracing::debug!(proxy = %self.proxy(), "picker closed without a selection");
            self.report(doc, Some(NO_SELECTION_MESSAGE))?;
            return Ok(CheckResult::Invalid(NO_SELECTION_MESSAGE.to_string()));
        };

        self.commit_value(doc, BasicValue::Text(encode_reference(pk, &friendly)))?;
        picker.close();
        self.report(doc, None)?;
        tracing::debug!(proxy = %self.proxy(), pk, "record picked");
        Ok(CheckResult::Valid(self.value(doc)?))
    }

    pub fn escalating_mut(&mut self) -> Option<&mut dyn EscalatingText> {
        match &mut self.variant {
            Variant::Textarea(textarea) => Some(textarea),
            _ => None,
        }
    }

    pub fn source_toggle_mut(&mut self) -> Option<&mut dyn SourceToggle> {
        match &mut self.variant {
            Variant::File(file) => Some(file),
            _ => None,
        }
    }
}
