use crate::core::NodeId;
use crate::core::deduce::InputKind;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, InteractionResult, Interactive,
};
use crate::widgets::validators::{self, Validator, run_validators};

/// Single field editor for text, numbers, dates and emails.
pub struct InputIo {
    kind: InputKind,
    field: NodeId,
    output: NodeId,
    confirm: Option<NodeId>,
    validators: Vec<Validator>,
}

impl InputIo {
    pub fn build(doc: &mut Document, base: &IoBase, kind: InputKind) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let output = doc.create_element(proxy, "span", &[("class", NORMAL_CLASS)])?;
        let field = doc.create_element(
            proxy,
            "input",
            &[("class", EDIT_CLASS), ("type", kind.html_type())],
        )?;
        base.apply_control_attrs(doc, field);

        let mut checks = Vec::new();
        if let Some(maxlength) = base.options().maxlength {
            checks.push(validators::max_length(maxlength as usize));
        }
        match kind {
            InputKind::Number => checks.push(validators::numeric()),
            InputKind::Email => checks.push(validators::email()),
            _ => {}
        }

        Ok(Self {
            kind,
            field,
            output,
            confirm: None,
            validators: checks,
        })
    }

    /// Add a second field that must repeat the first one.
    pub fn with_confirmation(mut self, doc: &mut Document, base: &IoBase) -> Result<Self, IoError> {
        let confirm = doc.create_element(
            base.proxy(),
            "input",
            &[
                ("class", "edit confirm"),
                ("type", self.kind.html_type()),
            ],
        )?;
        base.apply_control_attrs(doc, confirm);
        let current = doc.value(self.field).to_string();
        doc.set_value(confirm, current);
        self.confirm = Some(confirm);
        Ok(self)
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn field(&self) -> NodeId {
        self.field
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn confirm(&self) -> Option<NodeId> {
        self.confirm
    }

    pub fn owns(&self, node: NodeId) -> bool {
        node == self.field || Some(node) == self.confirm
    }
}

impl Editable for InputIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(BasicValue::Text(doc.value(self.field).to_string()))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        let text = value.to_text_scalar();
        if let Some(confirm) = self.confirm {
            doc.set_value(confirm, text.clone());
        }
        doc.set_value(self.field, text);
        Ok(())
    }
}

impl Displayable for InputIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let text = doc.value(self.field).to_string();
        doc.set_text(self.output, text);
        Ok(())
    }
}

impl Interactive for InputIo {
    fn on_event(&mut self, _doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        if !self.owns(event.target) {
            return Ok(InteractionResult::ignored());
        }
        Ok(match event.kind {
            EventKind::Change | EventKind::Blur => InteractionResult::edited(),
            EventKind::Input(_) => InteractionResult::handled(),
            EventKind::Click => InteractionResult::ignored(),
        })
    }

    fn validate(&self, doc: &Document, value: &BasicValue) -> Result<(), String> {
        run_validators(&self.validators, &value.to_text_scalar())?;
        if let Some(confirm) = self.confirm
            && doc.value(confirm) != doc.value(self.field)
        {
            return Err("The two values do not match".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InputIo;
    use crate::core::deduce::InputKind;
    use crate::core::options::{IoOptions, OptionsChain};
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::base::IoBase;
    use crate::widgets::traits::{Displayable, DomEvent, Editable, IoAction, Interactive};

    fn setup(kind: InputKind, options: IoOptions) -> (Document, IoBase, InputIo) {
        let mut doc = Document::new();
        let root = doc.root();
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        let scopes = [options];
        let base = IoBase::attach(&mut doc, proxy, "input", OptionsChain::new(&scopes).resolve())
            .expect("base");
        let input = InputIo::build(&mut doc, &base, kind).expect("input");
        (doc, base, input)
    }

    #[test]
    fn reflects_options_on_the_field() {
        let (doc, _, input) = setup(
            InputKind::Number,
            IoOptions::new().with_size(8).with_maxlength(5).with_disabled(true),
        );
        assert_eq!(doc.attr(input.field(), "type"), Some("number"));
        assert_eq!(doc.attr(input.field(), "size"), Some("8"));
        assert_eq!(doc.attr(input.field(), "maxlength"), Some("5"));
        assert_eq!(doc.attr(input.field(), "disabled"), Some(""));
    }

    #[test]
    fn update_outputs_copies_the_field_text() {
        let (mut doc, _, mut input) = setup(InputKind::Text, IoOptions::new());
        input
            .set_input_value(&mut doc, &BasicValue::from("hello"))
            .expect("set");
        input.update_outputs(&mut doc).expect("outputs");
        input.update_outputs(&mut doc).expect("outputs");
        assert_eq!(doc.text(input.output()), "hello");
    }

    #[test]
    fn numeric_and_length_validation() {
        let (doc, _, input) = setup(InputKind::Number, IoOptions::new().with_maxlength(4));
        assert!(input.validate(&doc, &BasicValue::from("12.5")).is_ok());
        assert!(input.validate(&doc, &BasicValue::from("abc")).is_err());
        assert!(input.validate(&doc, &BasicValue::from("12345")).is_err());
    }

    #[test]
    fn confirmation_mismatch_is_reported() {
        let (mut doc, base, input) = setup(InputKind::Text, IoOptions::new());
        let mut input = input.with_confirmation(&mut doc, &base).expect("confirm");
        input
            .set_input_value(&mut doc, &BasicValue::from("secret"))
            .expect("set");
        assert!(input.validate(&doc, &BasicValue::from("secret")).is_ok());

        let confirm = input.confirm().expect("confirm field");
        doc.set_value(confirm, "secre");
        assert_eq!(
            input.validate(&doc, &BasicValue::from("secret")),
            Err("The two values do not match".to_string())
        );
    }

    #[test]
    fn change_and_blur_confirm_an_edit() {
        let (mut doc, _, mut input) = setup(InputKind::Text, IoOptions::new());
        let field = input.field();
        let result = input.on_event(&mut doc, &DomEvent::change(field)).expect("event");
        assert!(result.has(&IoAction::Edited));
        let result = input.on_event(&mut doc, &DomEvent::input(field, "x")).expect("event");
        assert!(result.handled && result.actions.is_empty());
    }
}
