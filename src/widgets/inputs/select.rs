use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, InteractionResult, Interactive,
};
use crate::widgets::validators::{Validator, one_of, run_validators};

/// Chooser over a fixed list of literals, usually parsed from an enum column.
pub struct SelectIo {
    options: Vec<String>,
    field: NodeId,
    output: NodeId,
    validators: Vec<Validator>,
}

impl SelectIo {
    pub fn build(doc: &mut Document, base: &IoBase, options: Vec<String>) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let output = doc.create_element(proxy, "span", &[("class", NORMAL_CLASS)])?;
        let field = doc.create_element(proxy, "select", &[("class", EDIT_CLASS)])?;
        base.apply_control_attrs(doc, field);

        let placeholder = doc.create_element(field, "option", &[("value", "")])?;
        doc.set_text(placeholder, "");
        for option in &options {
            let node = doc.create_element(field, "option", &[("value", option.as_str())])?;
            doc.set_text(node, option.clone());
        }

        Ok(Self {
            validators: vec![one_of(options.clone())],
            options,
            field,
            output,
        })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn field(&self) -> NodeId {
        self.field
    }

    pub fn output(&self) -> NodeId {
        self.output
    }
}

impl Editable for SelectIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(BasicValue::Text(doc.value(self.field).to_string()))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        let literal = value.to_text_scalar();
        if !literal.is_empty() && !self.options.contains(&literal) {
            return Err(IoError::UnknownChoice(literal));
        }
        doc.set_value(self.field, literal);
        Ok(())
    }
}

impl Displayable for SelectIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let literal = doc.value(self.field).to_string();
        doc.set_text(self.output, literal);
        Ok(())
    }
}

impl Interactive for SelectIo {
    fn on_event(&mut self, _doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        if event.target != self.field {
            return Ok(InteractionResult::ignored());
        }
        Ok(match event.kind {
            EventKind::Change => InteractionResult::edited(),
            EventKind::Input(_) => InteractionResult::handled(),
            _ => InteractionResult::ignored(),
        })
    }

    fn validate(&self, _doc: &Document, value: &BasicValue) -> Result<(), String> {
        run_validators(&self.validators, &value.to_text_scalar())
    }
}

#[cfg(test)]
mod tests {
    use super::SelectIo;
    use crate::core::column::parse_enum_declaration;
    use crate::core::error::IoError;
    use crate::core::options::ResolvedOptions;
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::base::IoBase;
    use crate::widgets::traits::{Editable, Interactive};

    fn setup() -> (Document, SelectIo) {
        let mut doc = Document::new();
        let root = doc.root();
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        let base = IoBase::attach(&mut doc, proxy, "select", ResolvedOptions::default())
            .expect("base");
        let options = parse_enum_declaration("enum('low','high')").expect("enum");
        let select = SelectIo::build(&mut doc, &base, options).expect("select");
        (doc, select)
    }

    #[test]
    fn renders_an_option_per_literal() {
        let (doc, select) = setup();
        let values: Vec<&str> = doc
            .children(select.field())
            .iter()
            .filter_map(|option| doc.attr(*option, "value"))
            .collect();
        assert_eq!(values, vec!["", "low", "high"]);
    }

    #[test]
    fn unknown_literals_are_rejected_without_change() {
        let (mut doc, mut select) = setup();
        select.set_input_value(&mut doc, &BasicValue::from("high")).expect("set");
        assert!(matches!(
            select.set_input_value(&mut doc, &BasicValue::from("medium")),
            Err(IoError::UnknownChoice(_))
        ));
        assert_eq!(select.input_value(&doc).expect("value"), BasicValue::from("high"));
    }

    #[test]
    fn typed_values_outside_the_list_fail_validation() {
        let (doc, select) = setup();
        assert!(select.validate(&doc, &BasicValue::from("low")).is_ok());
        assert!(select.validate(&doc, &BasicValue::from("other")).is_err());
    }
}
