use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, InteractionResult, Interactive,
};

/// Boolean toggle stored as 1/0 so it can be written to the database as is.
/// A checkbox that was never set (or set to null) is indeterminate.
pub struct CheckboxIo {
    field: NodeId,
    output: NodeId,
}

impl CheckboxIo {
    pub fn build(doc: &mut Document, base: &IoBase) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let output = doc.create_element(
            proxy,
            "input",
            &[("class", NORMAL_CLASS), ("type", "checkbox"), ("disabled", "")],
        )?;
        let field = doc.create_element(
            proxy,
            "input",
            &[("class", EDIT_CLASS), ("type", "checkbox")],
        )?;
        base.apply_control_attrs(doc, field);
        doc.set_indeterminate(field);
        doc.set_indeterminate(output);
        Ok(Self { field, output })
    }

    pub fn field(&self) -> NodeId {
        self.field
    }

    pub fn output(&self) -> NodeId {
        self.output
    }
}

impl Editable for CheckboxIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        if doc.indeterminate(self.field) {
            return Ok(BasicValue::Null);
        }
        let flag = if doc.checked(self.field) { 1.0 } else { 0.0 };
        Ok(BasicValue::Number(flag))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        if value.is_null() || value.as_text() == Some("") {
            doc.set_indeterminate(self.field);
            return Ok(());
        }
        let Some(flag) = value.to_bool() else {
            return Err(IoError::invalid_value("checkbox", value));
        };
        doc.set_checked(self.field, flag);
        Ok(())
    }
}

impl Displayable for CheckboxIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        if doc.indeterminate(self.field) {
            doc.set_indeterminate(self.output);
        } else {
            let checked = doc.checked(self.field);
            doc.set_checked(self.output, checked);
        }
        Ok(())
    }
}

impl Interactive for CheckboxIo {
    fn on_event(&mut self, doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        if event.target != self.field {
            return Ok(InteractionResult::ignored());
        }
        match event.kind {
            EventKind::Click => {
                let checked = doc.checked(self.field);
                doc.set_checked(self.field, !checked);
                Ok(InteractionResult::edited())
            }
            EventKind::Change => Ok(InteractionResult::edited()),
            _ => Ok(InteractionResult::ignored()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CheckboxIo;
    use crate::core::error::IoError;
    use crate::core::options::ResolvedOptions;
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::base::IoBase;
    use crate::widgets::traits::{Displayable, DomEvent, Editable, Interactive};

    fn setup() -> (Document, CheckboxIo) {
        let mut doc = Document::new();
        let root = doc.root();
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        let base = IoBase::attach(&mut doc, proxy, "checkbox", ResolvedOptions::default())
            .expect("base");
        let checkbox = CheckboxIo::build(&mut doc, &base).expect("checkbox");
        (doc, checkbox)
    }

    #[test]
    fn starts_unset_and_reads_numeric_flags() {
        let (mut doc, mut checkbox) = setup();
        assert_eq!(checkbox.input_value(&doc).expect("value"), BasicValue::Null);

        checkbox
            .set_input_value(&mut doc, &BasicValue::Bool(true))
            .expect("set");
        assert_eq!(checkbox.input_value(&doc).expect("value"), BasicValue::Number(1.0));

        checkbox.set_input_value(&mut doc, &BasicValue::from("0")).expect("set");
        assert_eq!(checkbox.input_value(&doc).expect("value"), BasicValue::Number(0.0));
    }

    #[test]
    fn rejects_non_boolean_text() {
        let (mut doc, mut checkbox) = setup();
        assert!(matches!(
            checkbox.set_input_value(&mut doc, &BasicValue::from("maybe")),
            Err(IoError::InvalidValue { .. })
        ));
        assert_eq!(checkbox.input_value(&doc).expect("value"), BasicValue::Null);
    }

    #[test]
    fn click_toggles_and_output_mirrors() {
        let (mut doc, mut checkbox) = setup();
        let field = checkbox.field();
        checkbox.on_event(&mut doc, &DomEvent::click(field)).expect("click");
        checkbox.update_outputs(&mut doc).expect("outputs");
        assert!(doc.checked(checkbox.output()));
        assert!(!doc.indeterminate(checkbox.output()));
    }
}
