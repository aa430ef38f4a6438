use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, InteractionResult, Interactive,
};

/// One radio button of a named group. Its value is the literal it stands for;
/// the checked state belongs to the user and is only changed by activation.
pub struct RadioIo {
    group: String,
    field: NodeId,
    output: NodeId,
}

impl RadioIo {
    pub fn build(doc: &mut Document, base: &IoBase, group: &str, literal: &str) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let group = if group.is_empty() {
            base.field_name()
        } else {
            group.to_string()
        };
        let output = doc.create_element(
            proxy,
            "input",
            &[
                ("class", NORMAL_CLASS),
                ("type", "radio"),
                ("disabled", ""),
                ("value", literal),
            ],
        )?;
        let field = doc.create_element(
            proxy,
            "input",
            &[
                ("class", EDIT_CLASS),
                ("type", "radio"),
                ("name", group.as_str()),
                ("value", literal),
            ],
        )?;
        base.apply_control_attrs(doc, field);
        Ok(Self {
            group,
            field,
            output,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn field(&self) -> NodeId {
        self.field
    }

    pub fn is_checked(&self, doc: &Document) -> bool {
        doc.checked(self.field)
    }

    /// Check this button and clear every other button of the same group.
    fn activate(&self, doc: &mut Document) {
        let root = doc.root();
        let siblings: Vec<NodeId> = doc
            .descendants(root)
            .into_iter()
            .filter(|node| {
                *node != self.field
                    && doc.tag(*node) == "input"
                    && doc.attr(*node, "type") == Some("radio")
                    && doc.attr(*node, "name") == Some(self.group.as_str())
            })
            .collect();
        for sibling in siblings {
            doc.set_checked(sibling, false);
        }
        doc.set_checked(self.field, true);
    }
}

impl Editable for RadioIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(BasicValue::Text(doc.value(self.field).to_string()))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        let literal = value.to_text_scalar();
        doc.set_attr(self.field, "value", literal.clone());
        doc.set_value(self.field, literal);
        Ok(())
    }
}

impl Displayable for RadioIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let literal = doc.value(self.field).to_string();
        let checked = doc.checked(self.field);
        doc.set_attr(self.output, "value", literal.clone());
        doc.set_value(self.output, literal);
        doc.set_checked(self.output, checked);
        Ok(())
    }
}

impl Interactive for RadioIo {
    fn on_event(&mut self, doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        if event.target != self.field {
            return Ok(InteractionResult::ignored());
        }
        match event.kind {
            EventKind::Click => {
                self.activate(doc);
                Ok(InteractionResult::edited())
            }
            EventKind::Change => Ok(InteractionResult::edited()),
            _ => Ok(InteractionResult::ignored()),
        }
    }
}
