use crate::core::NodeId;
use crate::core::deduce::ChoiceMode;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, InteractionResult, Interactive,
};

/// Group of sibling toggles sharing one field name.
///
/// Multiple mode encodes the checked literals as a JSON list, in the order
/// they were committed or clicked; single mode yields the one checked
/// literal. No checked toggle reads as empty.
pub struct ChoiceSetIo {
    mode: ChoiceMode,
    name: String,
    toggles: Vec<(String, NodeId)>,
    selection: Vec<String>,
    output: NodeId,
}

impl ChoiceSetIo {
    pub fn build(
        doc: &mut Document,
        base: &IoBase,
        mode: ChoiceMode,
        choices: Vec<String>,
    ) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let name = base.field_name();
        let input_type = match mode {
            ChoiceMode::Single => "radio",
            ChoiceMode::Multiple => "checkbox",
        };

        let output = doc.create_element(proxy, "span", &[("class", NORMAL_CLASS)])?;
        let mut toggles = Vec::with_capacity(choices.len());
        for literal in choices {
            let label = doc.create_element(proxy, "label", &[("class", EDIT_CLASS)])?;
            let toggle = doc.create_element(
                label,
                "input",
                &[
                    ("type", input_type),
                    ("name", name.as_str()),
                    ("value", literal.as_str()),
                ],
            )?;
            base.apply_control_attrs(doc, toggle);
            doc.set_text(label, literal.clone());
            toggles.push((literal, toggle));
        }

        Ok(Self {
            mode,
            name,
            toggles,
            selection: Vec::new(),
            output,
        })
    }

    pub fn mode(&self) -> ChoiceMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn toggle(&self, literal: &str) -> Option<NodeId> {
        self.toggles
            .iter()
            .find(|(candidate, _)| candidate == literal)
            .map(|(_, node)| *node)
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Checked literals in selection order. Toggles checked behind the
    /// widget's back follow in document order.
    pub fn checked(&self, doc: &Document) -> Vec<String> {
        let is_checked =
            |literal: &str| self.toggle(literal).is_some_and(|node| doc.checked(node));
        let mut out: Vec<String> = self
            .selection
            .iter()
            .filter(|literal| is_checked(literal.as_str()))
            .cloned()
            .collect();
        for (literal, node) in &self.toggles {
            if doc.checked(*node) && !out.contains(literal) {
                out.push(literal.clone());
            }
        }
        out
    }

    fn check_only(&mut self, doc: &mut Document, literals: &[String]) {
        for (literal, node) in &self.toggles {
            doc.set_checked(*node, literals.contains(literal));
        }
        self.selection = literals.to_vec();
    }

    /// Decode a transported value into the literals it selects.
    fn decode(&self, value: &BasicValue) -> Result<Vec<String>, IoError> {
        let raw = match value {
            BasicValue::Null => return Ok(Vec::new()),
            BasicValue::Bool(_) => return Err(IoError::invalid_value("choice", value)),
            other => other.to_text_scalar(),
        };
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let literals = match self.mode {
            ChoiceMode::Single => vec![raw],
            ChoiceMode::Multiple => serde_json::from_str::<Vec<String>>(&raw)
                .map_err(|source| IoError::decode("choice list", raw.as_str(), source))?,
        };
        for (idx, literal) in literals.iter().enumerate() {
            if self.toggle(literal).is_none() {
                return Err(IoError::UnknownChoice(literal.clone()));
            }
            if literals[..idx].contains(literal) {
                return Err(IoError::invalid_value("choice", format!("repeated {literal:?}")));
            }
        }
        Ok(literals)
    }
}

/// JSON list encoding used by multiple-choice sets. An empty list is empty.
pub fn encode_choices(literals: &[String]) -> String {
    if literals.is_empty() {
        return String::new();
    }
    serde_json::Value::from(literals.to_vec()).to_string()
}

impl Editable for ChoiceSetIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        let checked = self.checked(doc);
        match self.mode {
            ChoiceMode::Multiple => Ok(BasicValue::Text(encode_choices(&checked))),
            ChoiceMode::Single => match checked.as_slice() {
                [] => Ok(BasicValue::Text(String::new())),
                [one] => Ok(BasicValue::Text(one.clone())),
                many => Err(IoError::AmbiguousChoice(many.len())),
            },
        }
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        let literals = self.decode(value)?;
        self.check_only(doc, &literals);
        Ok(())
    }
}

impl Displayable for ChoiceSetIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let shown = self.checked(doc).join(", ");
        doc.set_text(self.output, shown);
        Ok(())
    }
}

impl Interactive for ChoiceSetIo {
    fn on_event(&mut self, doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        let Some((literal, node)) = self
            .toggles
            .iter()
            .find(|(_, node)| *node == event.target)
            .cloned()
        else {
            return Ok(InteractionResult::ignored());
        };

        match event.kind {
            EventKind::Click => {
                match self.mode {
                    ChoiceMode::Single => self.check_only(doc, &[literal]),
                    ChoiceMode::Multiple => {
                        let checked = !doc.checked(node);
                        doc.set_checked(node, checked);
                        self.selection.retain(|selected| *selected != literal);
                        if checked {
                            self.selection.push(literal);
                        }
                    }
                }
                Ok(InteractionResult::edited())
            }
            EventKind::Change => Ok(InteractionResult::edited()),
            _ => Ok(InteractionResult::ignored()),
        }
    }
}
