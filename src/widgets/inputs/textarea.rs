use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EscalatingText, EscalationState, EventKind, InteractionResult,
    Interactive, IoAction,
};
use crate::widgets::validators::{Validator, max_length, run_validators};

pub const DEFAULT_ESCALATION_THRESHOLD: usize = 50;

/// Single-line input that promotes itself to a text area.
///
/// Starts in input mode. Activating the input, or typing past the threshold,
/// switches to textarea mode; losing focus in the textarea copies its content
/// back into the input and switches back. After every transition both
/// elements hold the same text.
pub struct TextareaIo {
    state: EscalationState,
    field: NodeId,
    area: NodeId,
    output: NodeId,
    escalate_on_click: bool,
    threshold: Option<usize>,
    validators: Vec<Validator>,
}

impl TextareaIo {
    pub fn build(doc: &mut Document, base: &IoBase) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let output = doc.create_element(proxy, "div", &[("class", NORMAL_CLASS)])?;
        let field = doc.create_element(
            proxy,
            "input",
            &[("class", EDIT_CLASS), ("type", "text")],
        )?;
        let area = doc.create_element(proxy, "textarea", &[("class", EDIT_CLASS)])?;
        base.apply_control_attrs(doc, field);
        base.apply_control_attrs(doc, area);
        doc.set_hidden(area, true);

        let mut validators = Vec::new();
        if let Some(limit) = base.options().maxlength {
            validators.push(max_length(limit as usize));
        }

        Ok(Self {
            state: EscalationState::InputMode,
            field,
            area,
            output,
            escalate_on_click: true,
            threshold: Some(DEFAULT_ESCALATION_THRESHOLD),
            validators,
        })
    }

    pub fn with_threshold(mut self, threshold: Option<usize>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_escalate_on_click(mut self, enabled: bool) -> Self {
        self.escalate_on_click = enabled;
        self
    }

    pub fn field(&self) -> NodeId {
        self.field
    }

    pub fn area(&self) -> NodeId {
        self.area
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    fn active(&self) -> NodeId {
        match self.state {
            EscalationState::InputMode => self.field,
            EscalationState::TextareaMode => self.area,
        }
    }

    fn exceeds_threshold(&self, text: &str) -> bool {
        self.threshold
            .is_some_and(|threshold| text.chars().count() > threshold)
    }
}

impl EscalatingText for TextareaIo {
    fn escalation_state(&self) -> EscalationState {
        self.state
    }

    fn escalate(&mut self, doc: &mut Document) {
        if self.state == EscalationState::TextareaMode {
            return;
        }
        let text = doc.value(self.field).to_string();
        doc.set_value(self.area, text);
        doc.set_hidden(self.field, true);
        doc.set_hidden(self.area, false);
        self.state = EscalationState::TextareaMode;
        tracing::debug!(field = %self.field, "escalated to textarea");
    }

    fn collapse(&mut self, doc: &mut Document) {
        if self.state == EscalationState::InputMode {
            return;
        }
        let text = doc.value(self.area).to_string();
        doc.set_value(self.field, text);
        doc.set_hidden(self.field, false);
        doc.set_hidden(self.area, true);
        self.state = EscalationState::InputMode;
        tracing::debug!(field = %self.field, "collapsed to input");
    }
}

impl Editable for TextareaIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(BasicValue::Text(doc.value(self.active()).to_string()))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        let text = value.to_text_scalar();
        doc.set_value(self.area, text.clone());
        doc.set_value(self.field, text);
        Ok(())
    }
}

impl Displayable for TextareaIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let text = doc.value(self.active()).to_string();
        doc.set_text(self.output, text);
        Ok(())
    }
}

impl Interactive for TextareaIo {
    fn on_event(&mut self, doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        let in_input = event.target == self.field && self.state == EscalationState::InputMode;
        let in_area = event.target == self.area && self.state == EscalationState::TextareaMode;

        let result = match &event.kind {
            EventKind::Click if in_input && self.escalate_on_click => {
                self.escalate(doc);
                InteractionResult::with_action(IoAction::Escalated)
            }
            EventKind::Input(text) if in_input && self.exceeds_threshold(text) => {
                self.escalate(doc);
                InteractionResult::with_action(IoAction::Escalated)
            }
            EventKind::Blur if in_area => {
                self.collapse(doc);
                let mut result = InteractionResult::with_action(IoAction::Collapsed);
                result.merge(InteractionResult::edited());
                result
            }
            EventKind::Change | EventKind::Blur if in_input => InteractionResult::edited(),
            EventKind::Input(_) if in_input || in_area => InteractionResult::handled(),
            _ => InteractionResult::ignored(),
        };
        Ok(result)
    }

    fn validate(&self, _doc: &Document, value: &BasicValue) -> Result<(), String> {
        run_validators(&self.validators, &value.to_text_scalar())
    }
}

#[cfg(test)]
mod tests {
    use super::TextareaIo;
    use crate::core::options::ResolvedOptions;
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::base::IoBase;
    use crate::widgets::traits::{
        Displayable, DomEvent, Editable, EscalatingText, EscalationState, Interactive, IoAction,
    };

    fn setup() -> (Document, TextareaIo) {
        let mut doc = Document::new();
        let root = doc.root();
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        let base = IoBase::attach(&mut doc, proxy, "textarea", ResolvedOptions::default())
            .expect("base");
        let textarea = TextareaIo::build(&mut doc, &base).expect("textarea");
        (doc, textarea)
    }

    fn type_into(doc: &mut Document, textarea: &mut TextareaIo, text: &str) -> Vec<IoAction> {
        let field = textarea.field();
        doc.set_value(field, text);
        textarea
            .on_event(doc, &DomEvent::input(field, text))
            .expect("input event")
            .actions
    }

    #[test]
    fn stays_an_input_up_to_the_threshold() {
        let (mut doc, mut textarea) = setup();
        let actions = type_into(&mut doc, &mut textarea, &"x".repeat(49));
        assert!(actions.is_empty());
        let actions = type_into(&mut doc, &mut textarea, &"x".repeat(50));
        assert!(actions.is_empty());
        assert_eq!(textarea.escalation_state(), EscalationState::InputMode);
    }

    #[test]
    fn long_content_escalates_with_the_same_text() {
        let (mut doc, mut textarea) = setup();
        let text = "y".repeat(51);
        let actions = type_into(&mut doc, &mut textarea, &text);

        assert_eq!(actions, vec![IoAction::Escalated]);
        assert_eq!(textarea.escalation_state(), EscalationState::TextareaMode);
        assert_eq!(doc.value(textarea.area()), text);
        assert!(doc.hidden(textarea.field()));
        assert!(!doc.hidden(textarea.area()));
    }

    #[test]
    fn click_escalates_and_blur_copies_back_exactly() {
        let (mut doc, mut textarea) = setup();
        let field = textarea.field();
        let area = textarea.area();

        textarea.on_event(&mut doc, &DomEvent::click(field)).expect("click");
        assert_eq!(textarea.escalation_state(), EscalationState::TextareaMode);

        let text = "line one\nline two  ";
        doc.set_value(area, text);
        let result = textarea.on_event(&mut doc, &DomEvent::blur(area)).expect("blur");

        assert!(result.has(&IoAction::Collapsed));
        assert!(result.has(&IoAction::Edited));
        assert_eq!(textarea.escalation_state(), EscalationState::InputMode);
        assert_eq!(doc.value(field), text);
        assert_eq!(doc.value(area), text);
        assert!(!doc.hidden(field));
        assert!(doc.hidden(area));
    }

    #[test]
    fn setting_a_value_keeps_both_elements_in_sync() {
        let (mut doc, mut textarea) = setup();
        textarea
            .set_input_value(&mut doc, &BasicValue::from("notes"))
            .expect("set");
        textarea.update_outputs(&mut doc).expect("outputs");
        assert_eq!(doc.value(textarea.field()), "notes");
        assert_eq!(doc.value(textarea.area()), "notes");
        assert_eq!(doc.text(textarea.output()), "notes");
    }

    #[test]
    fn click_escalation_can_be_disabled() {
        let (mut doc, textarea) = setup();
        let mut textarea = textarea.with_escalate_on_click(false);
        let field = textarea.field();
        textarea.on_event(&mut doc, &DomEvent::click(field)).expect("click");
        assert_eq!(textarea.escalation_state(), EscalationState::InputMode);
    }
}
