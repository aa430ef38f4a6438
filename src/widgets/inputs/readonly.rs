use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{IoBase, NORMAL_CLASS};
use crate::widgets::traits::{Displayable, Editable, Interactive};

/// Display-only node. Only code can place a value here.
pub struct ReadOnlyIo {
    output: NodeId,
}

impl ReadOnlyIo {
    pub fn build(doc: &mut Document, base: &IoBase) -> Result<Self, IoError> {
        let output = doc.create_element(
            base.proxy(),
            "span",
            &[("class", "normal readonly")],
        )?;
        Ok(Self { output })
    }

    pub fn output(&self) -> NodeId {
        self.output
    }
}

impl Editable for ReadOnlyIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(BasicValue::Text(doc.text(self.output).to_string()))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        doc.set_text(self.output, value.to_text_scalar());
        Ok(())
    }
}

impl Displayable for ReadOnlyIo {
    fn update_outputs(&self, _doc: &mut Document) -> Result<(), IoError> {
        Ok(())
    }
}

impl Interactive for ReadOnlyIo {}

/// Primary key of a record. Displayed like a read-only field; its proxy is the
/// one flagged when any field of the record is edited.
pub struct PrimaryKeyIo {
    output: NodeId,
}

impl PrimaryKeyIo {
    pub fn build(doc: &mut Document, base: &IoBase) -> Result<Self, IoError> {
        let output = doc.create_element(
            base.proxy(),
            "span",
            &[("class", NORMAL_CLASS), ("data-pk", "")],
        )?;
        Ok(Self { output })
    }

    pub fn output(&self) -> NodeId {
        self.output
    }
}

impl Editable for PrimaryKeyIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(BasicValue::Text(
            doc.attr(self.output, "data-pk").unwrap_or_default().to_string(),
        ))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        if let BasicValue::Bool(_) = value {
            return Err(IoError::invalid_value("primary_key", value));
        }
        doc.set_attr(self.output, "data-pk", value.to_text_scalar());
        Ok(())
    }
}

impl Displayable for PrimaryKeyIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let pk = doc.attr(self.output, "data-pk").unwrap_or_default().to_string();
        doc.set_text(self.output, pk);
        Ok(())
    }
}

impl Interactive for PrimaryKeyIo {}

#[cfg(test)]
mod tests {
    use super::{PrimaryKeyIo, ReadOnlyIo};
    use crate::core::options::ResolvedOptions;
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::base::IoBase;
    use crate::widgets::traits::{Displayable, Editable};

    fn base(doc: &mut Document) -> IoBase {
        let root = doc.root();
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        IoBase::attach(doc, proxy, "test", ResolvedOptions::default()).expect("base")
    }

    #[test]
    fn read_only_shows_exactly_what_was_placed() {
        let mut doc = Document::new();
        let base = base(&mut doc);
        let mut readonly = ReadOnlyIo::build(&mut doc, &base).expect("readonly");
        readonly
            .set_input_value(&mut doc, &BasicValue::from("2024-01-01 10:00"))
            .expect("set");
        assert_eq!(doc.text(readonly.output()), "2024-01-01 10:00");
        assert_eq!(
            readonly.input_value(&doc).expect("value"),
            BasicValue::from("2024-01-01 10:00")
        );
    }

    #[test]
    fn primary_key_keeps_the_key_in_an_attribute() {
        let mut doc = Document::new();
        let base = base(&mut doc);
        let mut pk = PrimaryKeyIo::build(&mut doc, &base).expect("pk");
        pk.set_input_value(&mut doc, &BasicValue::from(42_i64)).expect("set");
        pk.update_outputs(&mut doc).expect("outputs");
        assert_eq!(doc.attr(pk.output(), "data-pk"), Some("42"));
        assert_eq!(doc.text(pk.output()), "42");
        assert!(pk.set_input_value(&mut doc, &BasicValue::Bool(true)).is_err());
    }
}
