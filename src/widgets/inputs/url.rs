use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, InteractionResult, Interactive,
};

/// Link editor: an address plus the friendly text shown for it.
///
/// The value travels as a JSON pair `["https://…", "text"]`; a bare address is
/// accepted and shown as its own text.
pub struct UrlIo {
    address: NodeId,
    text: NodeId,
    output: NodeId,
}

impl UrlIo {
    pub fn build(doc: &mut Document, base: &IoBase) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let output = doc.create_element(
            proxy,
            "a",
            &[("class", NORMAL_CLASS), ("target", "_blank")],
        )?;
        let address = doc.create_element(
            proxy,
            "input",
            &[("class", "edit address"), ("type", "url"), ("placeholder", "address")],
        )?;
        let text = doc.create_element(
            proxy,
            "input",
            &[("class", "edit text"), ("type", "text"), ("placeholder", "text")],
        )?;
        base.apply_control_attrs(doc, address);
        base.apply_control_attrs(doc, text);
        Ok(Self {
            address,
            text,
            output,
        })
    }

    pub fn address(&self) -> NodeId {
        self.address
    }

    pub fn text(&self) -> NodeId {
        self.text
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    fn friendly(&self, doc: &Document) -> String {
        let text = doc.value(self.text);
        if text.is_empty() {
            doc.value(self.address).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Split a url value into `(address, text)`.
pub fn decode_link(value: &BasicValue) -> Result<Option<(String, String)>, IoError> {
    let raw = match value {
        BasicValue::Null => return Ok(None),
        BasicValue::Text(raw) => raw.trim(),
        other => return Err(IoError::invalid_value("url", other)),
    };
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.starts_with('[') {
        let (address, text): (String, String) =
            serde_json::from_str(raw).map_err(|source| IoError::decode("url", raw, source))?;
        return Ok(Some((address, text)));
    }
    Ok(Some((raw.to_string(), raw.to_string())))
}

impl Editable for UrlIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        let address = doc.value(self.address);
        if address.is_empty() {
            return Ok(BasicValue::Text(String::new()));
        }
        let pair = serde_json::json!([address, self.friendly(doc)]);
        Ok(BasicValue::Text(pair.to_string()))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        let (address, text) = decode_link(value)?.unwrap_or_default();
        doc.set_value(self.address, address);
        doc.set_value(self.text, text);
        Ok(())
    }
}

impl Displayable for UrlIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let address = doc.value(self.address).to_string();
        let friendly = self.friendly(doc);
        doc.set_attr(self.output, "href", address);
        doc.set_text(self.output, friendly);
        Ok(())
    }
}

impl Interactive for UrlIo {
    fn on_event(&mut self, _doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        if event.target != self.address && event.target != self.text {
            return Ok(InteractionResult::ignored());
        }
        Ok(match event.kind {
            EventKind::Change | EventKind::Blur => InteractionResult::edited(),
            EventKind::Input(_) => InteractionResult::handled(),
            EventKind::Click => InteractionResult::ignored(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{UrlIo, decode_link};
    use crate::core::error::IoError;
    use crate::core::options::ResolvedOptions;
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::base::IoBase;
    use crate::widgets::traits::{Displayable, Editable};

    fn setup() -> (Document, UrlIo) {
        let mut doc = Document::new();
        let root = doc.root();
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        let base = IoBase::attach(&mut doc, proxy, "url", ResolvedOptions::default()).expect("base");
        let url = UrlIo::build(&mut doc, &base).expect("url");
        (doc, url)
    }

    #[test]
    fn pair_round_trips_and_renders_an_anchor() {
        let (mut doc, mut url) = setup();
        let raw = r#"["https://example.org","Example"]"#;
        url.set_input_value(&mut doc, &BasicValue::from(raw)).expect("set");
        url.update_outputs(&mut doc).expect("outputs");

        assert_eq!(url.input_value(&doc).expect("value"), BasicValue::from(raw));
        assert_eq!(doc.attr(url.output(), "href"), Some("https://example.org"));
        assert_eq!(doc.text(url.output()), "Example");
    }

    #[test]
    fn bare_address_is_its_own_text() {
        assert_eq!(
            decode_link(&BasicValue::from("https://a.b")).expect("decode"),
            Some(("https://a.b".to_string(), "https://a.b".to_string()))
        );
        assert_eq!(decode_link(&BasicValue::Null).expect("decode"), None);
    }

    #[test]
    fn malformed_pairs_are_decode_errors() {
        let (mut doc, mut url) = setup();
        assert!(matches!(
            url.set_input_value(&mut doc, &BasicValue::from("[\"x\"")),
            Err(IoError::Decode { .. })
        ));
    }

    #[test]
    fn empty_address_reads_as_empty() {
        let (mut doc, mut url) = setup();
        url.set_input_value(&mut doc, &BasicValue::Null).expect("set");
        assert_eq!(url.input_value(&doc).expect("value").normalized(), BasicValue::Null);
    }
}
