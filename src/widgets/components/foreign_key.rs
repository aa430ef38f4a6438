use serde_json::Value;

use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, InteractionResult, Interactive, IoAction,
};

const PK_ATTR: &str = "data-pk";
const FRIENDLY_ATTR: &str = "data-friendly";

/// Reference to a row of another entity, shown by its friendly label.
///
/// The primary key lives on the edit button; picking a new record goes
/// through [`Io::pick`](crate::widgets::io::Io::pick).
pub struct ForeignKeyIo {
    referenced_entity: Option<String>,
    output: NodeId,
    label: NodeId,
    button: NodeId,
}

impl ForeignKeyIo {
    pub fn build(
        doc: &mut Document,
        base: &IoBase,
        referenced_entity: Option<String>,
    ) -> Result<Self, IoError> {
        let proxy = base.proxy();
        let output = doc.create_element(proxy, "span", &[("class", NORMAL_CLASS)])?;
        let label = doc.create_element(proxy, "span", &[("class", EDIT_CLASS)])?;
        let button = doc.create_element(
            proxy,
            "button",
            &[("class", EDIT_CLASS), ("type", "button")],
        )?;
        doc.set_text(button, "…");
        if let Some(entity) = &referenced_entity {
            doc.set_attr(button, "data-entity", entity.clone());
        }
        base.apply_control_attrs(doc, button);

        Ok(Self {
            referenced_entity,
            output,
            label,
            button,
        })
    }

    pub fn referenced_entity(&self) -> Option<&str> {
        self.referenced_entity.as_deref()
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn friendly<'d>(&self, doc: &'d Document) -> &'d str {
        doc.attr(self.button, FRIENDLY_ATTR).unwrap_or_default()
    }

    fn clear(&self, doc: &mut Document) {
        doc.remove_attr(self.button, PK_ATTR);
        doc.remove_attr(self.button, FRIENDLY_ATTR);
        doc.set_text(self.label, "");
    }
}

/// Decode a foreign-key value into `(pk, friendly)`.
///
/// Accepts `[pk, "friendly"]` or a bare number, which doubles as its own
/// label. Empty values decode to `None`.
pub fn decode_reference(value: &BasicValue) -> Result<Option<(String, String)>, IoError> {
    let raw = match value {
        BasicValue::Null => return Ok(None),
        BasicValue::Bool(_) => return Err(IoError::invalid_value("foreign key", value)),
        other => other.to_text_scalar(),
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let parsed: Value =
        serde_json::from_str(raw).map_err(|source| IoError::decode("foreign key", raw, source))?;
    match parsed {
        Value::Number(pk) => {
            let pk = pk.to_string();
            Ok(Some((pk.clone(), pk)))
        }
        Value::Array(items) => match items.as_slice() {
            [Value::Number(pk), Value::String(friendly)] => {
                Ok(Some((pk.to_string(), friendly.clone())))
            }
            _ => Err(IoError::invalid_value("foreign key", raw)),
        },
        _ => Err(IoError::invalid_value("foreign key", raw)),
    }
}

/// Encode a picker selection the way the setter expects it.
pub fn encode_reference(pk: i64, friendly: &str) -> String {
    serde_json::json!([pk, friendly]).to_string()
}

impl Editable for ForeignKeyIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        Ok(BasicValue::Text(
            doc.attr(self.button, PK_ATTR).unwrap_or_default().to_string(),
        ))
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        let Some((pk, friendly)) = decode_reference(value)? else {
            self.clear(doc);
            return Ok(());
        };
        doc.set_attr(self.button, PK_ATTR, pk);
        doc.set_attr(self.button, FRIENDLY_ATTR, friendly.clone());
        doc.set_text(self.label, friendly);
        Ok(())
    }
}

impl Displayable for ForeignKeyIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        let friendly = self.friendly(doc).to_string();
        doc.set_text(self.output, friendly);
        Ok(())
    }
}

impl Interactive for ForeignKeyIo {
    fn on_event(&mut self, _doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        if event.target == self.button && event.kind == EventKind::Click {
            return Ok(InteractionResult::with_action(IoAction::OpenPicker));
        }
        Ok(InteractionResult::ignored())
    }
}
