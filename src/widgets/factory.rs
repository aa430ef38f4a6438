//! Building widgets from markup and from YAML form schemas.

use serde::{Deserialize, Serialize};

use crate::core::NodeId;
use crate::core::column::ColumnMetadata;
use crate::core::deduce::IoSpec;
use crate::core::error::IoError;
use crate::core::options::{IoOptions, Mode, OptionsChain};
use crate::core::registry::{RECORD_ATTR, WidgetRegistry};
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::ui::fragment::parse_fragment;
use crate::widgets::io::Io;

const IO_ATTR: &str = "data-io";
const COLUMN_ATTR: &str = "data-column";
const VALUE_ATTR: &str = "data-value";

/// Parse `html` under `parent` and attach a widget to every element that
/// declares one through `data-io` or `data-column`.
///
/// Either every declared widget is attached or none is: on error the parsed
/// elements are removed again and nothing stays registered.
pub fn attach_fragment(
    doc: &mut Document,
    registry: &mut WidgetRegistry,
    parent: NodeId,
    html: &str,
    defaults: &IoOptions,
) -> Result<Vec<NodeId>, IoError> {
    let top = parse_fragment(doc, parent, html)?;
    let mut candidates = Vec::new();
    for node in &top {
        candidates.push(*node);
        candidates.extend(doc.descendants(*node));
    }

    let mut attached = Vec::new();
    for node in candidates {
        // Children created by an earlier widget carry no declaration.
        if doc.attr(node, IO_ATTR).is_none() && doc.attr(node, COLUMN_ATTR).is_none() {
            continue;
        }
        if let Err(error) = attach_proxy(doc, registry, node, defaults) {
            for proxy in &attached {
                registry.unregister(*proxy);
            }
            for node in &top {
                doc.remove(*node);
            }
            tracing::debug!(%error, attached = attached.len(), "fragment attach rolled back");
            return Err(error);
        }
        attached.push(node);
    }
    Ok(attached)
}

/// Build and register the widget declared by the `data-*` attributes of
/// `proxy`. On error the proxy is left as it was found.
pub fn attach_proxy(
    doc: &mut Document,
    registry: &mut WidgetRegistry,
    proxy: NodeId,
    defaults: &IoOptions,
) -> Result<NodeId, IoError> {
    doc.require(proxy, "proxy")?;
    registry.ensure_vacant(doc, proxy)?;
    let data = |key: &str| doc.attr(proxy, &format!("data-{key}")).map(str::to_string);

    let explicit = match data("io") {
        Some(discriminant) => Some(IoSpec::from_discriminant(&discriminant, &data)?),
        None => None,
    };
    let options = markup_options(&data)?;
    let confirm = data("confirm").is_some_and(|raw| flag(&raw));
    let value = data("value").map(BasicValue::Text);

    let scopes = [options, defaults.clone()];
    let saved = doc.snapshot(proxy).ok_or(IoError::DetachedNode(proxy))?;
    match build_declared(doc, proxy, explicit, OptionsChain::new(&scopes), confirm, value) {
        Ok(io) => {
            registry.insert(doc, io)?;
            Ok(proxy)
        }
        Err(error) => {
            doc.roll_back(proxy, saved);
            Err(error)
        }
    }
}

fn build_declared(
    doc: &mut Document,
    proxy: NodeId,
    explicit: Option<IoSpec>,
    chain: OptionsChain<'_>,
    confirm: bool,
    value: Option<BasicValue>,
) -> Result<Io, IoError> {
    let mut io = Io::build(doc, proxy, explicit, chain)?;
    if confirm {
        io = io.with_confirmation(doc)?;
    }
    if let Some(value) = value {
        io.commit_value(doc, value)?;
        doc.remove_attr(proxy, VALUE_ATTR);
    }
    Ok(io)
}

fn markup_options(data: &impl Fn(&str) -> Option<String>) -> Result<IoOptions, IoError> {
    let number = |key: &str| -> Result<Option<u32>, IoError> {
        data(key)
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| IoError::invalid_value("option", format!("{key}={raw}")))
            })
            .transpose()
    };

    let mode = match data("mode").as_deref() {
        None => None,
        Some("edit") => Some(Mode::Edit),
        Some("normal") => Some(Mode::Normal),
        Some(other) => return Err(IoError::invalid_value("option", format!("mode={other}"))),
    };
    let column = data("column").map(|name| {
        let data_type = data("type").unwrap_or_default();
        let mut column = ColumnMetadata::new(name, data_type, 0);
        column.length = data("length")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default();
        column.nullable = data("nullable").is_some_and(|raw| flag(&raw));
        column
    });

    Ok(IoOptions {
        required: data("required").map(|raw| flag(&raw)),
        label: data("label"),
        column,
        size: number("size")?,
        maxlength: number("maxlength")?,
        disabled: data("disabled").map(|raw| flag(&raw)),
        mode,
    })
}

/// Bare attributes (`data-disabled`) count as set.
fn flag(raw: &str) -> bool {
    raw.is_empty() || BasicValue::from(raw).to_bool().unwrap_or(false)
}

/// Form description loaded from YAML.
///
/// ```yaml
/// defaults:
///   mode: edit
/// fields:
///   - label: Price
///     column: { name: price, data_type: decimal, length: 10 }
///     value: 12.5
///   - label: Size
///     spec: { io: select, choices: [small, large] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSchema {
    pub defaults: IoOptions,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(flatten)]
    pub options: IoOptions,
    #[serde(default)]
    pub spec: Option<IoSpec>,
    #[serde(default)]
    pub value: Option<BasicValue>,
    #[serde(default)]
    pub confirm: bool,
}

impl FormSchema {
    pub fn from_yaml(source: &str) -> Result<Self, IoError> {
        Ok(serde_yaml::from_str(source)?)
    }
}

/// Lay out every field of `schema` inside a new record element under
/// `parent`. Returns the record element.
///
/// A field that fails to build removes the whole record again.
pub fn build_form(
    doc: &mut Document,
    registry: &mut WidgetRegistry,
    parent: NodeId,
    schema: &FormSchema,
) -> Result<NodeId, IoError> {
    let record = doc.create_element(parent, "form", &[(RECORD_ATTR, "")])?;
    let mut proxies = Vec::with_capacity(schema.fields.len());
    if let Err(error) = fill_record(doc, registry, record, schema, &mut proxies) {
        for proxy in proxies {
            registry.unregister(proxy);
        }
        doc.remove(record);
        return Err(error);
    }
    tracing::debug!(fields = schema.fields.len(), "form built");
    Ok(record)
}

fn fill_record(
    doc: &mut Document,
    registry: &mut WidgetRegistry,
    record: NodeId,
    schema: &FormSchema,
    proxies: &mut Vec<NodeId>,
) -> Result<(), IoError> {
    for field in &schema.fields {
        let row = doc.create_element(record, "div", &[("class", "field")])?;
        let scopes = [field.options.clone(), schema.defaults.clone()];
        let chain = OptionsChain::new(&scopes);

        let caption = chain.resolve().display_label().to_string();
        if !caption.is_empty() {
            let label = doc.create_element(row, "label", &[])?;
            doc.set_text(label, caption);
        }

        let proxy = doc.create_element(row, "div", &[])?;
        let mut io = Io::build(doc, proxy, field.spec.clone(), chain)?;
        if field.confirm {
            io = io.with_confirmation(doc)?;
        }
        if let Some(value) = &field.value {
            io.commit_value(doc, value.clone())?;
        }
        registry.insert(doc, io)?;
        proxies.push(proxy);
    }
    Ok(())
}
