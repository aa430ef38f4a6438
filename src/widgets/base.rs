use crate::core::NodeId;
use crate::core::column::ColumnMetadata;
use crate::core::error::IoError;
use crate::core::options::ResolvedOptions;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;

pub const EDIT_CLASS: &str = "edit";
pub const NORMAL_CLASS: &str = "normal";
pub const ERROR_CLASS: &str = "error";

/// State shared by every variant: the injected proxy, the options snapshot
/// and the value to restore.
#[derive(Debug, Clone)]
pub struct IoBase {
    proxy: NodeId,
    options: ResolvedOptions,
    original_value: Option<BasicValue>,
}

impl IoBase {
    pub fn attach(
        doc: &mut Document,
        proxy: NodeId,
        io_name: &str,
        options: ResolvedOptions,
    ) -> Result<Self, IoError> {
        doc.require(proxy, "proxy")?;
        doc.add_class(proxy, "io");
        doc.add_class(proxy, &format!("io-{io_name}"));
        doc.set_attr(proxy, "data-mode", options.mode.as_str());
        if let Some(column) = &options.column {
            doc.set_attr(proxy, "data-column", column.name.clone());
        }
        Ok(Self {
            proxy,
            options,
            original_value: None,
        })
    }

    /// Create the error-display span unless the markup already has one.
    pub fn ensure_error_anchor(&self, doc: &mut Document) -> Result<NodeId, IoError> {
        if let Some(error) = self.error_anchor(doc) {
            return Ok(error);
        }
        doc.create_element(self.proxy, "span", &[("class", ERROR_CLASS)])
    }

    pub fn error_anchor(&self, doc: &Document) -> Option<NodeId> {
        doc.find_by_class(self.proxy, ERROR_CLASS)
    }

    pub fn proxy(&self) -> NodeId {
        self.proxy
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub(crate) fn options_mut(&mut self) -> &mut ResolvedOptions {
        &mut self.options
    }

    pub fn column(&self) -> Option<&ColumnMetadata> {
        self.options.column.as_ref()
    }

    pub fn label(&self) -> &str {
        self.options.display_label()
    }

    pub fn is_required(&self) -> bool {
        self.options.required
    }

    pub fn original_value(&self) -> Option<&BasicValue> {
        self.original_value.as_ref()
    }

    pub(crate) fn set_original_value(&mut self, value: BasicValue) {
        self.original_value = Some(value);
    }

    /// Reflect size, maxlength and disabled onto an editable element.
    pub fn apply_control_attrs(&self, doc: &mut Document, control: NodeId) {
        if let Some(size) = self.options.size {
            doc.set_attr(control, "size", size.to_string());
        }
        if let Some(maxlength) = self.options.maxlength {
            doc.set_attr(control, "maxlength", maxlength.to_string());
        }
        if self.options.disabled {
            doc.set_attr(control, "disabled", "");
        }
    }

    /// Field name shared by grouped controls.
    pub fn field_name(&self) -> String {
        match &self.options.column {
            Some(column) => column.name.clone(),
            None if !self.label().is_empty() => self.label().to_string(),
            None => format!("io-{}", self.proxy.index()),
        }
    }
}
