//! Arena-backed element tree.
//!
//! This is the surface widgets render into: elements carry a tag, ordered
//! attributes, classes, text, and the live state of form controls (`value`,
//! `checked`, `indeterminate`). Widgets never create their own top-level
//! element; they are handed a proxy and append children to it.

use crate::core::NodeId;
use crate::core::error::IoError;
use crate::ui::stylesheet::RuleSheet;
use indexmap::IndexMap;

const VOID_TAGS: &[&str] = &["input", "img", "br", "hr", "meta", "link"];

fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attrs: IndexMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    checked: bool,
    indeterminate: bool,
    hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> &IndexMap<String, String> {
        &self.attrs
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn apply_attr(&mut self, name: &str, value: &str) {
        match name {
            "class" => {
                for class in value.split_whitespace() {
                    if !self.classes.iter().any(|c| c == class) {
                        self.classes.push(class.to_string());
                    }
                }
            }
            "hidden" => self.hidden = true,
            "checked" => self.checked = true,
            "value" => {
                self.value = value.to_string();
                self.attrs.insert(name.to_string(), value.to_string());
            }
            _ => {
                self.attrs.insert(name.to_string(), value.to_string());
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    root: NodeId,
    styles: RuleSheet,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Element::new("body"))],
            root: NodeId::new(0),
            styles: RuleSheet::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn styles(&self) -> &RuleSheet {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut RuleSheet {
        &mut self.styles
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Ensure `id` is alive, naming the missing anchor otherwise.
    pub fn require(&self, id: NodeId, anchor: &'static str) -> Result<NodeId, IoError> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(IoError::MissingAnchor { anchor, node: id })
        }
    }

    /// Append a new child element with the given attributes.
    pub fn create_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId, IoError> {
        if !self.contains(parent) {
            return Err(IoError::DetachedNode(parent));
        }
        let id = NodeId::new(self.nodes.len());
        let mut element = Element::new(tag);
        element.parent = Some(parent);
        for (name, value) in attrs {
            element.apply_attr(name, value);
        }
        self.nodes.push(Some(element));
        if let Some(parent) = self.element_mut(parent) {
            parent.children.push(id);
        }
        Ok(id)
    }

    /// Detach and drop `id` with its whole subtree. Returns the removed ids.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.root || !self.contains(id) {
            return Vec::new();
        }
        if let Some(parent) = self.parent(id)
            && let Some(parent) = self.element_mut(parent)
        {
            parent.children.retain(|child| *child != id);
        }
        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        for node in &removed {
            if let Some(slot) = self.nodes.get_mut(node.index()) {
                *slot = None;
            }
        }
        removed
    }

    /// Copy of the state of `id` itself, to hand back to [`Document::roll_back`].
    pub fn snapshot(&self, id: NodeId) -> Option<Element> {
        self.element(id).cloned()
    }

    /// Return `id` to a snapshot, dropping the children added since.
    pub fn roll_back(&mut self, id: NodeId, mut saved: Element) {
        let added: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|child| !saved.children.contains(child))
            .collect();
        for child in added {
            self.remove(child);
        }
        saved.children.retain(|child| self.contains(*child));
        saved.parent = self.parent(id);
        if let Some(slot) = self.element_mut(id) {
            *slot = saved;
        }
    }

    pub fn tag(&self, id: NodeId) -> &str {
        self.element(id).map(Element::tag).unwrap_or("")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(Element::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map(Element::children).unwrap_or(&[])
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn find_descendant(&self, id: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|node| self.element(*node).is_some_and(&pred))
    }

    pub fn find_by_class(&self, within: NodeId, class: &str) -> Option<NodeId> {
        self.find_descendant(within, |element| element.classes.iter().any(|c| c == class))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attrs.shift_remove(name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|element| element.classes.iter().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(element) = self.element_mut(id)
            && !element.classes.iter().any(|c| c == class)
        {
            element.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.element(id).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.text = text.into();
        }
    }

    /// Live value of a form control.
    pub fn value(&self, id: NodeId) -> &str {
        self.element(id).map(|e| e.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.value = value.into();
        }
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.checked)
    }

    /// Setting a definite checked state clears `indeterminate`.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if let Some(element) = self.element_mut(id) {
            element.checked = checked;
            element.indeterminate = false;
        }
    }

    pub fn indeterminate(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.indeterminate)
    }

    pub fn set_indeterminate(&mut self, id: NodeId) {
        if let Some(element) = self.element_mut(id) {
            element.checked = false;
            element.indeterminate = true;
        }
    }

    pub fn hidden(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.hidden)
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(element) = self.element_mut(id) {
            element.hidden = hidden;
        }
    }

    /// Serialize `id` and its subtree as HTML.
    pub fn render_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(element) = self.element(id) else {
            return;
        };
        out.push('<');
        out.push_str(&element.tag);
        if !element.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape(&element.classes.join(" "))));
        }
        for (name, value) in &element.attrs {
            if name == "value" && element.tag == "input" {
                continue;
            }
            out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        if element.tag == "input" && !element.value.is_empty() {
            out.push_str(&format!(" value=\"{}\"", escape(&element.value)));
        }
        if element.checked {
            out.push_str(" checked");
        }
        if element.hidden {
            out.push_str(" hidden");
        }
        out.push('>');
        if is_void_tag(&element.tag) {
            return;
        }
        if element.tag == "textarea" {
            out.push_str(&escape(&element.value));
        } else {
            out.push_str(&escape(&element.text));
        }
        for child in &element.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
