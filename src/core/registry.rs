use indexmap::IndexMap;

use crate::core::NodeId;
use crate::core::deduce::IoSpec;
use crate::core::error::IoError;
use crate::core::options::OptionsChain;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::components::picker::RecordPicker;
use crate::widgets::io::Io;
use crate::widgets::traits::{CheckResult, DomEvent, EventKind, InteractionResult, IoAction};

pub const RECORD_ATTR: &str = "data-record";

/// Caller-owned table of widgets, keyed by proxy element.
///
/// Widgets are registered when built and stay until `unregister` or `prune`
/// drops them. A widget whose proxy has left the document is treated as
/// absent by every document-aware lookup, pruned or not. Event routing and
/// edit propagation go through here.
#[derive(Default)]
pub struct WidgetRegistry {
    widgets: IndexMap<NodeId, Io>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a widget on `proxy` and register it.
    ///
    /// Fails without touching the proxy when it already carries a live widget.
    pub fn create(
        &mut self,
        doc: &mut Document,
        proxy: NodeId,
        explicit: Option<IoSpec>,
        chain: OptionsChain<'_>,
    ) -> Result<&mut Io, IoError> {
        self.ensure_vacant(doc, proxy)?;
        let io = Io::build(doc, proxy, explicit, chain)?;
        self.insert(doc, io)?;
        self.widgets
            .get_mut(&proxy)
            .ok_or(IoError::UnknownWidget(proxy))
    }

    /// Register an already built widget.
    pub fn insert(&mut self, doc: &Document, io: Io) -> Result<(), IoError> {
        let proxy = io.proxy();
        self.ensure_vacant(doc, proxy)?;
        tracing::debug!(proxy = %proxy, io = io.spec().name(), "widget registered");
        self.widgets.insert(proxy, io);
        Ok(())
    }

    /// Error unless `proxy` is free to receive a widget. A stale entry left by
    /// a detached proxy does not count.
    pub fn ensure_vacant(&self, doc: &Document, proxy: NodeId) -> Result<(), IoError> {
        match self.get(doc, proxy) {
            Some(_) => Err(IoError::DuplicateWidget(proxy)),
            None => Ok(()),
        }
    }

    /// Widget on `proxy`, provided the proxy is still in `doc`.
    pub fn get(&self, doc: &Document, proxy: NodeId) -> Option<&Io> {
        self.widgets.get(&proxy).filter(|_| doc.contains(proxy))
    }

    pub fn get_mut(&mut self, doc: &Document, proxy: NodeId) -> Option<&mut Io> {
        self.widgets.get_mut(&proxy).filter(|_| doc.contains(proxy))
    }

    pub fn unregister(&mut self, proxy: NodeId) -> Option<Io> {
        let removed = self.widgets.shift_remove(&proxy);
        if removed.is_some() {
            tracing::debug!(proxy = %proxy, "widget unregistered");
        }
        removed
    }

    /// Drop widgets whose proxy has left the document.
    pub fn prune(&mut self, doc: &Document) -> usize {
        let before = self.widgets.len();
        self.widgets.retain(|proxy, _| {
            let alive = doc.contains(*proxy);
            if !alive {
                tracing::warn!(proxy = %proxy, "dropping widget with a detached proxy");
            }
            alive
        });
        before - self.widgets.len()
    }

    /// Number of entries, stale ones included until `prune`.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widgets whose proxy is still in `doc`, in registration order.
    pub fn iter<'a>(&'a self, doc: &'a Document) -> impl Iterator<Item = (NodeId, &'a Io)> + 'a {
        self.widgets
            .iter()
            .filter(|(proxy, _)| doc.contains(**proxy))
            .map(|(proxy, io)| (*proxy, io))
    }

    /// Live proxies, for loops that need the document mutably.
    pub fn proxies(&self, doc: &Document) -> Vec<NodeId> {
        self.iter(doc).map(|(proxy, _)| proxy).collect()
    }

    /// Registered proxy that contains `target`, the target itself included.
    pub fn owner_of(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        if !doc.contains(target) {
            return None;
        }
        std::iter::once(target)
            .chain(doc.ancestors(target))
            .find(|node| self.widgets.contains_key(node))
    }

    /// Element grouping the fields of one record: the nearest ancestor
    /// marked with `data-record`, else the proxy's parent.
    pub fn record_of(&self, doc: &Document, proxy: NodeId) -> Option<NodeId> {
        doc.ancestors(proxy)
            .find(|node| doc.attr(*node, RECORD_ATTR).is_some())
            .or_else(|| doc.parent(proxy))
    }

    pub fn primary_key_of(&self, doc: &Document, proxy: NodeId) -> Option<NodeId> {
        let record = self.record_of(doc, proxy)?;
        self.iter(doc)
            .find(|(candidate, io)| {
                *candidate != proxy
                    && matches!(io.spec(), IoSpec::PrimaryKey)
                    && self.record_of(doc, *candidate) == Some(record)
            })
            .map(|(candidate, _)| candidate)
    }

    pub fn mark_as_edited(&self, doc: &mut Document, proxy: NodeId) -> Result<(), IoError> {
        let io = self.get(doc, proxy).ok_or(IoError::UnknownWidget(proxy))?;
        let primary_key = self.primary_key_of(doc, proxy);
        io.mark_as_edited(doc, primary_key)
    }

    /// Route `event` to the widget owning its target.
    ///
    /// `Input` events write the typed text into the target first. Edits are
    /// propagated here; every other action is left for the caller.
    pub fn dispatch(&mut self, doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        let Some(proxy) = self.owner_of(doc, event.target) else {
            return Ok(InteractionResult::ignored());
        };
        if let EventKind::Input(text) = &event.kind {
            doc.set_value(event.target, text.clone());
        }

        let primary_key = self.primary_key_of(doc, proxy);
        let io = self
            .widgets
            .get_mut(&proxy)
            .ok_or(IoError::UnknownWidget(proxy))?;
        let result = io.on_event(doc, event)?;
        if result.has(&IoAction::Edited) {
            io.mark_as_edited(doc, primary_key)?;
        }
        Ok(result)
    }

    /// Run the record picker for the foreign-key widget on `proxy`.
    pub async fn pick<P: RecordPicker>(
        &mut self,
        doc: &mut Document,
        proxy: NodeId,
        picker: &mut P,
    ) -> Result<CheckResult, IoError> {
        let primary_key = self.primary_key_of(doc, proxy);
        let io = self
            .get_mut(doc, proxy)
            .ok_or(IoError::UnknownWidget(proxy))?;
        let result = io.pick(doc, picker).await?;
        if result.is_valid() {
            io.mark_as_edited(doc, primary_key)?;
        }
        Ok(result)
    }

    /// Values of every edited widget, keyed by field name.
    pub fn collect_edited(&self, doc: &Document) -> Result<IndexMap<String, BasicValue>, IoError> {
        let mut out = IndexMap::new();
        for (_, io) in self.iter(doc).filter(|(_, io)| io.is_edited(doc)) {
            if matches!(io.spec(), IoSpec::PrimaryKey) {
                continue;
            }
            out.insert(io.field_name(), io.value(doc)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{RECORD_ATTR, WidgetRegistry};
    use crate::core::NodeId;
    use crate::core::column::ColumnMetadata;
    use crate::core::deduce::{InputKind, IoSpec};
    use crate::core::error::IoError;
    use crate::core::options::{IoOptions, OptionsChain};
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::components::picker::PresetPicker;
    use crate::widgets::io::{EDITED_ATTR, Variant};
    use crate::widgets::traits::{DomEvent, IoAction};
    use futures::executor::block_on;

    fn add(
        registry: &mut WidgetRegistry,
        doc: &mut Document,
        parent: NodeId,
        column: ColumnMetadata,
    ) -> NodeId {
        let proxy = doc.create_element(parent, "div", &[]).expect("proxy");
        let scopes = [IoOptions::new().with_column(column)];
        registry
            .create(doc, proxy, None, OptionsChain::new(&scopes))
            .expect("widget");
        proxy
    }

    fn record(doc: &mut Document) -> NodeId {
        let root = doc.root();
        doc.create_element(root, "form", &[(RECORD_ATTR, "1")])
            .expect("record")
    }

    #[test]
    fn change_marks_the_field_and_its_key() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let form = record(&mut doc);
        let id = add(&mut registry, &mut doc, form, ColumnMetadata::new("id", "int", 11).primary_key());
        let name = add(&mut registry, &mut doc, form, ColumnMetadata::new("name", "varchar", 40));

        let Some(Variant::Input(input)) = registry.get(&doc, name).map(|io| io.variant()) else {
            panic!("expected an input");
        };
        let field = input.field();
        registry
            .dispatch(&mut doc, &DomEvent::input(field, "Ada"))
            .expect("input");
        assert!(doc.attr(name, EDITED_ATTR).is_none());

        let result = registry
            .dispatch(&mut doc, &DomEvent::change(field))
            .expect("change");
        assert!(result.has(&IoAction::Edited));
        assert_eq!(doc.attr(name, EDITED_ATTR), Some("true"));
        assert_eq!(doc.attr(id, EDITED_ATTR), Some("true"));

        let edited = registry.collect_edited(&doc).expect("collect");
        assert_eq!(edited.get("name"), Some(&BasicValue::from("Ada")));
        assert_eq!(edited.len(), 1);
    }

    #[test]
    fn keys_of_other_records_are_left_alone() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let first = record(&mut doc);
        let second = record(&mut doc);
        let first_id = add(&mut registry, &mut doc, first, ColumnMetadata::new("id", "int", 11).primary_key());
        add(&mut registry, &mut doc, second, ColumnMetadata::new("id", "int", 11).primary_key());
        let flag = add(&mut registry, &mut doc, second, ColumnMetadata::new("is_active", "varchar", 5));

        assert_ne!(registry.primary_key_of(&doc, flag), Some(first_id));
        registry.mark_as_edited(&mut doc, flag).expect("mark");
        assert!(doc.attr(first_id, EDITED_ATTR).is_none());
    }

    #[test]
    fn picker_actions_are_returned_to_the_caller() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let form = record(&mut doc);
        let owner = add(
            &mut registry,
            &mut doc,
            form,
            ColumnMetadata::new("owner_id", "int", 11).foreign_key("users"),
        );
        let Some(Variant::ForeignKey(fk)) = registry.get(&doc, owner).map(|io| io.variant()) else {
            panic!("expected a foreign key");
        };
        let button = fk.button();

        let result = registry
            .dispatch(&mut doc, &DomEvent::click(button))
            .expect("click");
        assert!(result.has(&IoAction::OpenPicker));

        let mut picker = PresetPicker::new(Some((5, "alice".to_string())));
        let outcome = block_on(registry.pick(&mut doc, owner, &mut picker)).expect("pick");
        assert!(outcome.is_valid());
        assert_eq!(doc.attr(owner, EDITED_ATTR), Some("true"));
    }

    #[test]
    fn typing_long_text_escalates_through_dispatch() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let form = record(&mut doc);
        let notes = add(&mut registry, &mut doc, form, ColumnMetadata::new("description", "varchar", 20));

        let Some(Variant::Textarea(textarea)) = registry.get(&doc, notes).map(|io| io.variant()) else {
            panic!("expected a textarea");
        };
        let field = textarea.field();
        let result = registry
            .dispatch(&mut doc, &DomEvent::input(field, "z".repeat(51)))
            .expect("input");
        assert!(result.has(&IoAction::Escalated));
    }

    #[test]
    fn unregister_and_prune() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let form = record(&mut doc);
        let a = add(&mut registry, &mut doc, form, ColumnMetadata::new("a", "varchar", 10));
        let b = add(&mut registry, &mut doc, form, ColumnMetadata::new("b", "varchar", 10));
        assert_eq!(registry.len(), 2);

        assert!(registry.unregister(a).is_some());
        assert!(registry.unregister(a).is_none());

        doc.remove(b);
        assert_eq!(registry.prune(&doc), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn events_outside_widgets_are_ignored() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let root = doc.root();
        let stray = doc.create_element(root, "p", &[]).expect("stray");
        let scopes = [IoOptions::new()];
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        registry
            .create(&mut doc, proxy, Some(IoSpec::input(InputKind::Text)), OptionsChain::new(&scopes))
            .expect("widget");

        let result = registry.dispatch(&mut doc, &DomEvent::click(stray)).expect("click");
        assert!(!result.handled);
    }

    #[test]
    fn detached_proxies_are_absent_before_pruning() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let form = record(&mut doc);
        let kept = add(&mut registry, &mut doc, form, ColumnMetadata::new("kept", "varchar", 10));
        let gone = add(&mut registry, &mut doc, form, ColumnMetadata::new("gone", "varchar", 10));
        let Some(Variant::Input(input)) = registry.get(&doc, gone).map(|io| io.variant()) else {
            panic!("expected an input");
        };
        let field = input.field();

        doc.remove(gone);
        assert_eq!(registry.owner_of(&doc, gone), None);
        assert_eq!(registry.owner_of(&doc, field), None);
        assert!(registry.get(&doc, gone).is_none());
        assert_eq!(registry.proxies(&doc), vec![kept]);

        let result = registry
            .dispatch(&mut doc, &DomEvent::change(field))
            .expect("change");
        assert!(!result.handled);
        assert!(matches!(
            registry.mark_as_edited(&mut doc, gone),
            Err(IoError::UnknownWidget(_))
        ));
        assert!(registry.collect_edited(&doc).expect("collect").is_empty());
    }

    #[test]
    fn a_proxy_takes_one_widget() {
        let mut doc = Document::new();
        let mut registry = WidgetRegistry::new();
        let form = record(&mut doc);
        let proxy = add(&mut registry, &mut doc, form, ColumnMetadata::new("name", "varchar", 40));
        let rendered = doc.render_html(proxy);

        let scopes = [IoOptions::new()];
        let again = registry.create(
            &mut doc,
            proxy,
            Some(IoSpec::Checkbox),
            OptionsChain::new(&scopes),
        );
        assert!(matches!(again, Err(IoError::DuplicateWidget(p)) if p == proxy));
        assert_eq!(doc.render_html(proxy), rendered);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(&doc, proxy).expect("widget").spec(),
            &IoSpec::input(InputKind::Text)
        );
    }
}
