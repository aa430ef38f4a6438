use crate::core::NodeId;
use crate::core::deduce::{FileKind, InputKind};
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;
use crate::widgets::base::{EDIT_CLASS, IoBase, NORMAL_CLASS};
use crate::widgets::inputs::input::InputIo;
use crate::widgets::traits::{
    Displayable, DomEvent, Editable, EventKind, FileSource, InteractionResult, Interactive,
    IoAction, SourceToggle,
};

pub const IMAGE_PLACEHOLDER: &str = "images/placeholder.png";

const LOCAL_SELECTOR: &str = ".io-file .local";
const REMOTE_SELECTOR: &str = ".io-file .remote";

/// Path editor with a local/remote source switch.
///
/// Local mode offers the native chooser and an upload trigger; remote mode
/// offers an explore trigger for server-side browsing. Visibility of the two
/// groups is driven by shared stylesheet rules, so every file widget on the
/// page follows the last toggle.
pub struct FileIo {
    kind: FileKind,
    source: FileSource,
    path: InputIo,
    local_radio: NodeId,
    remote_radio: NodeId,
    chooser: NodeId,
    upload: NodeId,
    explore: NodeId,
    preview: Option<NodeId>,
}

impl FileIo {
    pub fn build(doc: &mut Document, base: &IoBase, kind: FileKind) -> Result<Self, IoError> {
        let proxy = base.proxy();
        doc.add_class(proxy, "io-file");

        let preview = match kind {
            FileKind::Image => Some(doc.create_element(
                proxy,
                "img",
                &[("class", NORMAL_CLASS), ("src", IMAGE_PLACEHOLDER)],
            )?),
            FileKind::File => None,
        };
        let path = InputIo::build(doc, base, InputKind::Text)?;

        let group = format!("{}-source", base.field_name());
        let local_radio = source_radio(doc, proxy, &group, FileSource::Local)?;
        let remote_radio = source_radio(doc, proxy, &group, FileSource::Remote)?;
        doc.set_checked(local_radio, true);

        let accept = match kind {
            FileKind::Image => "image/*",
            FileKind::File => "*/*",
        };
        let chooser = doc.create_element(
            proxy,
            "input",
            &[("class", "local edit"), ("type", "file"), ("accept", accept)],
        )?;
        let upload = doc.create_element(
            proxy,
            "button",
            &[("class", "local edit upload"), ("type", "button")],
        )?;
        doc.set_text(upload, "upload");
        let explore = doc.create_element(
            proxy,
            "button",
            &[("class", "remote edit explore"), ("type", "button")],
        )?;
        doc.set_text(explore, "explore");
        for control in [chooser, upload, explore] {
            base.apply_control_attrs(doc, control);
        }

        let mut file = Self {
            kind,
            source: FileSource::Local,
            path,
            local_radio,
            remote_radio,
            chooser,
            upload,
            explore,
            preview,
        };
        file.toggle_source(doc, FileSource::Local);
        Ok(file)
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn path(&self) -> &InputIo {
        &self.path
    }

    pub fn chooser(&self) -> NodeId {
        self.chooser
    }

    pub fn upload(&self) -> NodeId {
        self.upload
    }

    pub fn explore(&self) -> NodeId {
        self.explore
    }

    pub fn preview(&self) -> Option<NodeId> {
        self.preview
    }

    pub fn source_radio(&self, source: FileSource) -> NodeId {
        match source {
            FileSource::Local => self.local_radio,
            FileSource::Remote => self.remote_radio,
        }
    }
}

fn source_radio(
    doc: &mut Document,
    proxy: NodeId,
    group: &str,
    source: FileSource,
) -> Result<NodeId, IoError> {
    let label = doc.create_element(proxy, "label", &[("class", EDIT_CLASS)])?;
    let radio = doc.create_element(
        label,
        "input",
        &[("type", "radio"), ("name", group), ("value", source.as_str())],
    )?;
    doc.set_text(label, source.as_str());
    Ok(radio)
}

impl SourceToggle for FileIo {
    fn source(&self) -> FileSource {
        self.source
    }

    fn toggle_source(&mut self, doc: &mut Document, source: FileSource) {
        let (shown, hidden) = match source {
            FileSource::Local => (LOCAL_SELECTOR, REMOTE_SELECTOR),
            FileSource::Remote => (REMOTE_SELECTOR, LOCAL_SELECTOR),
        };
        let styles = doc.styles_mut();
        styles.set_rule(shown, "display", "inline");
        styles.set_rule(hidden, "display", "none");
        doc.set_checked(self.local_radio, source == FileSource::Local);
        doc.set_checked(self.remote_radio, source == FileSource::Remote);
        self.source = source;
    }
}

impl Editable for FileIo {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError> {
        self.path.input_value(doc)
    }

    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError> {
        self.path.set_input_value(doc, value)
    }
}

impl Displayable for FileIo {
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError> {
        self.path.update_outputs(doc)?;
        if let Some(preview) = self.preview {
            let path = doc.value(self.path.field());
            let src = if path.is_empty() {
                IMAGE_PLACEHOLDER.to_string()
            } else {
                path.to_string()
            };
            doc.set_attr(preview, "src", src);
        }
        Ok(())
    }
}

impl Interactive for FileIo {
    fn on_event(&mut self, doc: &mut Document, event: &DomEvent) -> Result<InteractionResult, IoError> {
        let target = event.target;
        let result = match &event.kind {
            EventKind::Click if target == self.explore => {
                InteractionResult::with_action(IoAction::BrowseFiles)
            }
            EventKind::Click if target == self.upload => {
                let path = doc.value(self.path.field()).to_string();
                InteractionResult::with_action(IoAction::Upload { path })
            }
            EventKind::Change if target == self.chooser => {
                let picked = doc.value(self.chooser).to_string();
                doc.set_value(self.path.field(), picked);
                InteractionResult::edited()
            }
            EventKind::Change | EventKind::Click
                if target == self.local_radio || target == self.remote_radio =>
            {
                let source = if target == self.remote_radio {
                    FileSource::Remote
                } else {
                    FileSource::Local
                };
                self.toggle_source(doc, source);
                InteractionResult::with_action(IoAction::SourceToggled(source))
            }
            _ => self.path.on_event(doc, event)?,
        };
        Ok(result)
    }

    fn validate(&self, doc: &Document, value: &BasicValue) -> Result<(), String> {
        self.path.validate(doc, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{FileIo, IMAGE_PLACEHOLDER};
    use crate::core::deduce::FileKind;
    use crate::core::options::ResolvedOptions;
    use crate::core::value::BasicValue;
    use crate::ui::dom::Document;
    use crate::widgets::base::IoBase;
    use crate::widgets::traits::{
        Displayable, DomEvent, Editable, FileSource, Interactive, IoAction, SourceToggle,
    };

    fn setup(kind: FileKind) -> (Document, FileIo) {
        let mut doc = Document::new();
        let root = doc.root();
        let proxy = doc.create_element(root, "div", &[]).expect("proxy");
        let base = IoBase::attach(&mut doc, proxy, "file", ResolvedOptions::default())
            .expect("base");
        let file = FileIo::build(&mut doc, &base, kind).expect("file");
        (doc, file)
    }

    #[test]
    fn image_preview_follows_the_value() {
        let (mut doc, mut file) = setup(FileKind::Image);
        let preview = file.preview().expect("preview");
        file.update_outputs(&mut doc).expect("outputs");
        assert_eq!(doc.attr(preview, "src"), Some(IMAGE_PLACEHOLDER));

        file.set_input_value(&mut doc, &BasicValue::from("logo.png")).expect("set");
        file.update_outputs(&mut doc).expect("outputs");
        assert_eq!(doc.attr(preview, "src"), Some("logo.png"));
        assert_eq!(file.input_value(&doc).expect("value"), BasicValue::from("logo.png"));
    }

    #[test]
    fn plain_files_have_no_preview() {
        let (_, file) = setup(FileKind::File);
        assert!(file.preview().is_none());
    }

    #[test]
    fn source_toggle_rewrites_the_shared_rules() {
        let (mut doc, mut file) = setup(FileKind::File);
        assert_eq!(doc.styles().rule(".io-file .remote", "display"), Some("none"));

        let remote = file.source_radio(FileSource::Remote);
        let result = file.on_event(&mut doc, &DomEvent::change(remote)).expect("toggle");
        assert!(result.has(&IoAction::SourceToggled(FileSource::Remote)));
        assert_eq!(file.source(), FileSource::Remote);
        assert_eq!(doc.styles().rule(".io-file .remote", "display"), Some("inline"));
        assert_eq!(doc.styles().rule(".io-file .local", "display"), Some("none"));
        assert!(doc.checked(remote));
    }

    #[test]
    fn triggers_report_their_actions() {
        let (mut doc, mut file) = setup(FileKind::File);
        let chooser = file.chooser();
        doc.set_value(chooser, "report.pdf");
        let result = file.on_event(&mut doc, &DomEvent::change(chooser)).expect("choose");
        assert!(result.has(&IoAction::Edited));
        assert_eq!(doc.value(file.path().field()), "report.pdf");

        let result = file
            .on_event(&mut doc, &DomEvent::click(file.upload()))
            .expect("upload");
        assert!(result.has(&IoAction::Upload {
            path: "report.pdf".to_string()
        }));
        let result = file
            .on_event(&mut doc, &DomEvent::click(file.explore()))
            .expect("explore");
        assert!(result.has(&IoAction::BrowseFiles));
    }
}
