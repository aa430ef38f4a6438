use crate::core::NodeId;
use crate::core::error::IoError;
use crate::core::value::BasicValue;
use crate::ui::dom::Document;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Pointer activation.
    Click,
    /// The control's live value became the given text.
    Input(String),
    /// Structural confirmation of a control value.
    Change,
    Blur,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub target: NodeId,
    pub kind: EventKind,
}

impl DomEvent {
    pub fn new(target: NodeId, kind: EventKind) -> Self {
        Self { target, kind }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(target, EventKind::Click)
    }

    pub fn input(target: NodeId, text: impl Into<String>) -> Self {
        Self::new(target, EventKind::Input(text.into()))
    }

    pub fn change(target: NodeId) -> Self {
        Self::new(target, EventKind::Change)
    }

    pub fn blur(target: NodeId) -> Self {
        Self::new(target, EventKind::Blur)
    }
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum IoAction {
    /// The widget's value was confirmed by the user.
    Edited,
    Escalated,
    Collapsed,
    /// The foreign-key picker should be opened for this widget.
    OpenPicker,
    BrowseFiles,
    Upload { path: String },
    SourceToggled(FileSource),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionResult {
    pub handled: bool,
    pub actions: Vec<IoAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: IoAction) -> Self {
        Self {
            handled: true,
            actions: vec![action],
        }
    }

    pub fn edited() -> Self {
        Self::with_action(IoAction::Edited)
    }

    pub fn has(&self, action: &IoAction) -> bool {
        self.actions.contains(action)
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.actions.extend(other.actions);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Outcome of [`Io::check_input`](crate::widgets::io::Io::check_input).
/// `Invalid` is recoverable: the message is also written to the error node.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    Valid(BasicValue),
    Invalid(String),
}

impl CheckResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(message) => Some(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Raw access to the editable element(s). No null normalization here.
pub trait Editable {
    fn input_value(&self, doc: &Document) -> Result<BasicValue, IoError>;

    /// Must validate `value` before touching the document so a failed
    /// assignment leaves the widget unchanged.
    fn set_input_value(&mut self, doc: &mut Document, value: &BasicValue) -> Result<(), IoError>;
}

pub trait Displayable {
    /// Copy the edit representation into the display element. Idempotent.
    fn update_outputs(&self, doc: &mut Document) -> Result<(), IoError>;
}

pub trait Interactive {
    fn on_event(
        &mut self,
        _doc: &mut Document,
        _event: &DomEvent,
    ) -> Result<InteractionResult, IoError> {
        Ok(InteractionResult::ignored())
    }

    /// Variant-specific checks on a non-null value.
    fn validate(&self, _doc: &Document, _value: &BasicValue) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscalationState {
    #[default]
    InputMode,
    TextareaMode,
}

/// Two-state promotion between a single-line input and a text area.
pub trait EscalatingText {
    fn escalation_state(&self) -> EscalationState;
    fn escalate(&mut self, doc: &mut Document);
    fn collapse(&mut self, doc: &mut Document);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSource {
    #[default]
    Local,
    Remote,
}

impl FileSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

pub trait SourceToggle {
    fn source(&self) -> FileSource;
    fn toggle_source(&mut self, doc: &mut Document, source: FileSource);
}

// ---------------------------------------------------------------------------
// IoVariant: combined bound used by the tagged union
// ---------------------------------------------------------------------------

pub trait IoVariant: Editable + Displayable + Interactive {}
impl<T> IoVariant for T where T: Editable + Displayable + Interactive {}
